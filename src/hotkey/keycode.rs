//! macOS virtual keycode translation
//!
//! Maps the keycodes carried by CGEvents to `Key` values. Kept free of
//! CoreGraphics types so the mapping can be tested on every platform.

use super::keys::{Key, Modifier, NamedKey, GLOBE_VK};

/// A key event as delivered to the hold listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Press(Key),
    Release(Key),
}

/// Raw CGEventFlags bits for the keys reported through `FlagsChanged`
pub mod flags {
    pub const SHIFT: u64 = 0x0002_0000;
    pub const CONTROL: u64 = 0x0004_0000;
    pub const ALTERNATE: u64 = 0x0008_0000;
    pub const COMMAND: u64 = 0x0010_0000;
    pub const SECONDARY_FN: u64 = 0x0080_0000;
}

/// Translate a macOS virtual keycode into a key
///
/// Codes without a mapping, including the globe key, come back as
/// `Key::Vk(code)`.
pub fn key_from_keycode(code: u16) -> Key {
    let c = Key::Char;
    match code {
        0 => c('a'),
        1 => c('s'),
        2 => c('d'),
        3 => c('f'),
        4 => c('h'),
        5 => c('g'),
        6 => c('z'),
        7 => c('x'),
        8 => c('c'),
        9 => c('v'),
        11 => c('b'),
        12 => c('q'),
        13 => c('w'),
        14 => c('e'),
        15 => c('r'),
        16 => c('y'),
        17 => c('t'),
        18 => c('1'),
        19 => c('2'),
        20 => c('3'),
        21 => c('4'),
        22 => c('6'),
        23 => c('5'),
        24 => c('='),
        25 => c('9'),
        26 => c('7'),
        27 => c('-'),
        28 => c('8'),
        29 => c('0'),
        30 => c(']'),
        31 => c('o'),
        32 => c('u'),
        33 => c('['),
        34 => c('i'),
        35 => c('p'),
        36 => Key::Named(NamedKey::Enter),
        37 => c('l'),
        38 => c('j'),
        39 => c('\''),
        40 => c('k'),
        41 => c(';'),
        42 => c('\\'),
        43 => c(','),
        44 => c('/'),
        45 => c('n'),
        46 => c('m'),
        47 => c('.'),
        48 => Key::Named(NamedKey::Tab),
        49 => Key::Named(NamedKey::Space),
        50 => c('`'),
        51 => Key::Named(NamedKey::Backspace),
        53 => Key::Named(NamedKey::Esc),
        54 | 55 => Key::Modifier(Modifier::Cmd),
        56 | 60 => Key::Modifier(Modifier::Shift),
        57 => Key::Named(NamedKey::CapsLock),
        58 | 61 => Key::Modifier(Modifier::Alt),
        59 | 62 => Key::Modifier(Modifier::Ctrl),
        64 => Key::Named(NamedKey::F(17)),
        79 => Key::Named(NamedKey::F(18)),
        80 => Key::Named(NamedKey::F(19)),
        90 => Key::Named(NamedKey::F(20)),
        96 => Key::Named(NamedKey::F(5)),
        97 => Key::Named(NamedKey::F(6)),
        98 => Key::Named(NamedKey::F(7)),
        99 => Key::Named(NamedKey::F(3)),
        100 => Key::Named(NamedKey::F(8)),
        101 => Key::Named(NamedKey::F(9)),
        103 => Key::Named(NamedKey::F(11)),
        105 => Key::Named(NamedKey::F(13)),
        106 => Key::Named(NamedKey::F(16)),
        107 => Key::Named(NamedKey::F(14)),
        109 => Key::Named(NamedKey::F(10)),
        110 => Key::Named(NamedKey::Menu),
        111 => Key::Named(NamedKey::F(12)),
        113 => Key::Named(NamedKey::F(15)),
        114 => Key::Named(NamedKey::Insert),
        115 => Key::Named(NamedKey::Home),
        116 => Key::Named(NamedKey::PageUp),
        117 => Key::Named(NamedKey::Delete),
        118 => Key::Named(NamedKey::F(4)),
        119 => Key::Named(NamedKey::End),
        120 => Key::Named(NamedKey::F(2)),
        121 => Key::Named(NamedKey::PageDown),
        122 => Key::Named(NamedKey::F(1)),
        123 => Key::Named(NamedKey::Left),
        124 => Key::Named(NamedKey::Right),
        125 => Key::Named(NamedKey::Down),
        126 => Key::Named(NamedKey::Up),
        other => Key::Vk(u32::from(other)),
    }
}

/// Flag bit that tracks the modifier behind `code`, if it is one
fn modifier_flag(code: u16) -> Option<u64> {
    match code {
        54 | 55 => Some(flags::COMMAND),
        56 | 60 => Some(flags::SHIFT),
        58 | 61 => Some(flags::ALTERNATE),
        59 | 62 => Some(flags::CONTROL),
        c if u32::from(c) == GLOBE_VK => Some(flags::SECONDARY_FN),
        _ => None,
    }
}

/// Translate a `FlagsChanged` event into a press or release
///
/// The event only says that some modifier changed; whether it went down is
/// read from its bit in the new flags. Caps lock is not translated: its
/// flag is the lock state, not the key state.
pub fn flags_changed(code: u16, flag_bits: u64) -> Option<KeyEvent> {
    let mask = modifier_flag(code)?;
    let key = key_from_keycode(code);
    if flag_bits & mask != 0 {
        Some(KeyEvent::Press(key))
    } else {
        Some(KeyEvent::Release(key))
    }
}
