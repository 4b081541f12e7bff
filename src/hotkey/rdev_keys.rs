//! rdev key translation for the Linux and Windows hook

use super::keys::{Key, Modifier, NamedKey, GLOBE_VK};

/// Translate an rdev key into a key
///
/// Sided modifiers collapse like they do on macOS. Keypad keys map to the
/// character or key they produce; keys rdev does not name come back as
/// `Key::Vk(code)`.
pub fn key_from_rdev(key: rdev::Key) -> Key {
    use rdev::Key as R;

    let c = Key::Char;
    let n = Key::Named;
    match key {
        R::Alt => Key::Modifier(Modifier::Alt),
        R::AltGr => Key::Modifier(Modifier::AltGr),
        R::ControlLeft | R::ControlRight => Key::Modifier(Modifier::Ctrl),
        R::MetaLeft | R::MetaRight => Key::Modifier(Modifier::Cmd),
        R::ShiftLeft | R::ShiftRight => Key::Modifier(Modifier::Shift),
        R::Backspace => n(NamedKey::Backspace),
        R::CapsLock => n(NamedKey::CapsLock),
        R::Delete | R::KpDelete => n(NamedKey::Delete),
        R::DownArrow => n(NamedKey::Down),
        R::End => n(NamedKey::End),
        R::Escape => n(NamedKey::Esc),
        R::F1 => n(NamedKey::F(1)),
        R::F2 => n(NamedKey::F(2)),
        R::F3 => n(NamedKey::F(3)),
        R::F4 => n(NamedKey::F(4)),
        R::F5 => n(NamedKey::F(5)),
        R::F6 => n(NamedKey::F(6)),
        R::F7 => n(NamedKey::F(7)),
        R::F8 => n(NamedKey::F(8)),
        R::F9 => n(NamedKey::F(9)),
        R::F10 => n(NamedKey::F(10)),
        R::F11 => n(NamedKey::F(11)),
        R::F12 => n(NamedKey::F(12)),
        R::Home => n(NamedKey::Home),
        R::LeftArrow => n(NamedKey::Left),
        R::PageDown => n(NamedKey::PageDown),
        R::PageUp => n(NamedKey::PageUp),
        R::Return | R::KpReturn => n(NamedKey::Enter),
        R::RightArrow => n(NamedKey::Right),
        R::Space => n(NamedKey::Space),
        R::Tab => n(NamedKey::Tab),
        R::UpArrow => n(NamedKey::Up),
        R::PrintScreen => n(NamedKey::PrintScreen),
        R::ScrollLock => n(NamedKey::ScrollLock),
        R::Pause => n(NamedKey::Pause),
        R::NumLock => n(NamedKey::NumLock),
        R::Insert => n(NamedKey::Insert),
        R::BackQuote => c('`'),
        R::Num1 | R::Kp1 => c('1'),
        R::Num2 | R::Kp2 => c('2'),
        R::Num3 | R::Kp3 => c('3'),
        R::Num4 | R::Kp4 => c('4'),
        R::Num5 | R::Kp5 => c('5'),
        R::Num6 | R::Kp6 => c('6'),
        R::Num7 | R::Kp7 => c('7'),
        R::Num8 | R::Kp8 => c('8'),
        R::Num9 | R::Kp9 => c('9'),
        R::Num0 | R::Kp0 => c('0'),
        R::Minus | R::KpMinus => c('-'),
        R::Equal => c('='),
        R::KpPlus => c('+'),
        R::KpMultiply => c('*'),
        R::KpDivide | R::Slash => c('/'),
        R::KeyQ => c('q'),
        R::KeyW => c('w'),
        R::KeyE => c('e'),
        R::KeyR => c('r'),
        R::KeyT => c('t'),
        R::KeyY => c('y'),
        R::KeyU => c('u'),
        R::KeyI => c('i'),
        R::KeyO => c('o'),
        R::KeyP => c('p'),
        R::LeftBracket => c('['),
        R::RightBracket => c(']'),
        R::KeyA => c('a'),
        R::KeyS => c('s'),
        R::KeyD => c('d'),
        R::KeyF => c('f'),
        R::KeyG => c('g'),
        R::KeyH => c('h'),
        R::KeyJ => c('j'),
        R::KeyK => c('k'),
        R::KeyL => c('l'),
        R::SemiColon => c(';'),
        R::Quote => c('\''),
        R::BackSlash | R::IntlBackslash => c('\\'),
        R::KeyZ => c('z'),
        R::KeyX => c('x'),
        R::KeyC => c('c'),
        R::KeyV => c('v'),
        R::KeyB => c('b'),
        R::KeyN => c('n'),
        R::KeyM => c('m'),
        R::Comma => c(','),
        R::Dot => c('.'),
        R::Function => Key::Vk(GLOBE_VK),
        R::Unknown(code) => Key::Vk(code),
    }
}
