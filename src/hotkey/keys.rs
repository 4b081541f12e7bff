//! Key identifiers and hotkey combinations
//!
//! Provides the `Key` type that both the keyboard hook and the hold
//! listeners speak, plus the parser for textual combinations such as
//! `<ctrl>+<alt>+v`.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Virtual keycode the macOS hook reports for the globe (fn) key
pub const GLOBE_VK: u32 = 63;

/// Combination used when no hotkey is configured on platforms without a globe key
pub const DEFAULT_HOTKEY: &str = "<ctrl>+<alt>+v";

/// Modifier keys. Left and right variants are not distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Ctrl,
    Alt,
    AltGr,
    Shift,
    Cmd,
}

/// Non-modifier keys that have a name instead of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Backspace,
    CapsLock,
    Delete,
    Down,
    End,
    Enter,
    Esc,
    /// Function key F1..F20
    F(u8),
    Home,
    Insert,
    Left,
    Menu,
    NumLock,
    PageDown,
    PageUp,
    Pause,
    PrintScreen,
    Right,
    ScrollLock,
    Space,
    Tab,
    Up,
}

/// A single physical or logical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Modifier(Modifier),
    Named(NamedKey),
    /// A key that produces a character, always stored lowercase
    Char(char),
    /// A raw platform virtual-key code with no better representation
    Vk(u32),
}

impl Key {
    /// Build a character key, folding case so `V` and `v` compare equal
    pub fn from_char(c: char) -> Self {
        Key::Char(fold_case(c))
    }

    /// The form used for set membership (lowercase characters)
    pub fn normalized(self) -> Self {
        match self {
            Key::Char(c) => Key::from_char(c),
            other => other,
        }
    }
}

fn fold_case(c: char) -> char {
    // Only fold when lowercasing yields exactly one char
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Modifier::Ctrl => "ctrl",
            Modifier::Alt => "alt",
            Modifier::AltGr => "alt_gr",
            Modifier::Shift => "shift",
            Modifier::Cmd => "cmd",
        };
        f.write_str(name)
    }
}

impl fmt::Display for NamedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NamedKey::Backspace => "backspace",
            NamedKey::CapsLock => "caps_lock",
            NamedKey::Delete => "delete",
            NamedKey::Down => "down",
            NamedKey::End => "end",
            NamedKey::Enter => "enter",
            NamedKey::Esc => "esc",
            NamedKey::F(n) => return write!(f, "f{}", n),
            NamedKey::Home => "home",
            NamedKey::Insert => "insert",
            NamedKey::Left => "left",
            NamedKey::Menu => "menu",
            NamedKey::NumLock => "num_lock",
            NamedKey::PageDown => "page_down",
            NamedKey::PageUp => "page_up",
            NamedKey::Pause => "pause",
            NamedKey::PrintScreen => "print_screen",
            NamedKey::Right => "right",
            NamedKey::ScrollLock => "scroll_lock",
            NamedKey::Space => "space",
            NamedKey::Tab => "tab",
            NamedKey::Up => "up",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Modifier(m) => write!(f, "<{}>", m),
            Key::Named(n) => write!(f, "<{}>", n),
            Key::Char(c) => write!(f, "{}", c),
            Key::Vk(vk) => write!(f, "<{}>", vk),
        }
    }
}

/// Errors from parsing a hotkey combination
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("hotkey combination is empty or ends with a separator: {0:?}")]
    Empty(String),

    #[error("invalid key {0:?}: expected a single character, <name> or <code>")]
    InvalidToken(String),

    #[error("key {0} appears more than once in {1:?}")]
    DuplicateKey(Key, String),

    #[error("key {0} cannot be observed by the keyboard hook on {1}")]
    UnsupportedKey(Key, String),
}

/// An immutable set of keys that must be held together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    keys: HashSet<Key>,
}

impl Combination {
    /// Parse a combination such as `<ctrl>+<alt>+v`
    ///
    /// Tokens are separated by `+`. A `+` directly after a separator is the
    /// plus key itself, so `<ctrl>++` means ctrl and plus.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut keys = HashSet::new();

        for token in split_tokens(input)? {
            let key = parse_key(token)?;
            if !keys.insert(key) {
                return Err(ParseError::DuplicateKey(key, input.to_string()));
            }
        }

        Ok(Self { keys })
    }

    /// Check whether `key` belongs to the combination
    pub fn contains(&self, key: &Key) -> bool {
        self.keys.contains(key)
    }

    /// The keys of the combination, in no particular order
    pub fn keys(&self) -> &HashSet<Key> {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromStr for Combination {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.keys.iter().map(Key::to_string).collect();
        parts.sort();
        f.write_str(&parts.join("+"))
    }
}

fn split_tokens(input: &str) -> Result<Vec<&str>, ParseError> {
    let mut tokens = Vec::new();
    let mut start = 0;

    for (i, c) in input.char_indices() {
        if c == '+' && i != start {
            tokens.push(&input[start..i]);
            start = i + 1;
        }
    }

    if start == input.len() {
        return Err(ParseError::Empty(input.to_string()));
    }
    tokens.push(&input[start..]);

    Ok(tokens)
}

/// Parse one token of a combination into a key
pub fn parse_key(token: &str) -> Result<Key, ParseError> {
    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(Key::from_char(c));
    }

    let name = token
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ParseError::InvalidToken(token.to_string()))?;

    if let Some(key) = named_key(&name.to_ascii_lowercase()) {
        return Ok(key);
    }

    name.parse::<u32>()
        .map(Key::Vk)
        .map_err(|_| ParseError::InvalidToken(token.to_string()))
}

/// Every named key the parser accepts
#[cfg(test)]
pub(crate) fn all_named_keys() -> Vec<NamedKey> {
    let mut keys = vec![
        NamedKey::Backspace,
        NamedKey::CapsLock,
        NamedKey::Delete,
        NamedKey::Down,
        NamedKey::End,
        NamedKey::Enter,
        NamedKey::Esc,
        NamedKey::Home,
        NamedKey::Insert,
        NamedKey::Left,
        NamedKey::Menu,
        NamedKey::NumLock,
        NamedKey::PageDown,
        NamedKey::PageUp,
        NamedKey::Pause,
        NamedKey::PrintScreen,
        NamedKey::Right,
        NamedKey::ScrollLock,
        NamedKey::Space,
        NamedKey::Tab,
        NamedKey::Up,
    ];
    keys.extend((1..=20).map(NamedKey::F));
    keys
}

fn named_key(name: &str) -> Option<Key> {
    let key = match name {
        "ctrl" | "ctrl_l" | "ctrl_r" => Key::Modifier(Modifier::Ctrl),
        "alt" | "alt_l" | "alt_r" => Key::Modifier(Modifier::Alt),
        "alt_gr" => Key::Modifier(Modifier::AltGr),
        "shift" | "shift_l" | "shift_r" => Key::Modifier(Modifier::Shift),
        "cmd" | "cmd_l" | "cmd_r" => Key::Modifier(Modifier::Cmd),
        "backspace" => Key::Named(NamedKey::Backspace),
        "caps_lock" => Key::Named(NamedKey::CapsLock),
        "delete" => Key::Named(NamedKey::Delete),
        "down" => Key::Named(NamedKey::Down),
        "end" => Key::Named(NamedKey::End),
        "enter" => Key::Named(NamedKey::Enter),
        "esc" => Key::Named(NamedKey::Esc),
        "home" => Key::Named(NamedKey::Home),
        "insert" => Key::Named(NamedKey::Insert),
        "left" => Key::Named(NamedKey::Left),
        "menu" => Key::Named(NamedKey::Menu),
        "num_lock" => Key::Named(NamedKey::NumLock),
        "page_down" => Key::Named(NamedKey::PageDown),
        "page_up" => Key::Named(NamedKey::PageUp),
        "pause" => Key::Named(NamedKey::Pause),
        "print_screen" => Key::Named(NamedKey::PrintScreen),
        "right" => Key::Named(NamedKey::Right),
        "scroll_lock" => Key::Named(NamedKey::ScrollLock),
        "space" => Key::Named(NamedKey::Space),
        "tab" => Key::Named(NamedKey::Tab),
        "up" => Key::Named(NamedKey::Up),
        other => {
            let n: u8 = other.strip_prefix('f')?.parse().ok()?;
            if !(1..=20).contains(&n) {
                return None;
            }
            Key::Named(NamedKey::F(n))
        }
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(keys: &[Key]) -> HashSet<Key> {
        keys.iter().copied().collect()
    }

    #[test]
    fn test_parse_default_hotkey() {
        let combo = Combination::parse(DEFAULT_HOTKEY).unwrap();
        assert_eq!(
            combo.keys(),
            &set(&[
                Key::Modifier(Modifier::Ctrl),
                Key::Modifier(Modifier::Alt),
                Key::Char('v'),
            ])
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let combo: Combination = "<CTRL>+<Shift>+V".parse().unwrap();
        assert!(combo.contains(&Key::Modifier(Modifier::Ctrl)));
        assert!(combo.contains(&Key::Modifier(Modifier::Shift)));
        assert!(combo.contains(&Key::Char('v')));
    }

    #[test]
    fn test_sided_modifiers_collapse() {
        let combo = Combination::parse("<ctrl_l>+<alt_r>+<cmd_l>").unwrap();
        assert_eq!(
            combo.keys(),
            &set(&[
                Key::Modifier(Modifier::Ctrl),
                Key::Modifier(Modifier::Alt),
                Key::Modifier(Modifier::Cmd),
            ])
        );
    }

    #[test]
    fn test_parse_named_and_vk_keys() {
        let combo = Combination::parse("<f12>+<space>+<63>").unwrap();
        assert_eq!(
            combo.keys(),
            &set(&[
                Key::Named(NamedKey::F(12)),
                Key::Named(NamedKey::Space),
                Key::Vk(63),
            ])
        );
    }

    #[test]
    fn test_plus_key_after_separator() {
        let combo = Combination::parse("<ctrl>++").unwrap();
        assert_eq!(
            combo.keys(),
            &set(&[Key::Modifier(Modifier::Ctrl), Key::Char('+')])
        );

        let plus = Combination::parse("+").unwrap();
        assert_eq!(plus.keys(), &set(&[Key::Char('+')]));
    }

    #[test]
    fn test_parse_rejects_invalid_tokens() {
        assert_eq!(
            Combination::parse("not a real key"),
            Err(ParseError::InvalidToken("not a real key".to_string()))
        );
        assert!(matches!(
            Combination::parse("<ctrl>+<nope>"),
            Err(ParseError::InvalidToken(_))
        ));
        assert!(matches!(
            Combination::parse("<f21>"),
            Err(ParseError::InvalidToken(_))
        ));
        assert!(matches!(
            Combination::parse("<>"),
            Err(ParseError::InvalidToken(_))
        ));
        assert!(matches!(
            Combination::parse("<globe>"),
            Err(ParseError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty_and_trailing_separator() {
        assert!(matches!(Combination::parse(""), Err(ParseError::Empty(_))));
        assert!(matches!(
            Combination::parse("<ctrl>+"),
            Err(ParseError::Empty(_))
        ));
    }

    #[test]
    fn test_parse_rejects_duplicates() {
        assert!(matches!(
            Combination::parse("<ctrl>+<ctrl_l>+v"),
            Err(ParseError::DuplicateKey(Key::Modifier(Modifier::Ctrl), _))
        ));
        assert!(matches!(
            Combination::parse("v+V"),
            Err(ParseError::DuplicateKey(Key::Char('v'), _))
        ));
    }

    #[test]
    fn test_every_named_key_parses_from_its_name() {
        for named in all_named_keys() {
            let token = format!("<{}>", named);
            assert_eq!(parse_key(&token), Ok(Key::Named(named)), "{}", token);
        }
    }

    #[test]
    fn test_key_display() {
        assert_eq!(Key::Modifier(Modifier::Ctrl).to_string(), "<ctrl>");
        assert_eq!(Key::Named(NamedKey::F(5)).to_string(), "<f5>");
        assert_eq!(Key::from_char('V').to_string(), "v");
        assert_eq!(Key::Vk(GLOBE_VK).to_string(), "<63>");
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let combo = Combination::parse("<alt>+<ctrl>+v").unwrap();
        let reparsed = Combination::parse(&combo.to_string()).unwrap();
        assert_eq!(combo, reparsed);
    }
}
