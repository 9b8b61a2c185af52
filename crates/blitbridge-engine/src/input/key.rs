use std::fmt;

/// Platform-agnostic key identifier.
///
/// Only keys with a meaning to the module get their own variant; the
/// platform layer maps everything else to `Key::Unknown`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Backspace,
    Tab,
    Enter,
    Escape,
    Space,

    ArrowRight,
    ArrowLeft,
    ArrowDown,
    ArrowUp,

    /// Key not represented here.
    Unknown,
}

impl Key {
    /// Resolves a W3C `KeyboardEvent.key` style name (`"ArrowLeft"`, `" "`, ...).
    pub fn from_name(name: &str) -> Key {
        match name {
            "Backspace" => Key::Backspace,
            "Tab" => Key::Tab,
            "Enter" => Key::Enter,
            "Escape" => Key::Escape,
            " " => Key::Space,
            "ArrowRight" => Key::ArrowRight,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowDown" => Key::ArrowDown,
            "ArrowUp" => Key::ArrowUp,
            _ => Key::Unknown,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Discrete input code delivered to the module through `get_keydown`.
///
/// Discriminants are the wire values the module compares against.
#[repr(i32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum KeyCode {
    /// "No event" sentinel returned when the queue is empty.
    Unknown = 0,
    Backspace = 8,
    Tab = 9,
    Return = 13,
    Escape = 27,
    Space = 32,
    Right = 1_073_741_903,
    Left = 1_073_741_904,
    Down = 1_073_741_905,
    Up = 1_073_741_906,
}

impl KeyCode {
    #[inline]
    pub const fn wire(self) -> i32 {
        self as i32
    }

    /// Fixed key table. `None` for keys the module does not understand.
    pub fn for_key(key: Key) -> Option<KeyCode> {
        let code = match key {
            Key::Backspace => KeyCode::Backspace,
            Key::Tab => KeyCode::Tab,
            Key::Enter => KeyCode::Return,
            Key::Escape => KeyCode::Escape,
            Key::Space => KeyCode::Space,
            Key::ArrowRight => KeyCode::Right,
            Key::ArrowLeft => KeyCode::Left,
            Key::ArrowDown => KeyCode::Down,
            Key::ArrowUp => KeyCode::Up,
            Key::Unknown => return None,
        };
        Some(code)
    }

    pub fn from_wire(value: i32) -> Option<KeyCode> {
        [
            KeyCode::Unknown,
            KeyCode::Backspace,
            KeyCode::Tab,
            KeyCode::Return,
            KeyCode::Escape,
            KeyCode::Space,
            KeyCode::Right,
            KeyCode::Left,
            KeyCode::Down,
            KeyCode::Up,
        ]
        .into_iter()
        .find(|c| c.wire() == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values_are_fixed() {
        assert_eq!(KeyCode::Unknown.wire(), 0);
        assert_eq!(KeyCode::Backspace.wire(), 8);
        assert_eq!(KeyCode::Tab.wire(), 9);
        assert_eq!(KeyCode::Return.wire(), 13);
        assert_eq!(KeyCode::Escape.wire(), 27);
        assert_eq!(KeyCode::Space.wire(), 32);
        assert_eq!(KeyCode::Right.wire(), 1073741903);
        assert_eq!(KeyCode::Left.wire(), 1073741904);
        assert_eq!(KeyCode::Down.wire(), 1073741905);
        assert_eq!(KeyCode::Up.wire(), 1073741906);
    }

    #[test]
    fn names_map_through_table() {
        let cases = [
            ("Backspace", KeyCode::Backspace),
            ("Tab", KeyCode::Tab),
            ("Enter", KeyCode::Return),
            ("Escape", KeyCode::Escape),
            (" ", KeyCode::Space),
            ("ArrowRight", KeyCode::Right),
            ("ArrowLeft", KeyCode::Left),
            ("ArrowDown", KeyCode::Down),
            ("ArrowUp", KeyCode::Up),
        ];
        for (name, code) in cases {
            assert_eq!(KeyCode::for_key(Key::from_name(name)), Some(code), "{name:?}");
        }
    }

    #[test]
    fn unrecognized_keys_have_no_code() {
        assert_eq!(Key::from_name("a"), Key::Unknown);
        assert_eq!(Key::from_name("F5"), Key::Unknown);
        assert_eq!(KeyCode::for_key(Key::Unknown), None);
    }

    #[test]
    fn wire_round_trips_for_known_values_only() {
        assert_eq!(KeyCode::from_wire(1073741906), Some(KeyCode::Up));
        assert_eq!(KeyCode::from_wire(65), None);
    }
}
