use serde::{Deserialize, Serialize};

/// Defines [`Key`] together with its scancode lookup and name table so the
/// three can never drift apart.
macro_rules! keys {
    ( $( $name:ident = $code:literal ),* $(,)? ) => {
        /// A macOS virtual key, identified by its hardware keycode (`kVK_*`).
        ///
        /// Only the ANSI layout set plus the control, navigation, and function
        /// keys are represented; keypad and international keys are not.
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
        #[repr(u16)]
        pub enum Key {
            $(
                #[doc = concat!("The `", stringify!($name), "` key.")]
                $name = $code,
            )*
        }

        impl Key {
            /// Looks up a `Key` from a macOS scancode (hardware virtual keycode).
            pub fn from_scancode(sc: u16) -> Option<Self> {
                match sc {
                    $( $code => Some(Self::$name), )*
                    _ => None,
                }
            }

            /// Returns the variant name, e.g. `"Tab"` or `"Digit1"`.
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$name => stringify!($name), )*
                }
            }
        }
    };
}

keys! {
    A = 0x00,
    S = 0x01,
    D = 0x02,
    F = 0x03,
    H = 0x04,
    G = 0x05,
    Z = 0x06,
    X = 0x07,
    C = 0x08,
    V = 0x09,
    B = 0x0B,
    Q = 0x0C,
    W = 0x0D,
    E = 0x0E,
    R = 0x0F,
    Y = 0x10,
    T = 0x11,
    Digit1 = 0x12,
    Digit2 = 0x13,
    Digit3 = 0x14,
    Digit4 = 0x15,
    Digit6 = 0x16,
    Digit5 = 0x17,
    Equal = 0x18,
    Digit9 = 0x19,
    Digit7 = 0x1A,
    Minus = 0x1B,
    Digit8 = 0x1C,
    Digit0 = 0x1D,
    RightBracket = 0x1E,
    O = 0x1F,
    U = 0x20,
    LeftBracket = 0x21,
    I = 0x22,
    P = 0x23,
    Return = 0x24,
    L = 0x25,
    J = 0x26,
    Quote = 0x27,
    K = 0x28,
    Semicolon = 0x29,
    Backslash = 0x2A,
    Comma = 0x2B,
    Slash = 0x2C,
    N = 0x2D,
    M = 0x2E,
    Period = 0x2F,
    Tab = 0x30,
    Space = 0x31,
    Grave = 0x32,
    Delete = 0x33,
    Escape = 0x35,
    RightCommand = 0x36,
    Command = 0x37,
    Shift = 0x38,
    CapsLock = 0x39,
    Option = 0x3A,
    Control = 0x3B,
    RightShift = 0x3C,
    RightOption = 0x3D,
    RightControl = 0x3E,
    Function = 0x3F,
    F5 = 0x60,
    F6 = 0x61,
    F7 = 0x62,
    F3 = 0x63,
    F8 = 0x64,
    F9 = 0x65,
    F11 = 0x67,
    F10 = 0x6D,
    F12 = 0x6F,
    Help = 0x72,
    Home = 0x73,
    PageUp = 0x74,
    ForwardDelete = 0x75,
    F4 = 0x76,
    End = 0x77,
    F2 = 0x78,
    PageDown = 0x79,
    F1 = 0x7A,
    LeftArrow = 0x7B,
    RightArrow = 0x7C,
    DownArrow = 0x7D,
    UpArrow = 0x7E,
}

impl Key {
    /// Returns the scancode (`kVK_*`) for this key.
    pub const fn scancode(self) -> u16 {
        self as u16
    }

    /// Parses a key specification into a `Key`.
    ///
    /// Case-insensitive. Accepts single characters (`"a"`, `"1"`, `" "`),
    /// spelled-out names (`"tab"`, `"pageup"`), and common aliases
    /// (`"esc"`, `"backspace"`, `"del"`, `"left"`).
    pub fn from_spec(s: &str) -> Option<Self> {
        // Literal space before trimming, since trim would eat it.
        if s == " " {
            return Some(Self::Space);
        }
        let lower = s.trim().to_ascii_lowercase();
        if let Some(k) = Self::from_single_char(&lower) {
            return Some(k);
        }
        let k = match lower.as_str() {
            "tab" => Self::Tab,
            "space" => Self::Space,
            "esc" | "escape" => Self::Escape,
            "return" | "enter" | "ret" => Self::Return,
            "backspace" | "delete" => Self::Delete,
            "del" | "forwarddelete" => Self::ForwardDelete,
            "left" => Self::LeftArrow,
            "right" => Self::RightArrow,
            "up" => Self::UpArrow,
            "down" => Self::DownArrow,
            "pgup" | "pageup" => Self::PageUp,
            "pgdn" | "pagedown" => Self::PageDown,
            "home" => Self::Home,
            "end" => Self::End,
            "help" => Self::Help,
            "grave" => Self::Grave,
            "minus" => Self::Minus,
            "equal" => Self::Equal,
            "comma" => Self::Comma,
            "period" => Self::Period,
            "slash" => Self::Slash,
            "semicolon" => Self::Semicolon,
            "quote" => Self::Quote,
            "backslash" => Self::Backslash,
            "leftbracket" => Self::LeftBracket,
            "rightbracket" => Self::RightBracket,
            "f1" => Self::F1,
            "f2" => Self::F2,
            "f3" => Self::F3,
            "f4" => Self::F4,
            "f5" => Self::F5,
            "f6" => Self::F6,
            "f7" => Self::F7,
            "f8" => Self::F8,
            "f9" => Self::F9,
            "f10" => Self::F10,
            "f11" => Self::F11,
            "f12" => Self::F12,
            _ => return None,
        };
        Some(k)
    }

    /// Maps a one-character spec (letter, digit, punctuation) to a key.
    fn from_single_char(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        let k = match c {
            'a' => Self::A,
            'b' => Self::B,
            'c' => Self::C,
            'd' => Self::D,
            'e' => Self::E,
            'f' => Self::F,
            'g' => Self::G,
            'h' => Self::H,
            'i' => Self::I,
            'j' => Self::J,
            'k' => Self::K,
            'l' => Self::L,
            'm' => Self::M,
            'n' => Self::N,
            'o' => Self::O,
            'p' => Self::P,
            'q' => Self::Q,
            'r' => Self::R,
            's' => Self::S,
            't' => Self::T,
            'u' => Self::U,
            'v' => Self::V,
            'w' => Self::W,
            'x' => Self::X,
            'y' => Self::Y,
            'z' => Self::Z,
            '0' => Self::Digit0,
            '1' => Self::Digit1,
            '2' => Self::Digit2,
            '3' => Self::Digit3,
            '4' => Self::Digit4,
            '5' => Self::Digit5,
            '6' => Self::Digit6,
            '7' => Self::Digit7,
            '8' => Self::Digit8,
            '9' => Self::Digit9,
            '-' => Self::Minus,
            '=' => Self::Equal,
            '[' => Self::LeftBracket,
            ']' => Self::RightBracket,
            '\\' => Self::Backslash,
            ';' => Self::Semicolon,
            '\'' => Self::Quote,
            ',' => Self::Comma,
            '.' => Self::Period,
            '/' => Self::Slash,
            '`' => Self::Grave,
            _ => return None,
        };
        Some(k)
    }

    /// Returns the canonical spec string for this key, always lowercased.
    pub fn to_spec(self) -> String {
        if let Some(c) = self.filter_char() {
            return c.to_string();
        }
        match self {
            Self::Minus => "-".into(),
            Self::Equal => "=".into(),
            Self::LeftBracket => "[".into(),
            Self::RightBracket => "]".into(),
            Self::Backslash => "\\".into(),
            Self::Semicolon => ";".into(),
            Self::Quote => "'".into(),
            Self::Comma => ",".into(),
            Self::Period => ".".into(),
            Self::Slash => "/".into(),
            Self::Grave => "`".into(),
            _ => self.name().to_ascii_lowercase(),
        }
    }

    /// The character this key contributes to a type-to-filter string, if any.
    ///
    /// Letters map to their lowercase form, digits to themselves, and
    /// [`Key::Space`] to a space. Everything else (navigation, punctuation,
    /// modifiers) returns `None` and is never appended to a filter.
    pub const fn filter_char(self) -> Option<char> {
        let c = match self {
            Self::A => 'a',
            Self::B => 'b',
            Self::C => 'c',
            Self::D => 'd',
            Self::E => 'e',
            Self::F => 'f',
            Self::G => 'g',
            Self::H => 'h',
            Self::I => 'i',
            Self::J => 'j',
            Self::K => 'k',
            Self::L => 'l',
            Self::M => 'm',
            Self::N => 'n',
            Self::O => 'o',
            Self::P => 'p',
            Self::Q => 'q',
            Self::R => 'r',
            Self::S => 's',
            Self::T => 't',
            Self::U => 'u',
            Self::V => 'v',
            Self::W => 'w',
            Self::X => 'x',
            Self::Y => 'y',
            Self::Z => 'z',
            Self::Digit0 => '0',
            Self::Digit1 => '1',
            Self::Digit2 => '2',
            Self::Digit3 => '3',
            Self::Digit4 => '4',
            Self::Digit5 => '5',
            Self::Digit6 => '6',
            Self::Digit7 => '7',
            Self::Digit8 => '8',
            Self::Digit9 => '9',
            Self::Space => ' ',
            _ => return None,
        };
        Some(c)
    }

    /// Returns true if this key is a modifier key.
    pub const fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::Command
                | Self::Shift
                | Self::CapsLock
                | Self::Option
                | Self::Control
                | Self::RightCommand
                | Self::RightShift
                | Self::RightOption
                | Self::RightControl
                | Self::Function
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scancode_roundtrip() {
        let samples = [
            Key::A,
            Key::Digit1,
            Key::Space,
            Key::Return,
            Key::Tab,
            Key::Escape,
            Key::LeftArrow,
            Key::F1,
            Key::ForwardDelete,
        ];
        for k in samples {
            assert_eq!(Key::from_scancode(k.scancode()), Some(k));
        }
        assert_eq!(Key::from_scancode(0xFFFF), None);
    }

    #[test]
    fn spec_roundtrip() {
        for spec in ["a", "1", "tab", "esc", " ", "pgdn", "f5", ","] {
            let k = Key::from_spec(spec).expect("parse");
            assert_eq!(Key::from_spec(&k.to_spec()), Some(k), "roundtrip {spec}");
        }
        assert_eq!(Key::from_spec("backspace"), Some(Key::Delete));
        assert_eq!(Key::from_spec("TAB"), Some(Key::Tab));
        assert_eq!(Key::from_spec("nosuchkey"), None);
    }

    #[test]
    fn filter_chars() {
        assert_eq!(Key::A.filter_char(), Some('a'));
        assert_eq!(Key::Digit7.filter_char(), Some('7'));
        assert_eq!(Key::Space.filter_char(), Some(' '));
        assert_eq!(Key::Escape.filter_char(), None);
        assert_eq!(Key::Comma.filter_char(), None);
        assert_eq!(Key::Command.filter_char(), None);
    }
}
