use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

use crate::{Key, Modifiers};

/// A key chord: a set of modifiers plus a single non-modifier key.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Chord {
    /// Modifier keys held down for this chord.
    pub modifiers: Modifiers,
    /// The non-modifier key for this chord.
    pub key: Key,
}

/// Error produced when a chord spec string cannot be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid chord spec: {spec:?}")]
pub struct ParseChordError {
    /// The offending input.
    pub spec: String,
}

impl Chord {
    /// Creates a chord from parts.
    pub const fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Parses a chord specification of the form `"cmd+shift+tab"`.
    ///
    /// - Case-insensitive for both modifiers and the key.
    /// - Components are separated by `+`; the last component is the key spec.
    /// - Modifiers may use the aliases handled by [`Modifiers::from_spec`].
    /// - A bare key spec with no modifiers is legal.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts: Vec<&str> = s.split('+').collect();
        let key_raw = parts.pop()?;
        // Keep the raw component so a literal trailing space parses as Space.
        let key = Key::from_spec(key_raw)?;
        if key.is_modifier() {
            return None;
        }
        let mut modifiers = Modifiers::empty();
        for part in parts {
            modifiers |= Modifiers::from_spec(part)?;
        }
        Some(Self { modifiers, key })
    }

    /// Returns the canonical string form, e.g. `"cmd+shift+tab"`.
    pub fn to_string_canonical(&self) -> String {
        let mut out: Vec<String> = self
            .modifiers
            .to_specs()
            .into_iter()
            .map(str::to_string)
            .collect();
        out.push(self.key.to_spec());
        out.join("+")
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_canonical())
    }
}

impl FromStr for Chord {
    type Err = ParseChordError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseChordError { spec: s.to_string() })
    }
}

// Chords persist in settings files as their canonical spec strings.
impl Serialize for Chord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string_canonical())
    }
}

impl<'de> Deserialize<'de> for Chord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
