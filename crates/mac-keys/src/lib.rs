//! mac-keys: virtual key codes, modifier sets, and chord specs for macOS.
//!
//! - [`Key`]: macOS hardware virtual key codes (`kVK_*`, `NSEvent.keyCode`).
//! - [`Modifiers`]: a bitflags set of modifier keys with conversions from
//!   CGEventFlags and the normalization the switcher compares with.
//! - [`Chord`]: a key plus a modifier set, parsed from and rendered to
//!   canonical spec strings like `"cmd+tab"`.
//!
//! A "scancode" here is the layout-independent positional keycode reported by
//! CoreGraphics in the `kCGKeyboardEventKeycode` field. It is macOS-specific:
//! not a USB HID usage ID and not a character.

mod chord;
mod key;
mod mods;

pub use chord::{Chord, ParseChordError};
pub use key::Key;
pub use mods::Modifiers;

/// macOS hardware virtual keycode (`kVK_*`, `NSEvent.keyCode`).
pub type Scancode = u16;

impl TryFrom<Scancode> for Key {
    type Error = ();
    fn try_from(value: Scancode) -> Result<Self, Self::Error> {
        Self::from_scancode(value).ok_or(())
    }
}

impl From<Key> for Scancode {
    fn from(k: Key) -> Self {
        k as u16
    }
}
