use bitflags::bitflags;

bitflags! {
    /// A set of held modifier keys.
    ///
    /// Left/right variants are collapsed: the switcher matches on the
    /// device-independent view of the keyboard, same as the CGEventFlags
    /// primary mask bits.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct Modifiers: u8 {
        /// Command (⌘).
        const COMMAND = 1 << 0;
        /// Option (⌥).
        const OPTION = 1 << 1;
        /// Control (⌃).
        const CONTROL = 1 << 2;
        /// Shift (⇧).
        const SHIFT = 1 << 3;
        /// Caps Lock. Present in raw flags while the lock is engaged;
        /// stripped by [`Modifiers::normalized`] before any comparison.
        const CAPS_LOCK = 1 << 4;
    }
}

// CGEventFlags primary mask bits (CoreGraphics/CGEventTypes.h).
const CG_ALPHA_SHIFT: u64 = 1 << 16;
const CG_SHIFT: u64 = 1 << 17;
const CG_CONTROL: u64 = 1 << 18;
const CG_ALTERNATE: u64 = 1 << 19;
const CG_COMMAND: u64 = 1 << 20;

impl Modifiers {
    /// Constructs a modifier set from macOS CGEventFlags bits.
    ///
    /// Only the primary matching bits are considered: AlphaShift (Caps Lock),
    /// Shift, Control, Alternate (Option), and Command. Device-dependent
    /// left/right bits and the Fn flag (which the OS sets for arrow and
    /// function keys on its own) are ignored.
    pub fn from_cg_flags(flags: u64) -> Self {
        let mut set = Self::empty();
        if flags & CG_ALPHA_SHIFT != 0 {
            set |= Self::CAPS_LOCK;
        }
        if flags & CG_SHIFT != 0 {
            set |= Self::SHIFT;
        }
        if flags & CG_CONTROL != 0 {
            set |= Self::CONTROL;
        }
        if flags & CG_ALTERNATE != 0 {
            set |= Self::OPTION;
        }
        if flags & CG_COMMAND != 0 {
            set |= Self::COMMAND;
        }
        set
    }

    /// The set with Caps Lock removed. All chord comparisons go through this.
    pub fn normalized(self) -> Self {
        self - Self::CAPS_LOCK
    }

    /// Parses a single modifier spec such as `"cmd"`, `"alt"`, or `"shift"`.
    pub fn from_spec(s: &str) -> Option<Self> {
        let m = match s.trim().to_ascii_lowercase().as_str() {
            "cmd" | "command" => Self::COMMAND,
            "opt" | "option" | "alt" => Self::OPTION,
            "ctrl" | "control" => Self::CONTROL,
            "shift" => Self::SHIFT,
            "caps" | "capslock" => Self::CAPS_LOCK,
            _ => return None,
        };
        Some(m)
    }

    /// Canonical spec components in canonical order (cmd, opt, ctrl, shift).
    pub fn to_specs(self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.contains(Self::COMMAND) {
            out.push("cmd");
        }
        if self.contains(Self::OPTION) {
            out.push("opt");
        }
        if self.contains(Self::CONTROL) {
            out.push("ctrl");
        }
        if self.contains(Self::SHIFT) {
            out.push("shift");
        }
        if self.contains(Self::CAPS_LOCK) {
            out.push("capslock");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_cg_flags_maps_primary_bits() {
        let m = Modifiers::from_cg_flags(CG_COMMAND | CG_SHIFT);
        assert_eq!(m, Modifiers::COMMAND | Modifiers::SHIFT);
        // Fn and device-dependent bits are ignored.
        let m = Modifiers::from_cg_flags(1 << 23 | 1 << 3);
        assert!(m.is_empty());
    }

    #[test]
    fn normalized_strips_caps_lock() {
        let m = Modifiers::from_cg_flags(CG_ALPHA_SHIFT | CG_COMMAND);
        assert!(m.contains(Modifiers::CAPS_LOCK));
        assert_eq!(m.normalized(), Modifiers::COMMAND);
        assert_eq!(Modifiers::empty().normalized(), Modifiers::empty());
    }

    #[test]
    fn spec_parsing() {
        assert_eq!(Modifiers::from_spec("cmd"), Some(Modifiers::COMMAND));
        assert_eq!(Modifiers::from_spec("ALT"), Some(Modifiers::OPTION));
        assert_eq!(Modifiers::from_spec("ctrl"), Some(Modifiers::CONTROL));
        assert_eq!(Modifiers::from_spec("bogus"), None);
        assert_eq!(
            (Modifiers::SHIFT | Modifiers::COMMAND).to_specs(),
            vec!["cmd", "shift"]
        );
    }
}
