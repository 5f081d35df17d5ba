//! `Choice` alternative-selection kinds.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the children of a `Choice` value constrain one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u32)]
pub enum ChoiceKind {
    /// A single-valued choice; the only child is both default and value.
    None = 0,
    /// `{default, min, max}`.
    Range = 1,
    /// `{default, min, max, step}`.
    Step = 2,
    /// Allowed values, starting with the default.
    Enum = 3,
    /// Admissible flag bits.
    Flags = 4,
}

impl ChoiceKind {
    /// Decode a raw choice kind, failing on anything outside the closed set.
    #[must_use]
    pub const fn from_u32(raw: u32) -> Option<Self> {
        Some(match raw {
            0 => ChoiceKind::None,
            1 => ChoiceKind::Range,
            2 => ChoiceKind::Step,
            3 => ChoiceKind::Enum,
            4 => ChoiceKind::Flags,
            _ => return None,
        })
    }

    /// The raw wire value.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        self as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_choice_kind() {
        for raw in 0..=4u32 {
            let kind = ChoiceKind::from_u32(raw).expect("closed set covers 0..=4");
            assert_eq!(kind.to_u32(), raw);
        }
        assert!(ChoiceKind::from_u32(5).is_none());
    }
}
