//! Strength score on the scorer's discrete 0-4 scale.

use std::fmt;

/// Qualitative strength tier of a [`StrengthScore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StrengthTier {
    VeryWeak,
    Weak,
    Fair,
    Strong,
    VeryStrong,
}

/// Score published for the current password, clamped to `0..=StrengthScore::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StrengthScore(u8);

impl StrengthScore {
    pub const MAX: u8 = 4;

    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn tier(self) -> StrengthTier {
        match self.0 {
            0 => StrengthTier::VeryWeak,
            1 => StrengthTier::Weak,
            2 => StrengthTier::Fair,
            3 => StrengthTier::Strong,
            _ => StrengthTier::VeryStrong,
        }
    }
}

impl From<StrengthScore> for u8 {
    fn from(score: StrengthScore) -> Self {
        score.0
    }
}

impl fmt::Display for StrengthScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}
