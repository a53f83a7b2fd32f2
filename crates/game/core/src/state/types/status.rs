//! Human/frog status carried by every player.
//!
//! Transitions are driven exclusively by [`crate::status`]; this module only
//! describes the data.

use super::common::Timestamp;

/// Current form of a player.
///
/// Only a `Human` can become a `Frog` and only a `Frog` can turn back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusEffect {
    #[default]
    Human,
    Frog {
        /// Time at which the scheduled revert fires.
        expires_at: Timestamp,
    },
}

impl StatusEffect {
    pub const fn form(self) -> Form {
        match self {
            StatusEffect::Human => Form::Human,
            StatusEffect::Frog { .. } => Form::Frog,
        }
    }

    pub const fn is_frog(self) -> bool {
        matches!(self, StatusEffect::Frog { .. })
    }

    pub const fn is_human(self) -> bool {
        matches!(self, StatusEffect::Human)
    }

    /// Milliseconds of frog time left at `now`, `None` for humans.
    pub fn remaining(self, now: Timestamp) -> Option<u64> {
        match self {
            StatusEffect::Human => None,
            StatusEffect::Frog { expires_at } => Some(now.until(expires_at)),
        }
    }
}

/// Presentation-level form without timing data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Form {
    Human,
    Frog,
}
