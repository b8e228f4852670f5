//! Action configuration errors.
//!
//! Unmet requirements are reported through an unsuccessful
//! [`ActionResult`](super::ActionResult), not through this type. These
//! variants mean the content or the host wiring is wrong.

use crate::error::{ErrorSeverity, GameError};

use super::effect::EffectCategory;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ActionError {
    #[error("cooldown must not be negative, got {0}")]
    NegativeCooldown(f64),

    #[error("no executor is mapped for action `{0}`")]
    UnmappedAction(String),

    #[error("no processor is mapped for effect category {0}")]
    UnmappedEffect(EffectCategory),

    #[error("a mapping for `{0}` already exists")]
    DuplicateMapping(String),

    #[error("action `{0}` is already owned by another entity")]
    AlreadyOwned(String),
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NegativeCooldown(_) | Self::AlreadyOwned(_) => ErrorSeverity::Validation,
            Self::UnmappedAction(_) | Self::UnmappedEffect(_) | Self::DuplicateMapping(_) => {
                ErrorSeverity::Fatal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeCooldown(_) => "ACTION_NEGATIVE_COOLDOWN",
            Self::UnmappedAction(_) => "ACTION_UNMAPPED",
            Self::UnmappedEffect(_) => "ACTION_UNMAPPED_EFFECT",
            Self::DuplicateMapping(_) => "ACTION_DUPLICATE_MAPPING",
            Self::AlreadyOwned(_) => "ACTION_ALREADY_OWNED",
        }
    }
}
