//! Common error infrastructure for rpg-core.
//!
//! Domain errors (`StatError`, `PropertyError`, `EffectError`, `ActionError`,
//! `ParseError`) live next to the code that raises them. [`CoreError`] is the
//! umbrella returned by [`crate::World`] operations that can touch more than
//! one domain.
//!
//! Gate failures are not errors: an action whose requirements are unmet
//! yields an unsuccessful [`crate::ActionResult`]. Everything in this module
//! describes a caller or configuration mistake.

use crate::action::ActionError;
use crate::effect::EffectError;
use crate::parse::ParseError;
use crate::state::{ActionId, EffectId, EntityId, PropertyError, PropertyId};
use crate::stats::StatError;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the call can be retried after the world changes
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: a handle or binding the engine expected is gone
/// - **Fatal**: the content configuration cannot run (e.g. unmapped effect category)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug or broken content.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all rpg-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for log fields and assertions in tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Umbrella error for world operations.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Stat(#[from] StatError),

    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error(transparent)]
    Effect(#[from] EffectError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("entity {0} does not exist")]
    MissingEntity(EntityId),

    #[error("property {0} does not exist")]
    MissingProperty(PropertyId),

    #[error("effect {0} does not exist")]
    MissingEffect(EffectId),

    #[error("action {0} does not exist")]
    MissingAction(ActionId),

    #[error("entity {0} cannot be its own accessory")]
    SelfAccessory(EntityId),
}

impl GameError for CoreError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Stat(err) => err.severity(),
            Self::Property(err) => err.severity(),
            Self::Effect(err) => err.severity(),
            Self::Action(err) => err.severity(),
            Self::Parse(err) => err.severity(),
            Self::MissingEntity(_)
            | Self::MissingProperty(_)
            | Self::MissingEffect(_)
            | Self::MissingAction(_) => ErrorSeverity::Internal,
            Self::SelfAccessory(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Stat(err) => err.error_code(),
            Self::Property(err) => err.error_code(),
            Self::Effect(err) => err.error_code(),
            Self::Action(err) => err.error_code(),
            Self::Parse(err) => err.error_code(),
            Self::MissingEntity(_) => "CORE_MISSING_ENTITY",
            Self::MissingProperty(_) => "CORE_MISSING_PROPERTY",
            Self::MissingEffect(_) => "CORE_MISSING_EFFECT",
            Self::MissingAction(_) => "CORE_MISSING_ACTION",
            Self::SelfAccessory(_) => "CORE_SELF_ACCESSORY",
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
