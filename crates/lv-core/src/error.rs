use thiserror::Error;

use crate::unit::UnitId;

/// Errors raised by the interaction engine
///
/// Configuration problems surface when a unit is configured, never while a
/// behaviour is being dispatched.
#[derive(Error, Debug)]
pub enum InteractionError {
    #[error("behaviour '{behaviour}' maps to unknown side effect '{name}'")]
    UnknownSideEffect { behaviour: String, name: String },

    #[error("side effect '{0}' is already registered")]
    DuplicateSideEffect(String),

    #[error("unit {0} is already dispatching a behaviour")]
    Reentrant(UnitId),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}
