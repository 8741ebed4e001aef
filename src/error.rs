//! Error types shared by the macro model and the persistence gateway

use thiserror::Error;

/// Malformed model data or an edit that would break an invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("mixed combinators in one condition set: {0:?}")]
    MixedCombinators(Vec<String>),

    #[error("unknown combinator: {0:?}")]
    UnknownCombinator(String),

    #[error("a combinator needs at least two rules")]
    CombinatorWithoutPair,

    #[error("condition rule index {index} out of range (len {len})")]
    RuleOutOfRange { index: usize, len: usize },

    #[error("slot index {index} out of range (capacity {capacity})")]
    SlotOutOfRange { index: usize, capacity: usize },

    #[error("unknown condition field: {0:?}")]
    UnknownField(String),

    #[error("unknown operator: {0:?}")]
    UnknownOperator(String),

    #[error("invalid condition value: {0:?}")]
    InvalidValue(String),

    #[error("invalid condition rule: {0:?}")]
    InvalidRule(String),

    #[error("unknown action: {0:?}")]
    UnknownAction(String),

    #[error("invalid key binding: {0:?}")]
    InvalidKeyCombo(String),

    #[error("invalid milliseconds: {0:?}")]
    InvalidMillis(String),

    #[error("preset {0} is already part of the profile")]
    DuplicatePresetRef(u64),

    #[error("preset {0} is not part of the profile")]
    MissingPresetRef(u64),

    #[error("unknown preset {0}")]
    UnknownPreset(u64),

    #[error("profile name must not be empty")]
    EmptyProfileName,
}

/// Failures reported by a persistence gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("operation not supported by this backend: {0}")]
    Unsupported(&'static str),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.status() == Some(reqwest::StatusCode::NOT_FOUND) {
            let what = err.url().map(|u| u.path().to_string()).unwrap_or_default();
            return GatewayError::NotFound(what);
        }
        GatewayError::Transport(err.to_string())
    }
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;
