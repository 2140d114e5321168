use thiserror::Error;

use crate::parse::ParseError;
use crate::registry::RegistryError;
use crate::RuleError;

/// The three ways a rule request can fail, as seen by the API layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself is wrong; do not retry it unchanged.
    Client,
    /// The action type has no rule flow.
    NotImplemented,
    /// Infrastructure failure; retrying the whole request is safe.
    Server,
}

/// Unified error type returned by every [`mapper`](crate::mapper) entry point.
#[derive(Debug, Error)]
pub enum ActionRuleError {
    #[error("invalid rule: {0}")]
    InvalidRule(#[from] RuleError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("malformed rule payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("conditional rules are not implemented for action type '{action_type}'")]
    NotImplemented { action_type: String },

    #[error("failed to initialize rule builder: {0}")]
    Registry(#[from] RegistryError),

    #[error("failed to encode rule response: {0}")]
    Encode(serde_json::Error),
}

impl ActionRuleError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ActionRuleError::InvalidRule(_)
            | ActionRuleError::Parse(_)
            | ActionRuleError::Malformed(_) => ErrorKind::Client,
            ActionRuleError::NotImplemented { .. } => ErrorKind::NotImplemented,
            ActionRuleError::Registry(_) | ActionRuleError::Encode(_) => ErrorKind::Server,
        }
    }
}
