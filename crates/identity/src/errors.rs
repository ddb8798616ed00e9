//! Error types for identity parsing and conversion

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Malformed identity '{input}': {reason}")]
    MalformedIdentity { input: String, reason: &'static str },

    #[error("Empty identity input")]
    EmptyInput,
}

impl IdentityError {
    pub(crate) fn malformed(input: impl Into<String>, reason: &'static str) -> Self {
        IdentityError::MalformedIdentity {
            input: input.into(),
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;
