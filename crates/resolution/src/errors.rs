//! Error types for identity resolution

use steamcheck_identity::IdentityError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("Upstream unavailable: {reason}")]
    UpstreamUnavailable { reason: String },

    #[error("Handle not found: {handle}")]
    HandleNotFound { handle: String },

    /// Input matched no identity grammar and no vanity handle either
    #[error("Unrecognised profile reference: {input}")]
    ParseFailure { input: String },
}

pub type Result<T> = std::result::Result<T, ResolutionError>;
