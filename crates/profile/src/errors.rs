//! Error types for profile inspection

use steamcheck_identity::CanonicalIdentity;
use steamcheck_resolution::ResolutionError;
use steamcheck_sdk::SdkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InspectError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("Failed to fetch player summary: {0}")]
    Upstream(#[from] SdkError),

    #[error("Profile not found for {identity} (maybe private or deleted)")]
    ProfileNotFound { identity: CanonicalIdentity },
}

pub type Result<T> = std::result::Result<T, InspectError>;
