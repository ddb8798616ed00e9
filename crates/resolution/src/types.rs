//! Types for identity resolution

use serde::{Deserialize, Serialize};
use steamcheck_identity::{CanonicalIdentity, IdentityFormats, InputGrammar};

/// Resolved identity information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    /// The trimmed operator input
    pub input: String,
    /// Canonical identity it resolved to
    pub identity: CanonicalIdentity,
    /// Resolution method used
    pub method: ResolutionMethod,
}

/// Resolution method used for identity lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMethod {
    /// Canonical id taken from a profile URL
    ProfileUrl,
    /// Handle taken from a vanity URL, resolved upstream
    VanityUrl,
    /// Input was already a canonical id
    BareCanonical,
    /// Converted from `STEAM_X:Y:Z`
    Legacy,
    /// Converted from `U:1:N`
    UniverseQualified,
    /// Whole input treated as a vanity handle, resolved upstream
    VanityHandle,
}

impl From<InputGrammar> for ResolutionMethod {
    fn from(grammar: InputGrammar) -> Self {
        match grammar {
            InputGrammar::ProfileUrl => ResolutionMethod::ProfileUrl,
            InputGrammar::VanityUrl => ResolutionMethod::VanityUrl,
            InputGrammar::BareCanonical => ResolutionMethod::BareCanonical,
            InputGrammar::Legacy => ResolutionMethod::Legacy,
            InputGrammar::UniverseQualified => ResolutionMethod::UniverseQualified,
            InputGrammar::Fallback => ResolutionMethod::VanityHandle,
        }
    }
}

impl ResolutionMethod {
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionMethod::ProfileUrl => "profile URL",
            ResolutionMethod::VanityUrl => "vanity URL",
            ResolutionMethod::BareCanonical => "canonical id",
            ResolutionMethod::Legacy => "legacy id",
            ResolutionMethod::UniverseQualified => "universe-qualified id",
            ResolutionMethod::VanityHandle => "vanity handle",
        }
    }
}

impl ResolvedIdentity {
    pub fn new(
        input: impl Into<String>,
        identity: CanonicalIdentity,
        method: ResolutionMethod,
    ) -> Self {
        Self {
            input: input.into(),
            identity,
            method,
        }
    }

    /// Check if this went through an upstream vanity lookup
    pub fn is_vanity_resolved(&self) -> bool {
        matches!(
            self.method,
            ResolutionMethod::VanityUrl | ResolutionMethod::VanityHandle
        )
    }

    /// All display encodings of the resolved identity
    pub fn formats(&self) -> IdentityFormats {
        IdentityFormats::from(self.identity)
    }
}
