//! Identity resolver implementation

use crate::errors::*;
use crate::types::*;
use async_trait::async_trait;
use std::sync::Arc;
use steamcheck_identity::{CanonicalIdentity, IdentityParser, InputGrammar, ParsedInput};
use steamcheck_sdk::SteamApiClient;
use tracing::{debug, warn};

/// Resolves a vanity handle to a canonical identity.
///
/// The only step of resolution that leaves the process.
#[async_trait]
pub trait VanityResolver: Send + Sync {
    async fn resolve_vanity(&self, handle: &str) -> Result<CanonicalIdentity>;
}

/// Vanity resolver backed by the upstream Web API.
#[derive(Debug, Clone)]
pub struct SteamVanityResolver {
    client: SteamApiClient,
}

impl SteamVanityResolver {
    pub fn new(client: SteamApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VanityResolver for SteamVanityResolver {
    async fn resolve_vanity(&self, handle: &str) -> Result<CanonicalIdentity> {
        let lookup = self.client.resolve_vanity_url(handle).await.map_err(|err| {
            warn!(handle, error = %err, "vanity lookup failed");
            ResolutionError::UpstreamUnavailable {
                reason: err.to_string(),
            }
        })?;

        let steamid = lookup
            .matched_steamid()
            .ok_or_else(|| ResolutionError::HandleNotFound {
                handle: handle.to_string(),
            })?;

        Ok(steamid.parse::<CanonicalIdentity>()?)
    }
}

/// Identity resolver
///
/// Resolves raw input using, in order:
/// 1. Deterministic grammars (profile URL, canonical id, legacy, universe-qualified)
/// 2. Upstream vanity lookup, only when no deterministic grammar applies
#[derive(Clone)]
pub struct IdentityResolver {
    parser: IdentityParser,
    vanity: Arc<dyn VanityResolver>,
}

impl IdentityResolver {
    /// Create a new identity resolver
    pub fn new(vanity: Arc<dyn VanityResolver>) -> Self {
        Self {
            parser: IdentityParser::new(),
            vanity,
        }
    }

    /// Resolver backed by the upstream Web API.
    pub fn with_client(client: SteamApiClient) -> Self {
        Self::new(Arc::new(SteamVanityResolver::new(client)))
    }

    /// Resolve raw input to a ResolvedIdentity
    pub async fn resolve(&self, raw: &str) -> Result<ResolvedIdentity> {
        let parsed = self.parser.classify(raw)?;
        let method = ResolutionMethod::from(parsed.grammar());

        let identity = match parsed {
            ParsedInput::Resolved { identity, .. } => identity,
            ParsedInput::NeedsNameResolution { handle, grammar } => {
                debug!(handle = %handle, "resolving vanity handle upstream");
                match self.vanity.resolve_vanity(&handle).await {
                    Ok(identity) => identity,
                    // Only a /id/ link is known to be a handle; anything else
                    // was merely unrecognised input.
                    Err(ResolutionError::HandleNotFound { .. })
                        if grammar == InputGrammar::Fallback =>
                    {
                        return Err(ResolutionError::ParseFailure { input: handle });
                    }
                    Err(err) => return Err(err),
                }
            }
        };

        debug!(%identity, method = method.label(), "identity resolved");
        Ok(ResolvedIdentity::new(raw.trim(), identity, method))
    }
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver").finish_non_exhaustive()
    }
}
