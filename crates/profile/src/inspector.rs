//! Profile inspector implementation

use crate::errors::*;
use crate::types::*;
use steamcheck_identity::{to_all_formats, CanonicalIdentity};
use steamcheck_resolution::{IdentityResolver, ResolvedIdentity};
use steamcheck_sdk::{OwnedGamesQuery, SteamApiClient};
use tracing::{debug, warn};

/// App whose playtime is reported by default.
pub const DEFAULT_PLAYTIME_APP_ID: u32 = 730;

/// Profile inspector
///
/// Resolves the input, fetches the required profile summary, then runs the
/// optional lookups (bans, friends, playtime, library size) concurrently.
#[derive(Debug, Clone)]
pub struct ProfileInspector {
    client: SteamApiClient,
    resolver: IdentityResolver,
    playtime_app_id: u32,
}

impl ProfileInspector {
    /// Create an inspector whose vanity lookups go through the same client
    pub fn new(client: SteamApiClient) -> Self {
        let resolver = IdentityResolver::with_client(client.clone());
        Self::with_resolver(client, resolver)
    }

    pub fn with_resolver(client: SteamApiClient, resolver: IdentityResolver) -> Self {
        Self {
            client,
            resolver,
            playtime_app_id: DEFAULT_PLAYTIME_APP_ID,
        }
    }

    pub fn with_playtime_app_id(mut self, app_id: u32) -> Self {
        self.playtime_app_id = app_id;
        self
    }

    /// Resolve raw input and build its profile report
    pub async fn inspect(&self, raw: &str) -> Result<ProfileReport> {
        let resolved = self.resolver.resolve(raw).await?;
        self.inspect_resolved(resolved).await
    }

    /// Build the profile report for an already resolved identity
    pub async fn inspect_resolved(&self, resolved: ResolvedIdentity) -> Result<ProfileReport> {
        let id = resolved.identity;
        let summary = self
            .client
            .get_player_summary(id)
            .await?
            .ok_or(InspectError::ProfileNotFound { identity: id })?;

        let (bans, friends, playtime, games) = tokio::join!(
            self.bans(id),
            self.friend_count(id),
            self.playtime(id),
            self.game_count(id),
        );

        let identity_formats = match to_all_formats(&id.to_string()) {
            Ok(formats) => Some(formats),
            Err(err) => {
                warn!(%id, error = %err, "identity format conversion failed");
                None
            }
        };

        Ok(ProfileReport {
            identity_formats,
            persona_name: summary.persona_name,
            real_name: summary.real_name,
            profile_url: summary
                .profile_url
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| id.profile_url()),
            avatar_url: summary.avatar_full.or(summary.avatar),
            country_code: summary.country_code,
            created_at: timestamp(summary.time_created),
            last_online: timestamp(summary.last_logoff),
            visibility: summary
                .community_visibility_state
                .map(CommunityVisibility::from),
            persona_state: summary.persona_state.map(PersonaState::from),
            bans,
            friends,
            playtime,
            games,
            resolved,
        })
    }

    async fn bans(&self, id: CanonicalIdentity) -> Option<BanSummary> {
        match self.client.get_player_bans(id).await {
            Ok(bans) => bans.map(BanSummary::from),
            Err(err) => {
                warn!(%id, error = %err, "ban lookup failed");
                None
            }
        }
    }

    async fn friend_count(&self, id: CanonicalIdentity) -> Lookup<usize> {
        match self.client.get_friend_list(id).await {
            Ok(friends) => friends.map(|list| list.len()).into(),
            Err(err) => {
                debug!(%id, error = %err, "friend list unavailable");
                Lookup::Private
            }
        }
    }

    async fn playtime(&self, id: CanonicalIdentity) -> Lookup<Playtime> {
        match self
            .client
            .get_owned_games(id, OwnedGamesQuery::detailed())
            .await
        {
            Ok(games) => games
                .as_ref()
                .and_then(|games| games.find(self.playtime_app_id))
                .and_then(|game| game.playtime_forever)
                .filter(|minutes| *minutes > 0)
                .map(|minutes| Playtime {
                    app_id: self.playtime_app_id,
                    minutes,
                })
                .into(),
            Err(err) => {
                debug!(%id, error = %err, "owned games unavailable");
                Lookup::Private
            }
        }
    }

    async fn game_count(&self, id: CanonicalIdentity) -> Lookup<u32> {
        match self
            .client
            .get_owned_games(id, OwnedGamesQuery::default())
            .await
        {
            Ok(games) => games
                .and_then(|games| games.game_count)
                .filter(|count| *count > 0)
                .into(),
            Err(err) => {
                debug!(%id, error = %err, "game count unavailable");
                Lookup::Private
            }
        }
    }
}
