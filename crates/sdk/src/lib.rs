mod error;

pub use crate::error::SdkError;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use steamcheck_identity::CanonicalIdentity;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default Web API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.steampowered.com/";

/// Request timeout applied by [`SteamApiClient::new`].
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// `success` discriminator the vanity endpoint reports for a match.
pub const VANITY_MATCH: i64 = 1;

/// Longest error body kept in [`SdkError::ServerError`].
const MAX_ERROR_BODY: usize = 256;

/// Convenience HTTP client for the platform Web API.
#[derive(Clone)]
pub struct SteamApiClient {
    base_url: Url,
    api_key: String,
    http: Client,
}

impl std::fmt::Debug for SteamApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SteamApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl SteamApiClient {
    /// Create a new client with the provided base URL (e.g. `https://api.steampowered.com/`).
    pub fn new(base_url: impl AsRef<str>, api_key: impl Into<String>) -> Result<Self, SdkError> {
        Self::with_timeout(base_url, api_key, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(
        base_url: impl AsRef<str>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SdkError> {
        Self::with_http_client(
            base_url,
            api_key,
            Client::builder().timeout(timeout).build()?,
        )
    }

    /// Use an existing reqwest client (useful for custom TLS or middleware).
    pub fn with_http_client(
        base_url: impl AsRef<str>,
        api_key: impl Into<String>,
        http: Client,
    ) -> Result<Self, SdkError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SdkError::MissingApiKey);
        }

        let mut url = Url::parse(base_url.as_ref())
            .map_err(|_| SdkError::InvalidBaseUrl(base_url.as_ref().to_string()))?;
        if url.cannot_be_a_base() {
            return Err(SdkError::InvalidBaseUrl(base_url.as_ref().to_string()));
        }
        if !url.path().ends_with('/') {
            let mut path = url.path().trim_end_matches('/').to_owned();
            path.push('/');
            url.set_path(&path);
        }
        Ok(Self {
            base_url: url,
            api_key,
            http,
        })
    }

    /// Expose the underlying base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Look up a vanity name.
    ///
    /// A well-formed "no match" answer is returned as a [`VanityLookup`] whose
    /// [`matched_steamid`](VanityLookup::matched_steamid) is `None`; only
    /// transport failures and non-success statuses are errors.
    pub async fn resolve_vanity_url(&self, vanity: &str) -> Result<VanityLookup, SdkError> {
        let envelope = self
            .get_json::<ResponseEnvelope<VanityLookup>>(
                "ISteamUser/ResolveVanityURL/v1/",
                &[("vanityurl", vanity)],
            )
            .await?;
        Ok(envelope.response.unwrap_or_default())
    }

    /// Fetch the public profile summary for one identity.
    pub async fn get_player_summary(
        &self,
        steamid: CanonicalIdentity,
    ) -> Result<Option<PlayerSummary>, SdkError> {
        let steamid = steamid.to_string();
        let envelope = self
            .get_json::<ResponseEnvelope<PlayersView<PlayerSummaryView>>>(
                "ISteamUser/GetPlayerSummaries/v2/",
                &[("steamids", steamid.as_str())],
            )
            .await?;
        Ok(envelope
            .response
            .and_then(|players| players.players.into_iter().next())
            .map(PlayerSummary::from))
    }

    /// Fetch ban records for one identity.
    pub async fn get_player_bans(
        &self,
        steamid: CanonicalIdentity,
    ) -> Result<Option<PlayerBans>, SdkError> {
        let steamid = steamid.to_string();
        let players = self
            .get_json::<PlayersView<PlayerBansView>>(
                "ISteamUser/GetPlayerBans/v1/",
                &[("steamids", steamid.as_str())],
            )
            .await?;
        Ok(players.players.into_iter().next().map(PlayerBans::from))
    }

    /// Fetch the friend list. `None` when the upstream omits it.
    pub async fn get_friend_list(
        &self,
        steamid: CanonicalIdentity,
    ) -> Result<Option<Vec<Friend>>, SdkError> {
        let steamid = steamid.to_string();
        let response = self
            .get_json::<FriendListResponse>(
                "ISteamUser/GetFriendList/v1/",
                &[("steamid", steamid.as_str())],
            )
            .await?;
        Ok(response.friendslist.and_then(|list| list.friends))
    }

    /// Fetch the owned-games listing. `None` when the upstream returns an
    /// empty response object, which is how hidden libraries are reported.
    pub async fn get_owned_games(
        &self,
        steamid: CanonicalIdentity,
        query: OwnedGamesQuery,
    ) -> Result<Option<OwnedGames>, SdkError> {
        let steamid = steamid.to_string();
        let mut params = vec![("steamid", steamid.as_str())];
        if query.include_appinfo {
            params.push(("include_appinfo", "1"));
        }
        if query.include_played_free_games {
            params.push(("include_played_free_games", "1"));
        }

        let envelope = self
            .get_json::<ResponseEnvelope<OwnedGamesView>>(
                "IPlayerService/GetOwnedGames/v1/",
                &params,
            )
            .await?;
        Ok(envelope.response.and_then(OwnedGames::from_view))
    }

    async fn get_json<T>(&self, path: &str, params: &[(&str, &str)]) -> Result<T, SdkError>
    where
        T: DeserializeOwned,
    {
        let mut url = self.base_url.join(path)?;
        debug!(endpoint = path, "upstream request");
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .extend_pairs(params.iter().copied());
        // reqwest errors carry the request URL, which includes the key
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| SdkError::Http(err.without_url()))?;
        Self::map_response(path, response).await
    }

    async fn map_response<T>(path: &str, response: Response) -> Result<T, SdkError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            debug!(endpoint = path, status = status.as_u16(), "upstream rejected request");
            return Err(Self::map_api_error(response).await);
        }
        response
            .json::<T>()
            .await
            .map_err(|err| SdkError::Http(err.without_url()))
    }

    async fn map_api_error(response: Response) -> SdkError {
        let status = response.status();
        let bytes = response.bytes().await.unwrap_or_default();
        let text = String::from_utf8_lossy(&bytes);
        let message = match text.trim() {
            "" => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
            body => body.chars().take(MAX_ERROR_BODY).collect(),
        };
        SdkError::server_error(status.as_u16(), message)
    }
}

/// Optional flags for `GetOwnedGames`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnedGamesQuery {
    pub include_appinfo: bool,
    pub include_played_free_games: bool,
}

impl OwnedGamesQuery {
    /// Include app metadata and free-to-play titles (needed for playtime lookups).
    pub fn detailed() -> Self {
        Self {
            include_appinfo: true,
            include_played_free_games: true,
        }
    }
}

/// Answer of the vanity lookup endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VanityLookup {
    #[serde(default)]
    pub success: Option<i64>,
    #[serde(default)]
    pub steamid: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl VanityLookup {
    /// The identity token, present only when the discriminator reports a match.
    pub fn matched_steamid(&self) -> Option<&str> {
        match (self.success, self.steamid.as_deref()) {
            (Some(VANITY_MATCH), Some(steamid)) => Some(steamid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlayerSummary {
    pub steamid: String,
    pub persona_name: Option<String>,
    pub real_name: Option<String>,
    pub profile_url: Option<String>,
    pub avatar: Option<String>,
    pub avatar_full: Option<String>,
    pub country_code: Option<String>,
    /// Unix seconds
    pub time_created: Option<i64>,
    /// Unix seconds
    pub last_logoff: Option<i64>,
    pub community_visibility_state: Option<i64>,
    pub persona_state: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct PlayerBans {
    pub steamid: String,
    pub community_banned: bool,
    pub vac_banned: bool,
    pub number_of_vac_bans: u32,
    pub days_since_last_ban: u32,
    pub number_of_game_bans: u32,
    pub economy_ban: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Friend {
    pub steamid: String,
    #[serde(default)]
    pub relationship: Option<String>,
    #[serde(default)]
    pub friend_since: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct OwnedGames {
    pub game_count: Option<u32>,
    pub games: Vec<OwnedGame>,
}

impl OwnedGames {
    fn from_view(view: OwnedGamesView) -> Option<Self> {
        if view.game_count.is_none() && view.games.is_none() {
            return None;
        }
        Some(Self {
            game_count: view.game_count,
            games: view.games.unwrap_or_default(),
        })
    }

    pub fn find(&self, appid: u32) -> Option<&OwnedGame> {
        self.games.iter().find(|game| game.appid == appid)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnedGame {
    pub appid: u32,
    #[serde(default)]
    pub name: Option<String>,
    /// Minutes
    #[serde(default)]
    pub playtime_forever: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ResponseEnvelope<T> {
    response: Option<T>,
}

#[derive(Debug, Deserialize)]
struct PlayersView<T> {
    #[serde(default = "Vec::new")]
    players: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct PlayerSummaryView {
    steamid: String,
    #[serde(default)]
    personaname: Option<String>,
    #[serde(default)]
    realname: Option<String>,
    #[serde(default)]
    profileurl: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default)]
    avatarfull: Option<String>,
    #[serde(default)]
    loccountrycode: Option<String>,
    #[serde(default)]
    timecreated: Option<i64>,
    #[serde(default)]
    lastlogoff: Option<i64>,
    #[serde(default)]
    communityvisibilitystate: Option<i64>,
    #[serde(default)]
    personastate: Option<i64>,
}

impl From<PlayerSummaryView> for PlayerSummary {
    fn from(view: PlayerSummaryView) -> Self {
        Self {
            steamid: view.steamid,
            persona_name: view.personaname,
            real_name: view.realname,
            profile_url: view.profileurl,
            avatar: view.avatar,
            avatar_full: view.avatarfull,
            country_code: view.loccountrycode,
            time_created: view.timecreated,
            last_logoff: view.lastlogoff,
            community_visibility_state: view.communityvisibilitystate,
            persona_state: view.personastate,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlayerBansView {
    #[serde(rename = "SteamId")]
    steam_id: String,
    #[serde(rename = "CommunityBanned", default)]
    community_banned: bool,
    #[serde(rename = "VACBanned", default)]
    vac_banned: bool,
    #[serde(rename = "NumberOfVACBans", default)]
    number_of_vac_bans: u32,
    #[serde(rename = "DaysSinceLastBan", default)]
    days_since_last_ban: u32,
    #[serde(rename = "NumberOfGameBans", default)]
    number_of_game_bans: u32,
    #[serde(rename = "EconomyBan", default)]
    economy_ban: Option<String>,
}

impl From<PlayerBansView> for PlayerBans {
    fn from(view: PlayerBansView) -> Self {
        Self {
            steamid: view.steam_id,
            community_banned: view.community_banned,
            vac_banned: view.vac_banned,
            number_of_vac_bans: view.number_of_vac_bans,
            days_since_last_ban: view.days_since_last_ban,
            number_of_game_bans: view.number_of_game_bans,
            economy_ban: view.economy_ban.unwrap_or_else(|| "none".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FriendListResponse {
    #[serde(default)]
    friendslist: Option<FriendListView>,
}

#[derive(Debug, Deserialize)]
struct FriendListView {
    #[serde(default)]
    friends: Option<Vec<Friend>>,
}

#[derive(Debug, Deserialize)]
struct OwnedGamesView {
    #[serde(default)]
    game_count: Option<u32>,
    #[serde(default)]
    games: Option<Vec<OwnedGame>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = SteamApiClient::new("http://127.0.0.1:9/api", "key").unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:9/api/");
    }

    #[test]
    fn rejects_invalid_base_url_and_blank_key() {
        assert!(matches!(
            SteamApiClient::new("not a url", "key"),
            Err(SdkError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            SteamApiClient::new(DEFAULT_API_BASE_URL, "  "),
            Err(SdkError::MissingApiKey)
        ));
    }

    #[test]
    fn debug_output_redacts_key() {
        let client = SteamApiClient::new(DEFAULT_API_BASE_URL, "super-secret").unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn vanity_lookup_requires_match_discriminator() {
        let found: ResponseEnvelope<VanityLookup> = serde_json::from_str(
            r#"{"response":{"steamid":"76561197960290419","success":1}}"#,
        )
        .unwrap();
        assert_eq!(
            found.response.unwrap().matched_steamid(),
            Some("76561197960290419")
        );

        let missing: ResponseEnvelope<VanityLookup> =
            serde_json::from_str(r#"{"response":{"success":42,"message":"No match"}}"#).unwrap();
        assert_eq!(missing.response.unwrap().matched_steamid(), None);

        let no_id: ResponseEnvelope<VanityLookup> =
            serde_json::from_str(r#"{"response":{"success":1}}"#).unwrap();
        assert_eq!(no_id.response.unwrap().matched_steamid(), None);

        let empty: ResponseEnvelope<VanityLookup> = serde_json::from_str("{}").unwrap();
        assert!(empty.response.is_none());
    }

    #[test]
    fn bans_default_economy_to_none() {
        let view: PlayerBansView = serde_json::from_str(
            r#"{"SteamId":"76561197960290419","VACBanned":true,"NumberOfVACBans":2}"#,
        )
        .unwrap();
        let bans = PlayerBans::from(view);
        assert!(bans.vac_banned);
        assert_eq!(bans.number_of_vac_bans, 2);
        assert!(!bans.community_banned);
        assert_eq!(bans.economy_ban, "none");
    }

    #[test]
    fn hidden_library_maps_to_none() {
        let view: OwnedGamesView = serde_json::from_str("{}").unwrap();
        assert!(OwnedGames::from_view(view).is_none());

        let view: OwnedGamesView = serde_json::from_str(
            r#"{"game_count":2,"games":[{"appid":730,"playtime_forever":90},{"appid":10}]}"#,
        )
        .unwrap();
        let games = OwnedGames::from_view(view).unwrap();
        assert_eq!(games.game_count, Some(2));
        assert_eq!(games.find(730).and_then(|g| g.playtime_forever), Some(90));
        assert!(games.find(440).is_none());
    }
}
