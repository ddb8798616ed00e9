//! Report types produced by profile inspection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use steamcheck_identity::IdentityFormats;
use steamcheck_resolution::ResolvedIdentity;
use steamcheck_sdk::PlayerBans;

/// Marker shown when a lookup is hidden by privacy settings or failed.
pub const PRIVATE_MARKER: &str = "<Private>";

/// Outcome of a best-effort metadata lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Lookup<T> {
    Available(T),
    /// Hidden by the player's privacy settings, missing, or the lookup failed
    Private,
}

impl<T> Lookup<T> {
    pub fn is_private(&self) -> bool {
        matches!(self, Lookup::Private)
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Lookup::Private, Lookup::Available)
    }
}

impl<T: fmt::Display> fmt::Display for Lookup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Available(value) => value.fmt(f),
            Lookup::Private => f.write_str(PRIVATE_MARKER),
        }
    }
}

/// Community profile visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunityVisibility {
    Private,
    FriendsOnly,
    Public,
    Unknown(i64),
}

impl From<i64> for CommunityVisibility {
    fn from(code: i64) -> Self {
        match code {
            1 => CommunityVisibility::Private,
            2 => CommunityVisibility::FriendsOnly,
            3 => CommunityVisibility::Public,
            other => CommunityVisibility::Unknown(other),
        }
    }
}

impl fmt::Display for CommunityVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommunityVisibility::Private => f.write_str("Private"),
            CommunityVisibility::FriendsOnly => f.write_str("Friends Only"),
            CommunityVisibility::Public => f.write_str("Public"),
            CommunityVisibility::Unknown(code) => write!(f, "Unknown ({code})"),
        }
    }
}

/// Online status reported in the profile summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaState {
    Offline,
    Online,
    Busy,
    Away,
    Snooze,
    LookingToTrade,
    LookingToPlay,
    Unknown(i64),
}

impl From<i64> for PersonaState {
    fn from(code: i64) -> Self {
        match code {
            0 => PersonaState::Offline,
            1 => PersonaState::Online,
            2 => PersonaState::Busy,
            3 => PersonaState::Away,
            4 => PersonaState::Snooze,
            5 => PersonaState::LookingToTrade,
            6 => PersonaState::LookingToPlay,
            other => PersonaState::Unknown(other),
        }
    }
}

impl fmt::Display for PersonaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonaState::Offline => f.write_str("Offline"),
            PersonaState::Online => f.write_str("Online"),
            PersonaState::Busy => f.write_str("Busy"),
            PersonaState::Away => f.write_str("Away"),
            PersonaState::Snooze => f.write_str("Snooze"),
            PersonaState::LookingToTrade => f.write_str("Looking to Trade"),
            PersonaState::LookingToPlay => f.write_str("Looking to Play"),
            PersonaState::Unknown(code) => write!(f, "Unknown ({code})"),
        }
    }
}

/// Ban record summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanSummary {
    pub vac_banned: bool,
    pub vac_ban_count: u32,
    pub game_ban_count: u32,
    pub days_since_last_ban: u32,
    pub community_banned: bool,
    /// Economy ban state as reported upstream; `"none"` means no restriction
    pub economy_ban: String,
}

impl BanSummary {
    pub fn is_trade_restricted(&self) -> bool {
        !self.economy_ban.is_empty() && self.economy_ban != "none"
    }
}

impl From<PlayerBans> for BanSummary {
    fn from(bans: PlayerBans) -> Self {
        Self {
            vac_banned: bans.vac_banned,
            vac_ban_count: bans.number_of_vac_bans,
            game_ban_count: bans.number_of_game_bans,
            days_since_last_ban: bans.days_since_last_ban,
            community_banned: bans.community_banned,
            economy_ban: bans.economy_ban,
        }
    }
}

/// Total playtime in one tracked app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playtime {
    pub app_id: u32,
    pub minutes: u64,
}

impl Playtime {
    pub fn hours(&self) -> f64 {
        self.minutes as f64 / 60.0
    }
}

impl fmt::Display for Playtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} hours", self.hours())
    }
}

/// Everything gathered for one profile, as plain data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileReport {
    pub resolved: ResolvedIdentity,
    /// Display encodings; `None` when conversion failed
    pub identity_formats: Option<IdentityFormats>,
    pub persona_name: Option<String>,
    pub real_name: Option<String>,
    pub profile_url: String,
    pub avatar_url: Option<String>,
    pub country_code: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_online: Option<DateTime<Utc>>,
    pub visibility: Option<CommunityVisibility>,
    pub persona_state: Option<PersonaState>,
    /// `None` when the ban lookup failed or returned no record
    pub bans: Option<BanSummary>,
    pub friends: Lookup<usize>,
    pub playtime: Lookup<Playtime>,
    pub games: Lookup<u32>,
}

/// Convert a unix timestamp, treating zero and out-of-range values as absent.
pub(crate) fn timestamp(seconds: Option<i64>) -> Option<DateTime<Utc>> {
    seconds
        .filter(|secs| *secs > 0)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_labels() {
        assert_eq!(CommunityVisibility::from(1).to_string(), "Private");
        assert_eq!(CommunityVisibility::from(2).to_string(), "Friends Only");
        assert_eq!(CommunityVisibility::from(3).to_string(), "Public");
        assert_eq!(CommunityVisibility::from(9).to_string(), "Unknown (9)");
    }

    #[test]
    fn persona_state_labels() {
        assert_eq!(PersonaState::from(0).to_string(), "Offline");
        assert_eq!(PersonaState::from(5).to_string(), "Looking to Trade");
        assert_eq!(PersonaState::from(6).to_string(), "Looking to Play");
        assert_eq!(PersonaState::from(-1).to_string(), "Unknown (-1)");
    }

    #[test]
    fn lookup_renders_private_marker() {
        assert_eq!(Lookup::<u32>::Private.to_string(), "<Private>");
        assert_eq!(Lookup::Available(12u32).to_string(), "12");
        assert!(Lookup::<u32>::from(None).is_private());
    }

    #[test]
    fn playtime_renders_one_decimal() {
        let playtime = Playtime {
            app_id: 730,
            minutes: 125,
        };
        assert_eq!(playtime.to_string(), "2.1 hours");
    }

    #[test]
    fn economy_ban_none_is_clean() {
        let mut bans = BanSummary {
            vac_banned: false,
            vac_ban_count: 0,
            game_ban_count: 0,
            days_since_last_ban: 0,
            community_banned: false,
            economy_ban: "none".into(),
        };
        assert!(!bans.is_trade_restricted());
        bans.economy_ban = "banned".into();
        assert!(bans.is_trade_restricted());
    }

    #[test]
    fn zero_timestamp_is_absent() {
        assert!(timestamp(Some(0)).is_none());
        assert!(timestamp(None).is_none());
        assert_eq!(
            timestamp(Some(1_063_407_589)).map(|t| t.timestamp()),
            Some(1_063_407_589)
        );
    }
}
