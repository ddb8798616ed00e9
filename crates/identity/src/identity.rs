use crate::errors::*;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Offset separating the canonical 64-bit identity space from account ids.
pub const BASE_OFFSET: u64 = 76_561_197_960_265_728;

/// Largest account id that still maps into the canonical 64-bit space.
pub const MAX_ACCOUNT_ID: u64 = u64::MAX - BASE_OFFSET;

/// Public community URL prefix for profiles addressed by canonical id.
pub const PROFILE_URL_PREFIX: &str = "https://steamcommunity.com/profiles/";

static LEGACY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^STEAM_[0-9]:([0-9]):([0-9]+)$").expect("legacy identity pattern")
});

static UNIVERSE_QUALIFIED_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^U:1:([0-9]+)$").expect("universe-qualified identity pattern"));

/// Parse a bare decimal token into a `u64`.
///
/// Signs, separators and whitespace are rejected so that only digit runs
/// are treated as numeric identities.
pub(crate) fn parse_decimal_u64(token: &str) -> Result<u64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IdentityError::malformed(token, "not a decimal integer"));
    }
    token
        .parse::<u64>()
        .map_err(|_| IdentityError::malformed(token, "exceeds the 64-bit range"))
}

/// Platform-wide 64-bit player identity.
///
/// Always at or above [`BASE_OFFSET`]; serialised as a decimal string, which
/// is how the upstream Web API exchanges it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CanonicalIdentity(u64);

impl CanonicalIdentity {
    /// Wrap a raw 64-bit value, rejecting anything below the base offset.
    pub fn new(value: u64) -> Result<Self> {
        if value < BASE_OFFSET {
            return Err(IdentityError::malformed(
                value.to_string(),
                "below the canonical base offset",
            ));
        }
        Ok(Self(value))
    }

    /// Rebuild the canonical identity for an account id.
    pub fn from_account_id(account_id: AccountId) -> Result<Self> {
        if !account_id.is_valid() {
            return Err(IdentityError::malformed(
                account_id.to_string(),
                "account id outside the canonical range",
            ));
        }
        // is_valid bounds the value to [0, MAX_ACCOUNT_ID]
        Ok(Self(BASE_OFFSET + account_id.value() as u64))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Per-universe account number (`canonical - BASE_OFFSET`).
    pub fn account_id(&self) -> AccountId {
        AccountId::new(i128::from(self.0) - i128::from(BASE_OFFSET))
    }

    pub fn legacy(&self) -> LegacyIdentity {
        LegacyIdentity::from_account_id(self.account_id())
    }

    pub fn universe_qualified(&self) -> UniverseQualifiedIdentity {
        UniverseQualifiedIdentity::new(self.account_id())
    }

    /// Community profile URL addressed by this identity.
    pub fn profile_url(&self) -> String {
        format!("{PROFILE_URL_PREFIX}{}", self.0)
    }
}

impl fmt::Display for CanonicalIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CanonicalIdentity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(parse_decimal_u64(s)?)
    }
}

impl TryFrom<String> for CanonicalIdentity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CanonicalIdentity> for String {
    fn from(value: CanonicalIdentity) -> Self {
        value.to_string()
    }
}

impl From<CanonicalIdentity> for u64 {
    fn from(value: CanonicalIdentity) -> Self {
        value.0
    }
}

/// Account number derived as `canonical - BASE_OFFSET`.
///
/// Signed and wide so that conversions over unvalidated input can surface a
/// negative value instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(i128);

impl AccountId {
    pub const fn new(value: i128) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> i128 {
        self.0
    }

    /// Whether this account id maps back onto a canonical identity.
    pub fn is_valid(&self) -> bool {
        self.0 >= 0 && self.0 <= i128::from(MAX_ACCOUNT_ID)
    }
}

impl From<u64> for AccountId {
    fn from(value: u64) -> Self {
        Self(i128::from(value))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Legacy colon-delimited encoding `STEAM_0:<auth_server>:<account_number>`.
///
/// `account_id = account_number * 2 + auth_server`. The split uses truncated
/// remainder semantics, so a negative account id yields `auth_server == -1`
/// and still reconstructs exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LegacyIdentity {
    pub auth_server: i8,
    pub account_number: i128,
}

impl LegacyIdentity {
    /// Universe digit rendered in the legacy encoding.
    pub const UNIVERSE: u8 = 0;

    pub fn from_account_id(account_id: AccountId) -> Self {
        let raw = account_id.value();
        let auth_server = raw % 2;
        Self {
            auth_server: auth_server as i8,
            account_number: (raw - auth_server) / 2,
        }
    }

    pub fn account_id(&self) -> AccountId {
        AccountId::new(self.account_number * 2 + i128::from(self.auth_server))
    }

    /// Whether `input` has the legacy shape, regardless of payload validity.
    pub fn matches(input: &str) -> bool {
        LEGACY_PATTERN.is_match(input)
    }
}

impl fmt::Display for LegacyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "STEAM_{}:{}:{}",
            Self::UNIVERSE,
            self.auth_server,
            self.account_number
        )
    }
}

impl FromStr for LegacyIdentity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = LEGACY_PATTERN
            .captures(s)
            .ok_or_else(|| IdentityError::malformed(s, "not a legacy STEAM_X:Y:Z identity"))?;

        let auth_server = match &caps[1] {
            "0" => 0,
            "1" => 1,
            _ => {
                return Err(IdentityError::malformed(
                    s,
                    "auth server digit must be 0 or 1",
                ))
            }
        };
        let account_number = parse_decimal_u64(&caps[2])
            .map_err(|_| IdentityError::malformed(s, "account number exceeds the 64-bit range"))?;

        Ok(Self {
            auth_server,
            account_number: i128::from(account_number),
        })
    }
}

impl TryFrom<String> for LegacyIdentity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<LegacyIdentity> for String {
    fn from(value: LegacyIdentity) -> Self {
        value.to_string()
    }
}

/// Universe-qualified encoding `U:1:<account_id>` (individual account type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UniverseQualifiedIdentity {
    pub account_id: AccountId,
}

impl UniverseQualifiedIdentity {
    /// Account type tag for individual accounts.
    pub const ACCOUNT_TYPE: char = 'U';
    /// Universe number rendered in the encoding.
    pub const UNIVERSE: u8 = 1;

    pub fn new(account_id: AccountId) -> Self {
        Self { account_id }
    }

    pub fn matches(input: &str) -> bool {
        UNIVERSE_QUALIFIED_PATTERN.is_match(input)
    }
}

impl fmt::Display for UniverseQualifiedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            Self::ACCOUNT_TYPE,
            Self::UNIVERSE,
            self.account_id
        )
    }
}

impl FromStr for UniverseQualifiedIdentity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = UNIVERSE_QUALIFIED_PATTERN
            .captures(s)
            .ok_or_else(|| IdentityError::malformed(s, "not a U:1:N identity"))?;
        let account_id = parse_decimal_u64(&caps[1])
            .map_err(|_| IdentityError::malformed(s, "account id exceeds the 64-bit range"))?;
        Ok(Self::new(AccountId::from(account_id)))
    }
}

impl TryFrom<String> for UniverseQualifiedIdentity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<UniverseQualifiedIdentity> for String {
    fn from(value: UniverseQualifiedIdentity) -> Self {
        value.to_string()
    }
}
