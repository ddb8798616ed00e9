//! Four-way identity format bundle

use crate::errors::*;
use crate::identity::*;
use serde::{Deserialize, Serialize};

/// Every encoding of one identity, derived together from the same account id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityFormats {
    /// Canonical 64-bit value as given (not necessarily above the base offset)
    pub canonical: u64,
    pub account_id: AccountId,
    pub legacy: LegacyIdentity,
    pub universe_qualified: UniverseQualifiedIdentity,
}

impl IdentityFormats {
    fn derive(canonical: u64) -> Self {
        let account_id = AccountId::new(i128::from(canonical) - i128::from(BASE_OFFSET));
        Self {
            canonical,
            account_id,
            legacy: LegacyIdentity::from_account_id(account_id),
            universe_qualified: UniverseQualifiedIdentity::new(account_id),
        }
    }
}

impl From<CanonicalIdentity> for IdentityFormats {
    fn from(identity: CanonicalIdentity) -> Self {
        Self::derive(identity.as_u64())
    }
}

/// Convert a raw canonical token into all display formats.
///
/// Only fails when the token is not an unsigned 64-bit integer. Values below
/// the base offset are converted anyway and yield a negative account id.
pub fn to_all_formats(raw: &str) -> Result<IdentityFormats> {
    parse_decimal_u64(raw.trim()).map(IdentityFormats::derive)
}
