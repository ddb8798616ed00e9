//! Input grammar classification
//!
//! Raw operator input is matched against a fixed, ordered table of grammars.
//! The first grammar whose shape matches decides the outcome, even when its
//! payload later proves invalid; nothing falls through to a later grammar.

use crate::errors::*;
use crate::identity::*;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static PROFILE_URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)steamcommunity\.com/profiles/([0-9]{17,})").expect("profile URL pattern")
});

static VANITY_URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)steamcommunity\.com/id/([A-Za-z0-9_-]+)").expect("vanity URL pattern")
});

static BARE_CANONICAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{17,}$").expect("bare canonical pattern"));

/// Recognised input grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputGrammar {
    /// `.../profiles/<17+ digits>`
    ProfileUrl,
    /// `.../id/<handle>`
    VanityUrl,
    /// Whole input is a run of 17+ digits
    BareCanonical,
    /// `STEAM_X:Y:Z`
    Legacy,
    /// `U:1:N`
    UniverseQualified,
    /// Anything else, treated as a vanity handle
    Fallback,
}

impl InputGrammar {
    /// Grammars in the order they are tried. `Fallback` always matches and
    /// therefore comes last.
    pub const PRIORITY: [InputGrammar; 6] = [
        InputGrammar::ProfileUrl,
        InputGrammar::VanityUrl,
        InputGrammar::BareCanonical,
        InputGrammar::Legacy,
        InputGrammar::UniverseQualified,
        InputGrammar::Fallback,
    ];

    /// Attempt this grammar against already-trimmed input.
    ///
    /// `None` means the shape did not match and the next grammar should be
    /// tried; `Some` is final.
    fn try_match(self, input: &str) -> Option<Result<ParsedInput>> {
        match self {
            InputGrammar::ProfileUrl => PROFILE_URL_PATTERN
                .captures(input)
                .map(|caps| self.resolved(caps[1].parse())),
            InputGrammar::VanityUrl => VANITY_URL_PATTERN
                .captures(input)
                .map(|caps| Ok(self.needs_name_resolution(&caps[1]))),
            InputGrammar::BareCanonical => BARE_CANONICAL_PATTERN
                .is_match(input)
                .then(|| self.resolved(input.parse())),
            InputGrammar::Legacy => LegacyIdentity::matches(input).then(|| {
                self.resolved(
                    input
                        .parse::<LegacyIdentity>()
                        .and_then(|legacy| CanonicalIdentity::from_account_id(legacy.account_id())),
                )
            }),
            InputGrammar::UniverseQualified => UniverseQualifiedIdentity::matches(input).then(|| {
                self.resolved(
                    input
                        .parse::<UniverseQualifiedIdentity>()
                        .and_then(|uq| CanonicalIdentity::from_account_id(uq.account_id)),
                )
            }),
            InputGrammar::Fallback => Some(Ok(self.needs_name_resolution(input))),
        }
    }

    fn resolved(self, identity: Result<CanonicalIdentity>) -> Result<ParsedInput> {
        identity.map(|identity| ParsedInput::Resolved {
            identity,
            grammar: self,
        })
    }

    fn needs_name_resolution(self, handle: &str) -> ParsedInput {
        ParsedInput::NeedsNameResolution {
            handle: handle.to_string(),
            grammar: self,
        }
    }
}

/// Outcome of classifying raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedInput {
    /// Deterministically resolved without any network lookup
    Resolved {
        identity: CanonicalIdentity,
        grammar: InputGrammar,
    },
    /// A vanity handle that must be resolved upstream
    NeedsNameResolution {
        handle: String,
        grammar: InputGrammar,
    },
}

impl ParsedInput {
    pub fn grammar(&self) -> InputGrammar {
        match self {
            ParsedInput::Resolved { grammar, .. }
            | ParsedInput::NeedsNameResolution { grammar, .. } => *grammar,
        }
    }
}

/// Classifies raw input into a canonical identity or a vanity handle.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityParser;

impl IdentityParser {
    pub fn new() -> Self {
        Self
    }

    /// Trim `raw` and run it through the grammar table in priority order.
    pub fn classify(&self, raw: &str) -> Result<ParsedInput> {
        let input = raw.trim();
        if input.is_empty() {
            return Err(IdentityError::EmptyInput);
        }

        InputGrammar::PRIORITY
            .iter()
            .find_map(|grammar| grammar.try_match(input))
            .unwrap_or_else(|| Ok(InputGrammar::Fallback.needs_name_resolution(input)))
    }
}
