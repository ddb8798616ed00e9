//! Identity Resolution Service
//!
//! Resolves raw operator input to a canonical identity with support for:
//! - Profile URLs and bare canonical ids (no resolution needed)
//! - Legacy `STEAM_X:Y:Z` and universe-qualified `U:1:N` forms
//! - Vanity URLs and bare vanity handles (resolved upstream, tried last)

pub mod errors;
pub mod resolver;
pub mod types;

pub use errors::*;
pub use resolver::*;
pub use types::*;
