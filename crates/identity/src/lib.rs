//! Player identity resolution primitives
//!
//! Provides the canonical 64-bit identity and its three derived encodings
//! (flat account id, legacy `STEAM_0:Y:Z`, universe-qualified `U:1:N`),
//! along with the ordered grammar table used to classify raw operator input.
//! Everything here is pure and synchronous; network lookups for vanity
//! handles live in `steamcheck-resolution`.

pub mod errors;
pub mod formats;
pub mod identity;
pub mod parser;

pub use errors::*;
pub use formats::*;
pub use identity::*;
pub use parser::*;
