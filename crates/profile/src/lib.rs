//! Profile inspection
//!
//! Resolves operator input to a canonical identity, then gathers the public
//! profile summary together with best-effort ban, friend, playtime and
//! library lookups. Every optional lookup degrades to an unknown or private
//! marker instead of failing the whole report.

pub mod errors;
pub mod inspector;
pub mod types;

pub use errors::*;
pub use inspector::*;
pub use types::*;
