//! Canonical id resolution.
//!
//! League and match ids carried by a [`DataRequest`](crate::DataRequest) use
//! API-Football's numbering. Providers that number things differently report
//! [`IdScheme::Mapped`] and have their requests rewritten through an
//! [`IdMap`] before the call. A mapped provider with no entry for an id is
//! never asked with the canonical one.

mod id_map;

pub use id_map::{IdKind, IdMap, ResolvedRequest};

/// How a provider numbers leagues and matches.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum IdScheme {
    /// The provider's ids are the canonical ids.
    #[default]
    Canonical,
    /// The provider has its own ids; requests go through the id map.
    Mapped,
}
