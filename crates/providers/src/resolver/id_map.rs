//! Provider id map.

use std::collections::HashMap;

use log::debug;

use super::IdScheme;
use crate::errors::SportsDataError;
use crate::models::DataRequest;
use crate::provider::{thesportsdb, SportsDataProvider};

/// What kind of id a request parameter is.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum IdKind {
    League,
    Match,
}

impl IdKind {
    /// `None` for live requests, whose parameter is a sport code.
    pub fn of(request: &DataRequest) -> Option<Self> {
        match request {
            DataRequest::Live { .. } => None,
            DataRequest::Fixtures { .. } | DataRequest::Standings { .. } => Some(Self::League),
            DataRequest::Odds { .. } => Some(Self::Match),
        }
    }
}

/// API-Football league id -> TheSportsDB league id.
const THESPORTSDB_LEAGUES: &[(&str, &str)] = &[
    ("39", "4328"),  // Premier League
    ("40", "4329"),  // Championship
    ("78", "4331"),  // Bundesliga
    ("61", "4334"),  // Ligue 1
    ("135", "4332"), // Serie A
    ("140", "4335"), // La Liga
    ("88", "4337"),  // Eredivisie
    ("94", "4344"),  // Primeira Liga
    ("179", "4330"), // Scottish Premiership
    ("253", "4346"), // MLS
    ("2", "4480"),   // Champions League
];

/// A request rewritten for one provider.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedRequest {
    /// What the adapter is called with.
    pub request: DataRequest,
    /// Set when the parameter was rewritten; holds the provider's own id so
    /// results can be relabelled back to the canonical one.
    pub native_id: Option<String>,
}

/// Canonical-to-provider id table, keyed by upper-cased provider id.
#[derive(Clone, Debug, Default)]
pub struct IdMap {
    entries: HashMap<(String, IdKind, String), String>,
}

impl IdMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map with the built-in league table for TheSportsDB.
    pub fn builtin() -> Self {
        THESPORTSDB_LEAGUES
            .iter()
            .fold(Self::new(), |map, (canonical, native)| {
                map.with(thesportsdb::PROVIDER_ID, IdKind::League, canonical, native)
            })
    }

    pub fn with(mut self, provider_id: &str, kind: IdKind, canonical: &str, native: &str) -> Self {
        self.insert(provider_id, kind, canonical, native);
        self
    }

    pub fn insert(&mut self, provider_id: &str, kind: IdKind, canonical: &str, native: &str) {
        self.entries.insert(
            (provider_id.to_ascii_uppercase(), kind, canonical.trim().to_string()),
            native.trim().to_string(),
        );
    }

    pub fn lookup(&self, provider_id: &str, kind: IdKind, canonical: &str) -> Option<&str> {
        self.entries
            .get(&(provider_id.to_ascii_uppercase(), kind, canonical.trim().to_string()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite `request` into `provider`'s numbering.
    ///
    /// Canonical providers and live requests pass through unchanged. A mapped
    /// provider without an entry yields [`SportsDataError::NotSupported`].
    pub fn resolve(
        &self,
        provider: &dyn SportsDataProvider,
        request: &DataRequest,
    ) -> Result<ResolvedRequest, SportsDataError> {
        let unchanged = ResolvedRequest {
            request: request.clone(),
            native_id: None,
        };
        if provider.id_scheme() == IdScheme::Canonical {
            return Ok(unchanged);
        }
        let Some(kind) = IdKind::of(request) else {
            return Ok(unchanged);
        };

        let canonical = request.param().trim();
        let native = self.lookup(provider.id(), kind, canonical).ok_or_else(|| {
            SportsDataError::not_supported(
                &format!("{} without an id mapping for '{}'", request.capability(), canonical),
                provider.id(),
            )
        })?;

        debug!("{} {} -> {} for {}", request.capability(), canonical, native, provider.id());
        Ok(ResolvedRequest {
            request: DataRequest::new(request.capability(), native),
            native_id: Some(native.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::models::Capability;
    use crate::provider::ProviderCapabilities;

    struct Numbered(IdScheme);

    #[async_trait]
    impl SportsDataProvider for Numbered {
        fn id(&self) -> &'static str {
            "THESPORTSDB"
        }

        fn id_scheme(&self) -> IdScheme {
            self.0
        }

        fn capabilities(&self) -> ProviderCapabilities {
            ProviderCapabilities {
                capabilities: &[Capability::Fixtures, Capability::Standings],
                sports: &[],
                timeout: None,
            }
        }
    }

    #[test]
    fn test_builtin_maps_premier_league() {
        let map = IdMap::builtin();
        assert_eq!(map.lookup("thesportsdb", IdKind::League, "39"), Some("4328"));
        assert_eq!(map.lookup("THESPORTSDB", IdKind::Match, "39"), None);
        assert_eq!(map.lookup("API_FOOTBALL", IdKind::League, "39"), None);
    }

    #[test]
    fn test_mapped_provider_gets_its_own_id() {
        let map = IdMap::builtin();
        let resolved = map
            .resolve(&Numbered(IdScheme::Mapped), &DataRequest::standings("39"))
            .unwrap();
        assert_eq!(resolved.request, DataRequest::standings("4328"));
        assert_eq!(resolved.native_id.as_deref(), Some("4328"));
    }

    #[test]
    fn test_unmapped_id_is_not_supported() {
        let map = IdMap::builtin();
        let err = map
            .resolve(&Numbered(IdScheme::Mapped), &DataRequest::fixtures("99999"))
            .unwrap_err();
        assert!(matches!(err, SportsDataError::NotSupported { .. }));
    }

    #[test]
    fn test_canonical_provider_and_live_pass_through() {
        let map = IdMap::new();
        let resolved = map
            .resolve(&Numbered(IdScheme::Canonical), &DataRequest::fixtures("39"))
            .unwrap();
        assert_eq!(resolved.request, DataRequest::fixtures("39"));
        assert_eq!(resolved.native_id, None);

        let resolved = map
            .resolve(&Numbered(IdScheme::Mapped), &DataRequest::live("soccer"))
            .unwrap();
        assert_eq!(resolved.request, DataRequest::live("soccer"));
    }
}
