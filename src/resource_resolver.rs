use std::sync::Arc;

use url::Url;

use crate::{
    embedded_assets::EmbeddedAsset,
    logging::LogSink,
    resource_lookup::{ResourceLookup, StaticResourceTable},
    resource_store::ResourceStore,
    INDEX_DOCUMENT_PATH,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("no embedded resource for {url}")]
    NotFound { url: String },
}

impl ResourceError {
    fn not_found(url: &str) -> Self {
        Self::NotFound {
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource {
    pub requested_path: String,
    pub canonical_path: &'static str,
    pub bytes: Arc<[u8]>,
    pub mime_type: &'static str,
}

/// Maps `scheme://host/...` request URLs onto the single bundled document.
pub struct ResourceResolver {
    scheme: String,
    host: String,
    tiers: Vec<Arc<dyn ResourceLookup>>,
    log: LogSink,
}

impl ResourceResolver {
    pub fn new(
        scheme: impl Into<String>,
        host: impl Into<String>,
        tiers: Vec<Arc<dyn ResourceLookup>>,
        log: LogSink,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            tiers,
            log,
        }
    }

    /// Preload cache first, static table second.
    pub fn with_default_tiers(
        scheme: impl Into<String>,
        host: impl Into<String>,
        store: Arc<ResourceStore>,
        assets: &'static [EmbeddedAsset],
        log: LogSink,
    ) -> Self {
        let tiers: Vec<Arc<dyn ResourceLookup>> = vec![
            store,
            Arc::new(StaticResourceTable::from_assets(assets)),
        ];
        Self::new(scheme, host, tiers, log)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Extracts the path of a request aimed at this resolver's origin. Empty and root paths
    /// come back as the index document.
    pub fn requested_path(&self, request_url: &str) -> Option<String> {
        let parsed = Url::parse(request_url.trim()).ok()?;
        if parsed.scheme() != self.scheme.to_ascii_lowercase() {
            return None;
        }
        let host_matches = parsed
            .host_str()
            .is_some_and(|host| host.eq_ignore_ascii_case(&self.host));
        if !host_matches
            || parsed.port().is_some()
            || !parsed.username().is_empty()
            || parsed.password().is_some()
        {
            return None;
        }

        match parsed.path() {
            "" | "/" => Some(INDEX_DOCUMENT_PATH.to_string()),
            path => Some(path.to_string()),
        }
    }

    pub fn resolve(&self, request_url: &str) -> Result<ResolvedResource, ResourceError> {
        let Some(requested_path) = self.requested_path(request_url) else {
            (self.log)(&format!(
                "request {request_url} is outside {}://{}; declining",
                self.scheme, self.host
            ));
            return Err(ResourceError::not_found(request_url));
        };

        // Stylesheets and scripts are inlined into the index document, so every path is served
        // from it.
        let canonical_path = INDEX_DOCUMENT_PATH;
        if requested_path != canonical_path {
            (self.log)(&format!(
                "redirecting {requested_path} to {canonical_path} (single-document bundle)"
            ));
        }

        for tier in &self.tiers {
            if let Some(payload) = tier.lookup(canonical_path) {
                (self.log)(&format!(
                    "serving {canonical_path} from {} ({} bytes)",
                    tier.tier_name(),
                    payload.bytes.len()
                ));
                return Ok(ResolvedResource {
                    requested_path,
                    canonical_path,
                    bytes: payload.bytes,
                    mime_type: payload.mime_type,
                });
            }
        }

        (self.log)(&format!("resource not found for path {canonical_path}"));
        Err(ResourceError::not_found(request_url))
    }
}
