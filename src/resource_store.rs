//! Preload cache for the embedded web UI.
//!
//! The cache is filled once from the compiled-in asset bytes and never evicts: a miss can only
//! be observed for paths that were never bundled.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use serde::Serialize;

use crate::{
    embedded_assets::EmbeddedAsset,
    logging::LogSink,
    mime_types::mime_type_for_path,
    resource_lookup::{ResourceLookup, ResourcePayload},
};

/// A preloaded resource. The byte buffer is shared and never mutated after it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResource {
    data: Arc<[u8]>,
    mime_type: &'static str,
    loaded: bool,
}

impl CachedResource {
    fn from_asset(asset: &EmbeddedAsset) -> Self {
        Self {
            data: Arc::from(asset.bytes),
            mime_type: mime_type_for_path(asset.path),
            loaded: true,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn shared_data(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreloadStats {
    pub total_resources: usize,
    pub loaded_resources: usize,
    pub total_bytes: usize,
    pub all_loaded: bool,
}

#[derive(Debug, Default)]
struct StoreInner {
    initialized: bool,
    resources: HashMap<String, Arc<CachedResource>>,
}

pub struct ResourceStore {
    assets: &'static [EmbeddedAsset],
    inner: Mutex<StoreInner>,
    log: LogSink,
}

impl ResourceStore {
    pub fn new(assets: &'static [EmbeddedAsset], log: LogSink) -> Self {
        Self {
            assets,
            inner: Mutex::new(StoreInner::default()),
            log,
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        // Entries are inserted whole, so a poisoned guard still holds consistent data.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fills the cache if no caller has done so yet. Returns `true` only for the call that
    /// performed the population pass.
    pub fn ensure_initialized(&self) -> bool {
        let report = {
            let mut inner = self.lock();
            self.populate_locked(&mut inner)
        };
        match report {
            Some(report) => {
                self.log_population(&report);
                true
            }
            None => false,
        }
    }

    fn populate_locked(&self, inner: &mut StoreInner) -> Option<PopulationReport> {
        if inner.initialized {
            return None;
        }

        let mut report = PopulationReport::default();
        for asset in self.assets {
            if asset.bytes.is_empty() {
                report.skipped.push(asset.path);
                continue;
            }
            let resource = CachedResource::from_asset(asset);
            report.loaded_bytes += resource.len();
            report.loaded += 1;
            inner
                .resources
                .insert(asset.path.to_string(), Arc::new(resource));
        }
        inner.initialized = true;
        Some(report)
    }

    fn log_population(&self, report: &PopulationReport) {
        for path in &report.skipped {
            (self.log)(&format!(
                "embedded resource {path} has no bytes in this build; not preloaded"
            ));
        }
        (self.log)(&format!(
            "preloaded {} embedded resource(s), {} bytes",
            report.loaded, report.loaded_bytes
        ));
    }

    /// Returns the loaded resource stored under the exact `path`, initializing on first use.
    pub fn get(&self, path: &str) -> Option<Arc<CachedResource>> {
        let (resource, report) = {
            let mut inner = self.lock();
            let report = self.populate_locked(&mut inner);
            let resource = inner
                .resources
                .get(path)
                .filter(|resource| resource.is_loaded())
                .cloned();
            (resource, report)
        };
        if let Some(report) = report {
            self.log_population(&report);
        }
        resource
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }

    pub fn stats(&self) -> PreloadStats {
        let inner = self.lock();
        let total_resources = inner.resources.len();
        let (loaded_resources, total_bytes) = inner
            .resources
            .values()
            .filter(|resource| resource.is_loaded())
            .fold((0, 0), |(count, bytes), resource| {
                (count + 1, bytes + resource.len())
            });

        PreloadStats {
            total_resources,
            loaded_resources,
            total_bytes,
            all_loaded: total_resources > 0 && loaded_resources == total_resources,
        }
    }
}

impl ResourceLookup for ResourceStore {
    fn tier_name(&self) -> &'static str {
        "preload cache"
    }

    fn lookup(&self, path: &str) -> Option<ResourcePayload> {
        self.get(path).map(|resource| ResourcePayload {
            bytes: resource.shared_data(),
            mime_type: resource.mime_type(),
        })
    }
}

#[derive(Debug, Default)]
struct PopulationReport {
    loaded: usize,
    loaded_bytes: usize,
    skipped: Vec<&'static str>,
}
