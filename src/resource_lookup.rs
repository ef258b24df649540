//! Lookup tiers consulted, in order, by the resource resolver.

use std::{collections::HashMap, sync::Arc};

use crate::{
    embedded_assets::{self, EmbeddedAsset, ResourceId},
    mime_types::mime_type_for_path,
};

/// Bytes and MIME type answered by one lookup tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePayload {
    pub bytes: Arc<[u8]>,
    pub mime_type: &'static str,
}

/// One tier of the resource lookup chain.
pub trait ResourceLookup: Send + Sync {
    /// Short name used in request traces.
    fn tier_name(&self) -> &'static str;

    /// Returns the payload for an exact canonical path, or `None` so the next tier is tried.
    fn lookup(&self, path: &str) -> Option<ResourcePayload>;
}

/// Immutable path → resource id table over the compiled-in assets.
///
/// Unlike the preload cache it copies the asset bytes on every hit.
#[derive(Debug, Clone)]
pub struct StaticResourceTable {
    assets: &'static [EmbeddedAsset],
    ids: HashMap<&'static str, ResourceId>,
}

impl StaticResourceTable {
    pub fn from_assets(assets: &'static [EmbeddedAsset]) -> Self {
        let ids = assets.iter().map(|asset| (asset.path, asset.id)).collect();
        Self { assets, ids }
    }

    pub fn resource_id(&self, path: &str) -> Option<ResourceId> {
        self.ids.get(path).copied()
    }

    /// Copies the bytes for `id` out of the binary. Unknown ids yield an empty buffer.
    pub fn load_binary_resource(&self, id: ResourceId) -> Vec<u8> {
        embedded_assets::find_asset(self.assets, id)
            .map(|asset| asset.bytes.to_vec())
            .unwrap_or_default()
    }
}

impl ResourceLookup for StaticResourceTable {
    fn tier_name(&self) -> &'static str {
        "static table"
    }

    fn lookup(&self, path: &str) -> Option<ResourcePayload> {
        let id = self.resource_id(path)?;
        let bytes = self.load_binary_resource(id);
        if bytes.is_empty() {
            return None;
        }

        Some(ResourcePayload {
            bytes: Arc::from(bytes),
            mime_type: mime_type_for_path(path),
        })
    }
}
