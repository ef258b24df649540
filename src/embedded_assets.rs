//! Web UI bytes compiled into the binary.
//!
//! The frontend build inlines its stylesheets and scripts into a single HTML document, so the
//! bundle carries exactly one asset.

use crate::INDEX_DOCUMENT_PATH;

/// Opaque identifier of a compiled-in asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId(pub u32);

pub const INDEX_DOCUMENT_ID: ResourceId = ResourceId(100);

#[derive(Debug, Clone, Copy)]
pub struct EmbeddedAsset {
    pub id: ResourceId,
    pub path: &'static str,
    pub bytes: &'static [u8],
}

pub static EMBEDDED_ASSETS: &[EmbeddedAsset] = &[EmbeddedAsset {
    id: INDEX_DOCUMENT_ID,
    path: INDEX_DOCUMENT_PATH,
    bytes: include_bytes!("../webui/index.html"),
}];

pub fn find_asset(assets: &[EmbeddedAsset], id: ResourceId) -> Option<&EmbeddedAsset> {
    assets.iter().find(|asset| asset.id == id)
}
