use std::sync::Arc;

use crate::{
    embedded_assets::EmbeddedAsset, logging::LogSink, resource_resolver::ResourceResolver,
    resource_store::ResourceStore, scheme_handler::SchemeRequestHandler,
    startup_config::WindowExtent, startup_readiness::StartupReadiness, APP_HOST, APP_SCHEME,
};

/// Shared services built once by the composition root and handed to every callback that needs
/// them.
#[derive(Clone)]
pub struct ShellState {
    pub store: Arc<ResourceStore>,
    pub resolver: Arc<ResourceResolver>,
    pub scheme_handler: Arc<SchemeRequestHandler>,
    pub readiness: Arc<StartupReadiness>,
}

impl ShellState {
    pub fn compose(
        assets: &'static [EmbeddedAsset],
        extent: WindowExtent,
        resource_log: LogSink,
        startup_log: LogSink,
    ) -> Self {
        let store = Arc::new(ResourceStore::new(assets, resource_log));
        let resolver = Arc::new(ResourceResolver::with_default_tiers(
            APP_SCHEME,
            APP_HOST,
            Arc::clone(&store),
            assets,
            resource_log,
        ));
        let scheme_handler = Arc::new(SchemeRequestHandler::new(
            Arc::clone(&resolver),
            resource_log,
        ));
        let readiness = Arc::new(StartupReadiness::new(extent, startup_log));

        Self {
            store,
            resolver,
            scheme_handler,
            readiness,
        }
    }
}
