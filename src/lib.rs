pub mod app_constants;
mod app_helpers;
mod app_types;
pub mod embedded_assets;
pub mod logging;
pub mod mime_types;
pub mod resource_lookup;
pub mod resource_resolver;
pub mod resource_store;
pub mod runtime_paths;
pub mod scheme_handler;
pub mod startup_config;
pub mod startup_readiness;

#[cfg(feature = "desktop-shell")]
mod app_runtime;
#[cfg(feature = "desktop-shell")]
mod desktop_bridge_commands;
#[cfg(feature = "desktop-shell")]
mod main_window;
#[cfg(feature = "desktop-shell")]
mod scheme_protocol;
#[cfg(feature = "desktop-shell")]
mod startup_task;

pub use app_constants::*;
pub use app_helpers::{
    append_desktop_log, append_resource_log, append_shutdown_log, append_startup_log,
};
pub use app_types::ShellState;

#[cfg(feature = "desktop-shell")]
pub use app_runtime::run;
