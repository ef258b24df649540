use std::sync::Arc;

use tauri::{AppHandle, Manager};

use crate::{
    main_window::{self, MainWindowHandle},
    resource_store::PreloadStats,
    startup_readiness::LoadingState,
    ShellState, APP_ENTRY_URL,
};

/// Walks the startup milestones on the setup thread. The window is revealed later, once the
/// page-load hook reports the document as loaded.
pub(crate) fn run_startup_sequence<F>(app_handle: &AppHandle, log: F) -> Result<(), String>
where
    F: Fn(&str),
{
    let state = app_handle.state::<ShellState>();
    let readiness = &state.readiness;

    readiness.set_state(LoadingState::PreloadingResources, "embedded web ui");
    state.store.ensure_initialized();
    let stats = state.store.stats();
    log(&preload_report(&stats));
    if stats.loaded_resources == 0 {
        return Err("Embedded web UI is missing from this build.".to_string());
    }

    readiness.set_state(LoadingState::CreatingWindow, "");
    let window = main_window::create_hidden_main_window(app_handle, readiness.window_extent())?;
    readiness.set_window(Arc::new(MainWindowHandle::new(window)));

    readiness.set_state(LoadingState::LoadingContent, APP_ENTRY_URL);
    readiness.set_state(LoadingState::Ready, "main window created");
    Ok(())
}

pub(crate) fn preload_report(stats: &PreloadStats) -> String {
    let summary = serde_json::to_string(stats).unwrap_or_else(|_| format!("{stats:?}"));
    if stats.all_loaded {
        format!("resource preload complete: {summary}")
    } else {
        format!("resource preload incomplete: {summary}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preload_report_flags_incomplete_preload() {
        let stats = PreloadStats {
            total_resources: 0,
            loaded_resources: 0,
            total_bytes: 0,
            all_loaded: false,
        };
        assert_eq!(
            preload_report(&stats),
            "resource preload incomplete: {\"totalResources\":0,\"loadedResources\":0,\"totalBytes\":0,\"allLoaded\":false}"
        );
    }

    #[test]
    fn preload_report_summarizes_complete_preload() {
        let stats = PreloadStats {
            total_resources: 1,
            loaded_resources: 1,
            total_bytes: 2048,
            all_loaded: true,
        };
        assert!(preload_report(&stats).starts_with("resource preload complete: "));
        assert!(preload_report(&stats).contains("\"totalBytes\":2048"));
    }
}
