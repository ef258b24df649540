use tauri::{AppHandle, Manager};

use crate::{resource_store::PreloadStats, startup_readiness::ReadinessSnapshot, ShellState};

#[tauri::command]
pub(crate) fn desktop_bridge_is_desktop_runtime() -> bool {
    true
}

#[tauri::command]
pub(crate) fn desktop_bridge_get_startup_state(app_handle: AppHandle) -> ReadinessSnapshot {
    let state = app_handle.state::<ShellState>();
    state.readiness.snapshot()
}

#[tauri::command]
pub(crate) fn desktop_bridge_get_resource_stats(app_handle: AppHandle) -> PreloadStats {
    let state = app_handle.state::<ShellState>();
    state.store.stats()
}
