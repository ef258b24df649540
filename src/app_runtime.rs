use std::sync::Arc;

use tauri::{webview::PageLoadEvent, AppHandle, Manager, RunEvent};

use crate::{
    append_desktop_log, append_resource_log, append_shutdown_log, append_startup_log,
    embedded_assets::EMBEDDED_ASSETS, logging, main_window, runtime_paths, scheme_protocol,
    startup_config, startup_readiness::LoadingState, startup_task, ShellState, DESKTOP_LOG_FILE,
    MAIN_WINDOW_LABEL,
};

pub fn run() {
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        logging::resolve_desktop_log_path(
            runtime_paths::default_packaged_root_dir(),
            DESKTOP_LOG_FILE,
        )
        .display()
    ));

    let extent = startup_config::window_extent_from_env();
    let shell_state = ShellState::compose(
        EMBEDDED_ASSETS,
        extent,
        append_resource_log,
        append_startup_log,
    );
    shell_state
        .readiness
        .set_state(LoadingState::Initializing, "desktop shell starting");

    let builder = tauri::Builder::default().invoke_handler(tauri::generate_handler![
        crate::desktop_bridge_commands::desktop_bridge_is_desktop_runtime,
        crate::desktop_bridge_commands::desktop_bridge_get_startup_state,
        crate::desktop_bridge_commands::desktop_bridge_get_resource_stats,
    ]);
    scheme_protocol::register_app_scheme(builder, Arc::clone(&shell_state.scheme_handler))
        .manage(shell_state)
        .on_page_load(|webview, payload| {
            if webview.label() != MAIN_WINDOW_LABEL {
                return;
            }

            match payload.event() {
                PageLoadEvent::Started => {
                    append_desktop_log(&format!("page-load started: {}", payload.url()));
                }
                PageLoadEvent::Finished => {
                    append_desktop_log(&format!("page-load finished: {}", payload.url()));
                    if main_window::is_app_document_url(payload.url()) {
                        let state = webview.app_handle().state::<ShellState>();
                        state.readiness.on_content_loaded();
                    }
                }
            }
        })
        .setup(|app| {
            let app_handle = app.handle().clone();
            if let Err(error) = startup_task::run_startup_sequence(&app_handle, append_startup_log)
            {
                fail_startup(&app_handle, &error);
            }
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|_app_handle, event| {
            if let RunEvent::Exit = event {
                append_shutdown_log("desktop process exiting");
            }
        });
}

fn fail_startup(app_handle: &AppHandle, message: &str) {
    let state = app_handle.state::<ShellState>();
    state.readiness.set_error(message);
    eprintln!("Miko startup failed: {message}");
    app_handle.exit(1);
}
