use tauri::{AppHandle, LogicalSize, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use url::Url;

use crate::{
    scheme_handler::canonicalize_engine_url, startup_config::WindowExtent,
    startup_readiness::RevealableWindow, APP_ENTRY_URL, APP_HOST, APP_SCHEME, MAIN_WINDOW_LABEL,
    MAIN_WINDOW_TITLE,
};

/// Creates the main window hidden; it is revealed by the startup state machine.
pub(crate) fn create_hidden_main_window(
    app_handle: &AppHandle,
    extent: WindowExtent,
) -> Result<WebviewWindow, String> {
    if let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) {
        return Ok(window);
    }

    let entry_url = Url::parse(APP_ENTRY_URL)
        .map_err(|error| format!("Invalid app entry url {APP_ENTRY_URL}: {error}"))?;
    WebviewWindowBuilder::new(
        app_handle,
        MAIN_WINDOW_LABEL,
        WebviewUrl::CustomProtocol(entry_url),
    )
    .title(MAIN_WINDOW_TITLE)
    .inner_size(f64::from(extent.width), f64::from(extent.height))
    .visible(false)
    .build()
    .map_err(|error| format!("Failed to create main window: {error}"))
}

/// Whether a page-load URL is the bundled document rather than some navigated-away page.
pub(crate) fn is_app_document_url(url: &Url) -> bool {
    let canonical = canonicalize_engine_url(url.as_str(), APP_SCHEME, APP_HOST);
    Url::parse(&canonical).is_ok_and(|parsed| {
        parsed.scheme() == APP_SCHEME
            && parsed
                .host_str()
                .is_some_and(|host| host.eq_ignore_ascii_case(APP_HOST))
    })
}

pub(crate) struct MainWindowHandle {
    window: WebviewWindow,
}

impl MainWindowHandle {
    pub(crate) fn new(window: WebviewWindow) -> Self {
        Self { window }
    }
}

impl RevealableWindow for MainWindowHandle {
    fn center_with_size(&self, width: u32, height: u32) -> Result<(), String> {
        self.window
            .set_size(LogicalSize::new(f64::from(width), f64::from(height)))
            .map_err(|error| format!("Failed to resize main window: {error}"))?;
        self.window
            .center()
            .map_err(|error| format!("Failed to center main window: {error}"))
    }

    fn show(&self) -> Result<(), String> {
        self.window
            .show()
            .map_err(|error| format!("Failed to show main window: {error}"))?;
        if let Err(error) = self.window.set_focus() {
            crate::append_desktop_log(&format!("failed to focus main window: {error}"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_app_document_url_accepts_scheme_and_webview_forms() {
        for raw in ["miko://app/", "miko://app/index.html", "http://miko.app/"] {
            let url = Url::parse(raw).expect("valid url");
            assert!(is_app_document_url(&url), "url {raw}");
        }
    }

    #[test]
    fn is_app_document_url_rejects_other_origins() {
        for raw in ["https://example.com/", "miko://other/", "about:blank"] {
            let url = Url::parse(raw).expect("valid url");
            assert!(!is_app_document_url(&url), "url {raw}");
        }
    }
}
