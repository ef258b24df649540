//! Startup state machine gating the first appearance of the main window.
//!
//! Two signals decide when the window may be revealed: the runtime reaching
//! [`LoadingState::Ready`] and the webview reporting that the document finished loading. They
//! arrive from different threads in no particular order, so both entry points re-check the full
//! precondition and the reveal is claimed under the same lock that guards the state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::{logging::LogSink, startup_config::WindowExtent};

const PROGRESS_LOG_STEP: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadingState {
    Initializing,
    PreloadingResources,
    CreatingWindow,
    LoadingContent,
    Ready,
    Error,
}

impl LoadingState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initializing => "INITIALIZING",
            Self::PreloadingResources => "PRELOADING_RESOURCES",
            Self::CreatingWindow => "CREATING_WINDOW",
            Self::LoadingContent => "LOADING_CONTENT",
            Self::Ready => "READY",
            Self::Error => "ERROR",
        }
    }

    /// Progress assigned on entering the state. `Error` keeps whatever was reached.
    pub fn milestone_progress(self) -> Option<f32> {
        match self {
            Self::Initializing => Some(0.1),
            Self::PreloadingResources => Some(0.3),
            Self::CreatingWindow => Some(0.5),
            Self::LoadingContent => Some(0.8),
            Self::Ready => Some(1.0),
            Self::Error => None,
        }
    }
}

/// The platform window revealed once startup completes.
pub trait RevealableWindow: Send + Sync {
    fn center_with_size(&self, width: u32, height: u32) -> Result<(), String>;
    fn show(&self) -> Result<(), String>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessSnapshot {
    pub state: LoadingState,
    pub state_message: String,
    pub progress: f32,
    pub content_loaded: bool,
    pub window_assigned: bool,
    pub window_shown: bool,
    pub error: Option<String>,
}

struct ReadinessInner {
    state: LoadingState,
    state_message: String,
    error_message: String,
    progress: f32,
    last_logged_progress: f32,
    content_loaded: bool,
    window_shown: bool,
    window: Option<Arc<dyn RevealableWindow>>,
}

impl ReadinessInner {
    /// Stores a clamped progress value and returns a log line when a milestone was crossed.
    fn store_progress(&mut self, value: f32) -> Option<String> {
        self.progress = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0)
        };

        if self.progress - self.last_logged_progress >= PROGRESS_LOG_STEP || self.progress >= 1.0 {
            self.last_logged_progress = self.progress;
            return Some(format!(
                "loading progress: {}%",
                (self.progress * 100.0).round() as u32
            ));
        }
        None
    }

    /// Claims the one-time reveal. Only succeeds while ready, loaded, unshown and with a window.
    fn claim_reveal(&mut self) -> Option<Arc<dyn RevealableWindow>> {
        if self.window_shown || self.state != LoadingState::Ready || !self.content_loaded {
            return None;
        }
        let window = self.window.clone()?;
        self.window_shown = true;
        Some(window)
    }
}

pub struct StartupReadiness {
    inner: Mutex<ReadinessInner>,
    extent: WindowExtent,
    log: LogSink,
}

impl StartupReadiness {
    pub fn new(extent: WindowExtent, log: LogSink) -> Self {
        Self {
            inner: Mutex::new(ReadinessInner {
                state: LoadingState::Initializing,
                state_message: String::new(),
                error_message: String::new(),
                progress: 0.0,
                last_logged_progress: -1.0,
                content_loaded: false,
                window_shown: false,
                window: None,
            }),
            extent,
            log,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ReadinessInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn window_extent(&self) -> WindowExtent {
        self.extent
    }

    pub fn set_state(&self, state: LoadingState, message: &str) {
        let (progress_line, reveal) = {
            let mut inner = self.lock();
            if inner.state == LoadingState::Error {
                drop(inner);
                (self.log)(&format!(
                    "ignoring transition to {}: startup already failed",
                    state.as_str()
                ));
                return;
            }

            inner.state = state;
            inner.state_message = message.to_string();
            let progress_line = state
                .milestone_progress()
                .and_then(|progress| inner.store_progress(progress));
            let reveal = if state == LoadingState::Ready {
                inner.claim_reveal()
            } else {
                None
            };
            (progress_line, reveal)
        };

        if message.is_empty() {
            (self.log)(&format!("loading state: {}", state.as_str()));
        } else {
            (self.log)(&format!("loading state: {} - {}", state.as_str(), message));
        }
        if let Some(line) = progress_line {
            (self.log)(&line);
        }
        if let Some(window) = reveal {
            self.reveal(window);
        }
    }

    pub fn state(&self) -> LoadingState {
        self.lock().state
    }

    pub fn state_message(&self) -> String {
        self.lock().state_message.clone()
    }

    pub fn set_progress(&self, value: f32) {
        let progress_line = self.lock().store_progress(value);
        if let Some(line) = progress_line {
            (self.log)(&line);
        }
    }

    pub fn progress(&self) -> f32 {
        self.lock().progress
    }

    /// Records the window to reveal later. Assigning a window never shows it by itself.
    pub fn set_window(&self, window: Arc<dyn RevealableWindow>) {
        self.lock().window = Some(window);
        (self.log)("window reference set");
    }

    pub fn on_content_loaded(&self) {
        let reveal = {
            let mut inner = self.lock();
            inner.content_loaded = true;
            inner.claim_reveal()
        };
        (self.log)("content loaded");
        if let Some(window) = reveal {
            self.reveal(window);
        }
    }

    pub fn is_content_loaded(&self) -> bool {
        self.lock().content_loaded
    }

    pub fn is_window_shown(&self) -> bool {
        self.lock().window_shown
    }

    /// Forces the terminal `Error` state. Progress is left where it was.
    pub fn set_error(&self, message: &str) {
        {
            let mut inner = self.lock();
            inner.error_message = message.to_string();
            inner.state_message = message.to_string();
            inner.state = LoadingState::Error;
        }
        (self.log)(&format!(
            "loading state: {} - {}",
            LoadingState::Error.as_str(),
            message
        ));
        (self.log)(&format!("startup error: {message}"));
    }

    pub fn has_error(&self) -> bool {
        self.lock().state == LoadingState::Error
    }

    pub fn error(&self) -> String {
        self.lock().error_message.clone()
    }

    pub fn snapshot(&self) -> ReadinessSnapshot {
        let inner = self.lock();
        ReadinessSnapshot {
            state: inner.state,
            state_message: inner.state_message.clone(),
            progress: inner.progress,
            content_loaded: inner.content_loaded,
            window_assigned: inner.window.is_some(),
            window_shown: inner.window_shown,
            error: (inner.state == LoadingState::Error).then(|| inner.error_message.clone()),
        }
    }

    // Runs outside the lock: platform window calls may hop to the UI thread.
    fn reveal(&self, window: Arc<dyn RevealableWindow>) {
        (self.log)("showing window - all loading complete");
        if let Err(error) = window.center_with_size(self.extent.width, self.extent.height) {
            (self.log)(&format!("failed to center window: {error}"));
        }
        match window.show() {
            Ok(()) => (self.log)("window is now visible"),
            Err(error) => {
                (self.log)(&format!("failed to show window: {error}"));
                self.lock().window_shown = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    use super::*;

    fn quiet(_: &str) {}

    #[derive(Default)]
    struct RecordingWindow {
        shows: AtomicUsize,
        centered: Mutex<Vec<(u32, u32)>>,
        fail_show: AtomicBool,
    }

    impl RevealableWindow for RecordingWindow {
        fn center_with_size(&self, width: u32, height: u32) -> Result<(), String> {
            self.centered
                .lock()
                .expect("centered lock")
                .push((width, height));
            Ok(())
        }

        fn show(&self) -> Result<(), String> {
            if self.fail_show.load(Ordering::SeqCst) {
                return Err("window gone".to_string());
            }
            self.shows.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn readiness_with_window() -> (StartupReadiness, Arc<RecordingWindow>) {
        let readiness = StartupReadiness::new(WindowExtent::default(), quiet);
        let window = Arc::new(RecordingWindow::default());
        readiness.set_window(window.clone());
        (readiness, window)
    }

    #[test]
    fn new_machine_starts_initializing_and_hidden() {
        let readiness = StartupReadiness::new(WindowExtent::default(), quiet);
        assert_eq!(readiness.state(), LoadingState::Initializing);
        assert_eq!(readiness.progress(), 0.0);
        assert!(!readiness.is_content_loaded());
        assert!(!readiness.is_window_shown());
        assert!(!readiness.has_error());
    }

    #[test]
    fn set_state_assigns_milestone_progress() {
        let readiness = StartupReadiness::new(WindowExtent::default(), quiet);
        let expected = [
            (LoadingState::Initializing, 0.1),
            (LoadingState::PreloadingResources, 0.3),
            (LoadingState::CreatingWindow, 0.5),
            (LoadingState::LoadingContent, 0.8),
            (LoadingState::Ready, 1.0),
        ];
        for (state, progress) in expected {
            readiness.set_state(state, "step");
            assert_eq!(readiness.state(), state);
            assert_eq!(readiness.progress(), progress);
            assert_eq!(readiness.state_message(), "step");
        }
    }

    #[test]
    fn set_progress_clamps_to_unit_range() {
        let readiness = StartupReadiness::new(WindowExtent::default(), quiet);
        readiness.set_progress(-1.0);
        assert_eq!(readiness.progress(), 0.0);
        readiness.set_progress(5.0);
        assert_eq!(readiness.progress(), 1.0);
        readiness.set_progress(0.42);
        assert_eq!(readiness.progress(), 0.42);
        readiness.set_progress(f32::NAN);
        assert_eq!(readiness.progress(), 0.0);
    }

    #[test]
    fn set_window_alone_does_not_show() {
        let (readiness, window) = readiness_with_window();
        assert_eq!(window.shows.load(Ordering::SeqCst), 0);
        assert!(!readiness.is_window_shown());
    }

    #[test]
    fn content_loaded_before_ready_waits_for_ready() {
        let (readiness, window) = readiness_with_window();
        readiness.set_state(LoadingState::LoadingContent, "");
        readiness.on_content_loaded();
        assert_eq!(window.shows.load(Ordering::SeqCst), 0);
        assert!(!readiness.is_window_shown());

        readiness.set_state(LoadingState::Ready, "");
        assert_eq!(window.shows.load(Ordering::SeqCst), 1);
        assert!(readiness.is_window_shown());
        assert_eq!(
            *window.centered.lock().expect("centered lock"),
            vec![(1200, 800)]
        );
    }

    #[test]
    fn ready_before_content_loaded_shows_on_content_loaded() {
        let (readiness, window) = readiness_with_window();
        readiness.set_state(LoadingState::Ready, "");
        assert_eq!(window.shows.load(Ordering::SeqCst), 0);

        readiness.on_content_loaded();
        assert_eq!(window.shows.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn repeated_signals_show_only_once() {
        let (readiness, window) = readiness_with_window();
        readiness.on_content_loaded();
        readiness.set_state(LoadingState::Ready, "");
        readiness.set_state(LoadingState::Ready, "again");
        readiness.on_content_loaded();
        assert_eq!(window.shows.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_window_is_a_silent_no_op() {
        let readiness = StartupReadiness::new(WindowExtent::default(), quiet);
        readiness.on_content_loaded();
        readiness.set_state(LoadingState::Ready, "");
        assert!(!readiness.is_window_shown());

        let window = Arc::new(RecordingWindow::default());
        readiness.set_window(window.clone());
        assert_eq!(window.shows.load(Ordering::SeqCst), 0);
        readiness.on_content_loaded();
        assert_eq!(window.shows.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn uses_configured_extent() {
        let extent = WindowExtent {
            width: 1440,
            height: 900,
        };
        let readiness = StartupReadiness::new(extent, quiet);
        let window = Arc::new(RecordingWindow::default());
        readiness.set_window(window.clone());
        readiness.on_content_loaded();
        readiness.set_state(LoadingState::Ready, "");
        assert_eq!(
            *window.centered.lock().expect("centered lock"),
            vec![(1440, 900)]
        );
    }

    #[test]
    fn failed_show_releases_the_claim() {
        let (readiness, window) = readiness_with_window();
        window.fail_show.store(true, Ordering::SeqCst);
        readiness.set_state(LoadingState::Ready, "");
        readiness.on_content_loaded();
        assert!(!readiness.is_window_shown());

        window.fail_show.store(false, Ordering::SeqCst);
        readiness.on_content_loaded();
        assert!(readiness.is_window_shown());
        assert_eq!(window.shows.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn racing_signals_show_exactly_once() {
        const ROUNDS: usize = 64;
        const THREADS_PER_SIGNAL: usize = 4;

        for _ in 0..ROUNDS {
            let (readiness, window) = readiness_with_window();
            let barrier = Barrier::new(THREADS_PER_SIGNAL * 2);
            thread::scope(|scope| {
                for _ in 0..THREADS_PER_SIGNAL {
                    scope.spawn(|| {
                        barrier.wait();
                        readiness.set_state(LoadingState::Ready, "");
                    });
                    scope.spawn(|| {
                        barrier.wait();
                        readiness.on_content_loaded();
                    });
                }
            });
            assert_eq!(window.shows.load(Ordering::SeqCst), 1);
            assert!(readiness.is_window_shown());
        }
    }

    #[test]
    fn set_error_is_terminal() {
        let (readiness, window) = readiness_with_window();
        readiness.set_state(LoadingState::CreatingWindow, "");
        readiness.set_error("x");
        assert_eq!(readiness.state(), LoadingState::Error);
        assert!(readiness.has_error());
        assert_eq!(readiness.error(), "x");
        assert_eq!(readiness.progress(), 0.5);

        readiness.set_state(LoadingState::Ready, "");
        readiness.on_content_loaded();
        assert_eq!(readiness.state(), LoadingState::Error);
        assert_eq!(window.shows.load(Ordering::SeqCst), 0);
        assert!(!readiness.is_window_shown());
    }

    #[test]
    fn set_error_overrides_any_prior_state() {
        for state in [
            LoadingState::Initializing,
            LoadingState::PreloadingResources,
            LoadingState::LoadingContent,
            LoadingState::Ready,
        ] {
            let readiness = StartupReadiness::new(WindowExtent::default(), quiet);
            readiness.set_state(state, "");
            readiness.set_error("boom");
            assert_eq!(readiness.state(), LoadingState::Error);
            assert!(readiness.has_error());
        }
    }

    #[test]
    fn snapshot_serializes_for_the_bridge() {
        let (readiness, _window) = readiness_with_window();
        readiness.set_state(LoadingState::LoadingContent, "miko://app/");
        let json = serde_json::to_value(readiness.snapshot()).expect("serialize snapshot");
        assert_eq!(json["state"], "LOADING_CONTENT");
        assert_eq!(json["stateMessage"], "miko://app/");
        assert_eq!(json["contentLoaded"], false);
        assert_eq!(json["windowAssigned"], true);
        assert_eq!(json["windowShown"], false);
        assert!(json["error"].is_null());
    }
}
