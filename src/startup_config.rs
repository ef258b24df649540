//! Environment-driven knobs for the desktop shell.

use std::env;

use serde::Serialize;

use crate::{
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, LOG_STDERR_ENV, WINDOW_HEIGHT_ENV,
    WINDOW_HEIGHT_MAX, WINDOW_HEIGHT_MIN, WINDOW_WIDTH_ENV, WINDOW_WIDTH_MAX, WINDOW_WIDTH_MIN,
};

/// Logical size the main window is centered at when it is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowExtent {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowExtent {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

pub fn window_extent_from_env() -> WindowExtent {
    resolve_window_extent(
        env::var(WINDOW_WIDTH_ENV).ok().as_deref(),
        env::var(WINDOW_HEIGHT_ENV).ok().as_deref(),
    )
}

pub fn resolve_window_extent(width: Option<&str>, height: Option<&str>) -> WindowExtent {
    WindowExtent {
        width: parse_dimension(width, DEFAULT_WINDOW_WIDTH, WINDOW_WIDTH_MIN, WINDOW_WIDTH_MAX),
        height: parse_dimension(
            height,
            DEFAULT_WINDOW_HEIGHT,
            WINDOW_HEIGHT_MIN,
            WINDOW_HEIGHT_MAX,
        ),
    }
}

fn parse_dimension(raw: Option<&str>, default_value: u32, min: u32, max: u32) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .map(|value| value.clamp(min, max))
        .unwrap_or(default_value)
}

pub fn log_to_stderr() -> bool {
    resolve_log_to_stderr(
        env::var(LOG_STDERR_ENV).ok().as_deref(),
        cfg!(debug_assertions),
    )
}

pub fn resolve_log_to_stderr(raw: Option<&str>, debug_build: bool) -> bool {
    match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => debug_build,
    }
}
