use std::sync::{Mutex, OnceLock};

use crate::{
    logging::{self, DesktopLogCategory},
    runtime_paths, startup_config, DESKTOP_LOG_FILE, DESKTOP_LOG_MAX_BYTES, LOG_BACKUP_COUNT,
};

static DESKTOP_LOG_WRITE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
static LOG_TO_STDERR: OnceLock<bool> = OnceLock::new();

pub fn append_desktop_log(message: &str) {
    append_desktop_log_with_category(DesktopLogCategory::Runtime, message);
}

pub fn append_startup_log(message: &str) {
    append_desktop_log_with_category(DesktopLogCategory::Startup, message);
}

pub fn append_resource_log(message: &str) {
    append_desktop_log_with_category(DesktopLogCategory::Resource, message);
}

pub fn append_shutdown_log(message: &str) {
    append_desktop_log_with_category(DesktopLogCategory::Shutdown, message);
}

fn append_desktop_log_with_category(category: DesktopLogCategory, message: &str) {
    logging::append_desktop_log(
        category,
        message,
        runtime_paths::default_packaged_root_dir(),
        DESKTOP_LOG_FILE,
        DESKTOP_LOG_MAX_BYTES,
        LOG_BACKUP_COUNT,
        &DESKTOP_LOG_WRITE_LOCK,
        *LOG_TO_STDERR.get_or_init(startup_config::log_to_stderr),
    )
}
