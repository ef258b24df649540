pub const APP_SCHEME: &str = "miko";
pub const APP_HOST: &str = "app";
pub const APP_ENTRY_URL: &str = "miko://app/";
pub const INDEX_DOCUMENT_PATH: &str = "/index.html";

pub const MAIN_WINDOW_LABEL: &str = "main";
pub const MAIN_WINDOW_TITLE: &str = "Miko";
pub const DEFAULT_WINDOW_WIDTH: u32 = 1200;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 800;
pub const WINDOW_WIDTH_MIN: u32 = 320;
pub const WINDOW_WIDTH_MAX: u32 = 7680;
pub const WINDOW_HEIGHT_MIN: u32 = 240;
pub const WINDOW_HEIGHT_MAX: u32 = 4320;

pub const ROOT_DIR_ENV: &str = "MIKO_ROOT";
pub const WINDOW_WIDTH_ENV: &str = "MIKO_WINDOW_WIDTH";
pub const WINDOW_HEIGHT_ENV: &str = "MIKO_WINDOW_HEIGHT";
pub const LOG_STDERR_ENV: &str = "MIKO_LOG_STDERR";
pub const PACKAGED_ROOT_DIR_NAME: &str = ".miko";

pub const DESKTOP_LOG_FILE: &str = "desktop.log";
pub const DESKTOP_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;
pub const LOG_BACKUP_COUNT: usize = 5;
