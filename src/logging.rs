use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, OnceLock, PoisonError},
};

use chrono::{DateTime, Local};

/// Plain log sink handed to core components so they stay independent of where lines end up.
pub type LogSink = fn(&str);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopLogCategory {
    Startup,
    Runtime,
    Resource,
    Shutdown,
}

impl DesktopLogCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Runtime => "runtime",
            Self::Resource => "resource",
            Self::Shutdown => "shutdown",
        }
    }
}

pub fn resolve_desktop_log_path(root_dir: Option<PathBuf>, log_file: &str) -> PathBuf {
    root_dir
        .unwrap_or_else(env_temp_root)
        .join("logs")
        .join(log_file)
}

fn env_temp_root() -> PathBuf {
    std::env::temp_dir().join("miko")
}

pub fn format_log_line(
    category: DesktopLogCategory,
    message: &str,
    timestamp: DateTime<Local>,
) -> String {
    format!(
        "[{}] [{}] {}\n",
        timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
        category.as_str(),
        message
    )
}

#[allow(clippy::too_many_arguments)]
pub fn append_desktop_log(
    category: DesktopLogCategory,
    message: &str,
    root_dir: Option<PathBuf>,
    log_file: &str,
    max_bytes: u64,
    backup_count: usize,
    write_lock: &OnceLock<Mutex<()>>,
    mirror_to_stderr: bool,
) {
    let line = format_log_line(category, message, Local::now());
    if mirror_to_stderr {
        eprint!("{line}");
    }

    let path = resolve_desktop_log_path(root_dir, log_file);
    let _guard = write_lock
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if let Err(error) = write_log_line(&path, &line, max_bytes, backup_count) {
        eprintln!(
            "failed to write desktop log {}: {} (message: {})",
            path.display(),
            error,
            message
        );
    }
}

fn write_log_line(path: &Path, line: &str, max_bytes: u64, backup_count: usize) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let current_len = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(error) if error.kind() == io::ErrorKind::NotFound => 0,
        Err(error) => return Err(error),
    };
    if max_bytes > 0 && current_len > 0 && current_len + line.len() as u64 > max_bytes {
        rotate_log_files(path, backup_count)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(format!(".{index}"));
    PathBuf::from(raw)
}

pub(crate) fn rotate_log_files(path: &Path, backup_count: usize) -> io::Result<()> {
    if backup_count == 0 {
        return match fs::remove_file(path) {
            Err(error) if error.kind() != io::ErrorKind::NotFound => Err(error),
            _ => Ok(()),
        };
    }

    let oldest = backup_path(path, backup_count);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for index in (1..backup_count).rev() {
        let from = backup_path(path, index);
        if from.exists() {
            fs::rename(&from, backup_path(path, index + 1))?;
        }
    }
    if path.exists() {
        fs::rename(path, backup_path(path, 1))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn format_log_line_includes_timestamp_and_category() {
        let timestamp = Local
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .single()
            .expect("valid local timestamp");
        let line = format_log_line(DesktopLogCategory::Resource, "served /index.html", timestamp);
        assert_eq!(
            line,
            "[2024-03-09 14:05:07.000] [resource] served /index.html\n"
        );
    }

    #[test]
    fn resolve_desktop_log_path_uses_logs_subdirectory() {
        let path = resolve_desktop_log_path(Some(PathBuf::from("/data/miko")), "desktop.log");
        assert_eq!(path, PathBuf::from("/data/miko/logs/desktop.log"));
    }

    #[test]
    fn append_desktop_log_creates_file_and_appends_lines() {
        let root = tempfile::tempdir().expect("create temp dir");
        let lock = OnceLock::new();
        for message in ["first", "second"] {
            append_desktop_log(
                DesktopLogCategory::Startup,
                message,
                Some(root.path().to_path_buf()),
                "desktop.log",
                1024 * 1024,
                3,
                &lock,
                false,
            );
        }

        let raw = fs::read_to_string(root.path().join("logs").join("desktop.log"))
            .expect("read desktop log");
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[startup] first"));
        assert!(lines[1].ends_with("[startup] second"));
    }

    #[test]
    fn write_log_line_rotates_when_file_would_exceed_limit() {
        let root = tempfile::tempdir().expect("create temp dir");
        let path = root.path().join("desktop.log");
        fs::write(&path, "x".repeat(90)).expect("seed log");

        write_log_line(&path, &"y".repeat(20), 100, 2).expect("write with rotation");

        let rotated = fs::read_to_string(backup_path(&path, 1)).expect("read rotated log");
        assert_eq!(rotated.len(), 90);
        let current = fs::read_to_string(&path).expect("read current log");
        assert_eq!(current, "y".repeat(20));
    }

    #[test]
    fn rotate_log_files_drops_oldest_backup() {
        let root = tempfile::tempdir().expect("create temp dir");
        let path = root.path().join("desktop.log");
        fs::write(&path, "current").expect("write current");
        fs::write(backup_path(&path, 1), "one").expect("write backup 1");
        fs::write(backup_path(&path, 2), "two").expect("write backup 2");

        rotate_log_files(&path, 2).expect("rotate");

        assert!(!path.exists());
        assert_eq!(
            fs::read_to_string(backup_path(&path, 1)).expect("read backup 1"),
            "current"
        );
        assert_eq!(
            fs::read_to_string(backup_path(&path, 2)).expect("read backup 2"),
            "one"
        );
        assert!(!backup_path(&path, 3).exists());
    }
}
