use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use once_cell::sync::Lazy;

/// Destination of `log_to_file`. Nothing is written until `init` is called.
static LOG_PATH: Lazy<Mutex<Option<PathBuf>>> = Lazy::new(|| Mutex::new(None));

pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("emacs-navigator/navigator.log")
}

pub fn init(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    if let Ok(mut slot) = LOG_PATH.lock() {
        *slot = Some(path.to_path_buf());
    }
}

pub fn log_to_file(message: &str) {
    let Ok(slot) = LOG_PATH.lock() else {
        return;
    };
    let Some(path) = slot.as_ref() else {
        return;
    };

    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(file, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_lines_once_initialized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/navigator.log");

        init(&path);
        log_to_file("first");
        log_to_file("second");

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("first\n"));
        assert!(written.contains("second\n"));
    }
}
