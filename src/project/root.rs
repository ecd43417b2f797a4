use std::path::{Path, PathBuf};

use crate::config::CONFIG_FILE;

const PROJECT_FILES: [&str; 3] = [CONFIG_FILE, ".projectile", ".git"];

/// Nearest ancestor of `start` holding one of the project marker files.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if PROJECT_FILES.iter().any(|file| current.join(file).exists()) {
            return Some(current);
        }

        if !current.pop() {
            break;
        }
    }

    None
}
