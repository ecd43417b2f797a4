use std::path::Path;

use crate::error::NavigationError;
use crate::host::{EditorHost, ViewKind};
use crate::util::log::log_to_file;

/// Opens (or focuses) the editor for a document.
pub struct ViewResolver<'h, H: EditorHost> {
    host: &'h mut H,
}

impl<'h, H: EditorHost> ViewResolver<'h, H> {
    pub fn new(host: &'h mut H) -> Self {
        Self { host }
    }

    /// Obtain the view and frame for `path`. A specific `kind` the host cannot
    /// provide is an error; there is no fallback to the default editor.
    pub fn resolve(&mut self, path: &Path, kind: &ViewKind) -> Result<(H::View, H::Frame), NavigationError> {
        if path.as_os_str().is_empty() {
            return Err(NavigationError::InvalidArgument("empty document path".into()));
        }

        log_to_file(&format!("Opening {} with {} editor", path.display(), kind));

        self.host.open_document(path, kind).map_err(|source| {
            log_to_file(&format!("Open failed for {}: {}", path.display(), source));
            NavigationError::DocumentOpen {
                path: path.to_path_buf(),
                view_kind: kind.clone(),
                source,
            }
        })
    }
}
