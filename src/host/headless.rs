//! In-memory editor host backed by the file system.
//!
//! Buffer text pushed by the editor (didOpen/didChange) takes precedence over
//! the file on disk, so offsets always refer to what the user is looking at.

use std::collections::HashMap;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::config::NavigatorConfig;
use crate::host::{EditorHost, HostError, ViewKind};
use crate::util::position::{char_len, char_offset_to_line_column, line_count, line_len};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(usize);

#[derive(Debug)]
struct ViewState {
    path: PathBuf,
    kind: String,
    caret: (usize, usize),
    top_line: usize,
    closed: bool,
}

#[derive(Debug)]
struct FrameState {
    shown: bool,
}

#[derive(Debug)]
pub struct HeadlessHost {
    default_kind: String,
    view_kinds: HashMap<String, Vec<String>>,
    viewport_height: usize,
    buffers: HashMap<PathBuf, String>,
    views: Vec<ViewState>,
    frames: Vec<FrameState>,
    editors: HashMap<(PathBuf, String), (ViewId, FrameId)>,
    tool_windows: HashMap<String, FrameId>,
    active: Option<FrameId>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::from_config(&NavigatorConfig::default())
    }
}

impl HeadlessHost {
    pub fn from_config(config: &NavigatorConfig) -> Self {
        let mut host = Self {
            default_kind: config.default_view_kind.clone(),
            view_kinds: config.view_kinds.clone(),
            viewport_height: config.viewport_height.max(1),
            buffers: HashMap::new(),
            views: Vec::new(),
            frames: Vec::new(),
            editors: HashMap::new(),
            tool_windows: HashMap::new(),
            active: None,
        };

        for slot in &config.tool_windows {
            let frame = host.new_frame();
            host.tool_windows.insert(slot.clone(), frame);
        }

        host
    }

    /// Replace the text of `path` with what the editor currently holds.
    pub fn set_buffer_text(&mut self, path: &Path, text: &str) {
        self.buffers.insert(path.to_path_buf(), text.to_string());
    }

    /// Forget pushed text and close every editor on `path`.
    pub fn close_buffer(&mut self, path: &Path) {
        self.buffers.remove(path);
        self.editors.retain(|(p, _), _| p != path);
        for view in self.views.iter_mut().filter(|v| v.path == path) {
            view.closed = true;
        }
    }

    pub fn caret(&self, view: ViewId) -> Option<(usize, usize)> {
        self.views.get(view.0).map(|v| v.caret)
    }

    pub fn view_kind_of(&self, view: ViewId) -> Option<&str> {
        self.views.get(view.0).map(|v| v.kind.as_str())
    }

    /// Lines currently inside the viewport of `view`.
    pub fn visible_lines(&self, view: ViewId) -> Option<Range<usize>> {
        let state = self.views.get(view.0)?;
        let total = line_count(self.buffers.get(&state.path)?);
        let end = (state.top_line + self.viewport_height).min(total);
        Some(state.top_line..end)
    }

    pub fn is_shown(&self, frame: FrameId) -> bool {
        self.frames.get(frame.0).is_some_and(|f| f.shown)
    }

    pub fn active_frame(&self) -> Option<FrameId> {
        self.active
    }

    fn new_frame(&mut self) -> FrameId {
        self.frames.push(FrameState { shown: false });
        FrameId(self.frames.len() - 1)
    }

    fn resolve_kind(&self, path: &Path, kind: &ViewKind) -> Result<String, HostError> {
        let name = kind.name().unwrap_or(self.default_kind.as_str());
        if name == self.default_kind {
            return Ok(name.to_string());
        }

        let unsupported = || HostError::UnsupportedViewKind {
            path: path.to_path_buf(),
            kind: name.to_string(),
        };

        let extensions = self.view_kinds.get(name).ok_or_else(unsupported)?;
        if extensions.is_empty() {
            return Ok(name.to_string());
        }

        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let accepted = extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext));

        if accepted { Ok(name.to_string()) } else { Err(unsupported()) }
    }

    fn load_text(&mut self, path: &Path) -> Result<(), HostError> {
        if self.buffers.contains_key(path) {
            return Ok(());
        }
        if !path.is_file() {
            return Err(HostError::NotFound(path.to_path_buf()));
        }

        let text = fs::read_to_string(path).map_err(|source| HostError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.buffers.insert(path.to_path_buf(), text);
        Ok(())
    }

    fn view(&self, view: &ViewId) -> Result<&ViewState, HostError> {
        match self.views.get(view.0) {
            Some(state) if !state.closed => Ok(state),
            _ => Err(HostError::StaleHandle),
        }
    }

    fn text(&self, view: &ViewId) -> Result<&str, HostError> {
        let state = self.view(view)?;
        self.buffers
            .get(&state.path)
            .map(String::as_str)
            .ok_or(HostError::StaleHandle)
    }
}

impl EditorHost for HeadlessHost {
    type View = ViewId;
    type Frame = FrameId;

    fn open_document(&mut self, path: &Path, kind: &ViewKind) -> Result<(ViewId, FrameId), HostError> {
        let kind = self.resolve_kind(path, kind)?;
        self.load_text(path)?;

        let key = (path.to_path_buf(), kind);
        if let Some(&handles) = self.editors.get(&key) {
            return Ok(handles);
        }

        self.views.push(ViewState {
            path: key.0.clone(),
            kind: key.1.clone(),
            caret: (0, 0),
            top_line: 0,
            closed: false,
        });
        let view = ViewId(self.views.len() - 1);
        let frame = self.new_frame();
        self.editors.insert(key, (view, frame));

        Ok((view, frame))
    }

    fn show_frame(&mut self, frame: &FrameId) -> Result<(), HostError> {
        let state = self.frames.get_mut(frame.0).ok_or(HostError::StaleHandle)?;
        state.shown = true;
        self.active = Some(*frame);
        Ok(())
    }

    fn text_length(&self, view: &ViewId) -> Result<usize, HostError> {
        self.text(view).map(char_len)
    }

    fn line_and_column(&self, view: &ViewId, offset: usize) -> Result<(usize, usize), HostError> {
        let text = self.text(view)?;
        char_offset_to_line_column(text, offset).ok_or(HostError::OffsetOutOfRange {
            offset,
            length: char_len(text),
        })
    }

    fn set_caret_position(&mut self, view: &ViewId, line: usize, column: usize) -> Result<(), HostError> {
        let text = self.text(view)?;
        match line_len(text, line) {
            Some(len) if column <= len => {}
            _ => return Err(HostError::PositionOutOfRange { line, column }),
        }

        self.views[view.0].caret = (line, column);
        Ok(())
    }

    fn center_on_line(&mut self, view: &ViewId, line: usize, minimum_visible_lines: usize) -> Result<(), HostError> {
        if minimum_visible_lines == 0 || minimum_visible_lines > self.viewport_height {
            return Err(HostError::Rejected(format!(
                "cannot keep {} lines visible in a {}-line viewport",
                minimum_visible_lines, self.viewport_height
            )));
        }

        let total = line_count(self.text(view)?);
        if line >= total {
            return Err(HostError::PositionOutOfRange { line, column: 0 });
        }

        let max_top = total.saturating_sub(self.viewport_height);
        self.views[view.0].top_line = line.saturating_sub(self.viewport_height / 2).min(max_top);
        Ok(())
    }

    fn find_tool_window(&self, slot: &str) -> Result<Option<FrameId>, HostError> {
        Ok(self.tool_windows.get(slot).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_with(path: &Path, text: &str) -> HeadlessHost {
        let mut host = HeadlessHost::default();
        host.set_buffer_text(path, text);
        host
    }

    #[test]
    fn reopening_returns_the_same_editor() {
        let path = Path::new("/virtual/foo.txt");
        let mut host = host_with(path, "hello");

        let first = host.open_document(path, &ViewKind::Default).unwrap();
        let second = host.open_document(path, &ViewKind::Specific("text".into())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_file_is_not_found() {
        let mut host = HeadlessHost::default();
        let err = host
            .open_document(Path::new("/definitely/not/here.txt"), &ViewKind::Default)
            .unwrap_err();
        assert!(matches!(err, HostError::NotFound(_)));
    }

    #[test]
    fn unknown_or_mismatched_kind_is_refused() {
        let mut config = NavigatorConfig::default();
        config.view_kinds.insert("designer".into(), vec![".html".into()]);
        let mut host = HeadlessHost::from_config(&config);
        let txt = Path::new("/virtual/page.txt");
        let html = Path::new("/virtual/page.HTML");
        host.set_buffer_text(txt, "x");
        host.set_buffer_text(html, "<p/>");

        let err = host.open_document(txt, &ViewKind::Specific("designer".into())).unwrap_err();
        assert!(matches!(err, HostError::UnsupportedViewKind { .. }));
        let err = host.open_document(txt, &ViewKind::Specific("hex".into())).unwrap_err();
        assert!(matches!(err, HostError::UnsupportedViewKind { .. }));

        let (view, _) = host.open_document(html, &ViewKind::Specific("designer".into())).unwrap();
        assert_eq!(host.view_kind_of(view), Some("designer"));
    }

    #[test]
    fn caret_is_bounded_by_line_length() {
        let path = Path::new("/virtual/foo.txt");
        let mut host = host_with(path, "ab\ncdef");
        let (view, _) = host.open_document(path, &ViewKind::Default).unwrap();

        host.set_caret_position(&view, 1, 4).unwrap();
        assert_eq!(host.caret(view), Some((1, 4)));
        assert!(host.set_caret_position(&view, 0, 3).is_err());
        assert!(host.set_caret_position(&view, 2, 0).is_err());
        assert_eq!(host.caret(view), Some((1, 4)));
    }

    #[test]
    fn centering_keeps_line_in_viewport() {
        let path = Path::new("/virtual/long.txt");
        let text = (0..100).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        let mut config = NavigatorConfig::default();
        config.viewport_height = 10;
        let mut host = HeadlessHost::from_config(&config);
        host.set_buffer_text(path, &text);
        let (view, _) = host.open_document(path, &ViewKind::Default).unwrap();

        host.center_on_line(&view, 50, 1).unwrap();
        assert_eq!(host.visible_lines(view), Some(45..55));

        host.center_on_line(&view, 99, 1).unwrap();
        assert_eq!(host.visible_lines(view), Some(90..100));

        host.center_on_line(&view, 2, 1).unwrap();
        assert_eq!(host.visible_lines(view), Some(0..10));

        assert!(host.center_on_line(&view, 100, 1).is_err());
        assert!(host.center_on_line(&view, 10, 0).is_err());
        assert!(host.center_on_line(&view, 10, 11).is_err());
    }

    #[test]
    fn closing_a_buffer_invalidates_its_views() {
        let path = Path::new("/virtual/foo.txt");
        let mut host = host_with(path, "abc");
        let (view, _) = host.open_document(path, &ViewKind::Default).unwrap();

        host.close_buffer(path);
        assert!(matches!(host.text_length(&view), Err(HostError::StaleHandle)));
    }

    #[test]
    fn tool_windows_come_from_config() {
        let mut config = NavigatorConfig::default();
        config.tool_windows = vec!["outline".into()];
        let host = HeadlessHost::from_config(&config);

        assert!(host.find_tool_window("outline").unwrap().is_some());
        assert!(host.find_tool_window("terminal").unwrap().is_none());
    }
}
