//! Capabilities the navigator consumes from the editor environment.
//!
//! The host owns documents, windows and caret state. Handles it hands out are
//! only borrowed for the duration of one navigation and never cached.

pub mod headless;

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Which kind of editor should be used to open a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ViewKind {
    #[default]
    Default,
    Specific(String),
}

impl ViewKind {
    /// `None` and blank names both mean the host default.
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(str::trim) {
            Some(name) if !name.is_empty() => ViewKind::Specific(name.to_string()),
            _ => ViewKind::Default,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ViewKind::Default => None,
            ViewKind::Specific(name) => Some(name),
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKind::Default => write!(f, "<default>"),
            ViewKind::Specific(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("document not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no '{kind}' editor available for {}", .path.display())]
    UnsupportedViewKind { path: PathBuf, kind: String },

    #[error("offset {offset} is outside the document (length {length})")]
    OffsetOutOfRange { offset: usize, length: usize },

    #[error("position {line}:{column} is outside the document")]
    PositionOutOfRange { line: usize, column: usize },

    #[error("stale handle")]
    StaleHandle,

    #[error("host rejected the request: {0}")]
    Rejected(String),
}

impl HostError {
    /// Stable numeric code reported alongside wrapped host failures.
    pub fn code(&self) -> i32 {
        match self {
            HostError::NotFound(_) => 1,
            HostError::Io { .. } => 2,
            HostError::UnsupportedViewKind { .. } => 3,
            HostError::OffsetOutOfRange { .. } => 4,
            HostError::PositionOutOfRange { .. } => 5,
            HostError::StaleHandle => 6,
            HostError::Rejected(_) => 7,
        }
    }
}

/// The editor environment, as seen by the navigator.
pub trait EditorHost {
    type View;
    type Frame;

    /// Open or focus `path`, honouring `kind` exactly. Must fail rather than
    /// fall back to another editor when `kind` cannot be provided.
    fn open_document(&mut self, path: &Path, kind: &ViewKind)
        -> Result<(Self::View, Self::Frame), HostError>;

    /// Bring the frame to the foreground.
    fn show_frame(&mut self, frame: &Self::Frame) -> Result<(), HostError>;

    /// Current length of the view's text, in chars.
    fn text_length(&self, view: &Self::View) -> Result<usize, HostError>;

    fn line_and_column(&self, view: &Self::View, offset: usize) -> Result<(usize, usize), HostError>;

    fn set_caret_position(&mut self, view: &Self::View, line: usize, column: usize)
        -> Result<(), HostError>;

    fn center_on_line(&mut self, view: &Self::View, line: usize, minimum_visible_lines: usize)
        -> Result<(), HostError>;

    /// Frame of the tool window registered under `slot`, if any.
    fn find_tool_window(&self, slot: &str) -> Result<Option<Self::Frame>, HostError>;
}
