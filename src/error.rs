use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::host::{HostError, ViewKind};

/// Step of a navigation that talks to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationStep {
    Validate,
    Open,
    Normalize,
    Show,
    SetCaret,
    Center,
}

impl fmt::Display for NavigationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NavigationStep::Validate => "validate",
            NavigationStep::Open => "open",
            NavigationStep::Normalize => "normalize",
            NavigationStep::Show => "show",
            NavigationStep::SetCaret => "set-caret",
            NavigationStep::Center => "center",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("cannot open {} with {view_kind} editor", .path.display())]
    DocumentOpen {
        path: PathBuf,
        view_kind: ViewKind,
        #[source]
        source: HostError,
    },

    #[error("cannot resolve offset {offset}")]
    PositionResolution {
        offset: usize,
        #[source]
        source: HostError,
    },

    #[error("host failed to {step} (code {})", .source.code())]
    HostOperation {
        step: NavigationStep,
        #[source]
        source: HostError,
    },
}

impl NavigationError {
    /// Which step of the navigation failed.
    pub fn step(&self) -> NavigationStep {
        match self {
            NavigationError::InvalidArgument(_) => NavigationStep::Validate,
            NavigationError::DocumentOpen { .. } => NavigationStep::Open,
            NavigationError::PositionResolution { .. } => NavigationStep::Normalize,
            NavigationError::HostOperation { step, .. } => *step,
        }
    }

    pub fn host_code(&self) -> Option<i32> {
        match self {
            NavigationError::InvalidArgument(_) => None,
            NavigationError::DocumentOpen { source, .. }
            | NavigationError::PositionResolution { source, .. }
            | NavigationError::HostOperation { source, .. } => Some(source.code()),
        }
    }
}
