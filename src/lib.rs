pub mod config;
pub mod error;
pub mod host;
pub mod lsp;
pub mod navigation;
pub mod project;
pub mod util;

pub use error::{NavigationError, NavigationStep};
pub use host::{EditorHost, HostError, ViewKind};
pub use navigation::{Location, NavigationOutcome, Navigator};
