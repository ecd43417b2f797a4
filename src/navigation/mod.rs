pub mod location;
pub mod navigator;
pub mod position;
pub mod tool_window;
pub mod view;

pub use location::{Location, parse_target};
pub use navigator::{NavigationOutcome, NavigationState, Navigator};
