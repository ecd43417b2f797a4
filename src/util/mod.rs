pub mod log;
pub mod position;
