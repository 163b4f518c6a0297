//! Text-based configuration, definition and placement formats

pub mod dat;
pub mod ide;
pub mod ipl;
