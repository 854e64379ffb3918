//! Utilities shared by the Tsunagi binaries: logging setup and clocks.

pub mod logger;
pub mod time;
