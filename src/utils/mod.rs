//! Small helpers shared across the crate

pub mod logging;

pub use logging::init_logger;
