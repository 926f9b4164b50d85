pub mod log;
pub mod macros;
pub mod format;
