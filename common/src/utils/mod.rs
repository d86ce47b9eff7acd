//! Utility functions and helpers.

pub mod display;

// Re-export commonly used functions
pub use display::encode_for_display;
