//! Utility functions

pub mod glob;
pub mod hex;
pub mod path;

pub use glob::matches_glob;
pub use hex::hex_dump;
pub use path::{entry_relative_path, normalize_path};
