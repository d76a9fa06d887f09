//! # DagorArc
//!
//! A pure-Rust reader for Dagor engine asset archives (`*.vromfs.bin`-style
//! packs).
//!
//! An archive carries its own file directory and a payload region that is
//! either stored raw or deflated as a single zlib stream. Because a zlib
//! stream can only be read forwards, extraction walks entries in order and
//! tracks its own position instead of seeking.
//!
//! ## Quick Start
//!
//! ```no_run
//! use dagorarc::archive::DagorArchive;
//!
//! let archive = DagorArchive::open("grp_hdr.vromfs.bin")?;
//! println!("{} entries, compressed: {}", archive.len(), archive.is_compressed());
//!
//! // Extract everything
//! archive.extract_all("output/")?;
//!
//! // Extract a single file; unknown names write nothing
//! if archive.extract("config/main.blk", "output/")?.is_none() {
//!     println!("not in archive");
//! }
//! # Ok::<(), dagorarc::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `dagorarc` command-line binary

pub mod archive;
pub mod error;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::archive::{
        AssetArchive, DagorArchive, Entry, ExtractOptions, ExtractPhase, ExtractProgress,
        ExtractionSummary, PayloadEncoding,
    };
    pub use crate::error::{Error, Result};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
