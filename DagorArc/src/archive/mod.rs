//! Dagor asset archive reader
//!
//! The container has no public documentation; the layout below was worked
//! out from real archives. All integers are little-endian.
//!
//! ```text
//! 0x00  primary header (0x20 bytes, the first 0x10 are skipped)
//! 0x10  post-header stream, raw or one zlib stream:
//!         +0x00 secondary header (0x30): name table offset, file count,
//!               +0x10 file table offset
//!         name-location table: count x (u32 name offset, u32 reserved)
//!         null-terminated names
//!         file table: count x (u32 location, u32 length, 8 reserved)
//!         payload
//! ```

mod directory;
mod extraction_options;
mod extractor;
mod header;
mod names;
mod reader;
mod stream;
mod types;

pub use directory::{Directory, SecondaryHeader, parse_directory, read_directory, resolve_payload_base};
pub use extraction_options::ExtractOptions;
pub use extractor::{
    EntryReader, Extractor, OffsetChain, Placement, ProgressCallback, effective_offset, write_member,
};
pub use header::{detect_encoding, probe, read_primary_header};
pub use names::{read_name, read_name_offsets, read_names};
pub use reader::{AssetArchive, DagorArchive};
pub use stream::PayloadStream;
pub use types::*;

/// Size of the primary header read for encoding detection
pub const PRIMARY_HEADER_LEN: usize = 0x20;

/// File offset where the post-header stream begins
pub const PAYLOAD_START: u64 = 0x10;

/// Size of the secondary header
pub const SECONDARY_HEADER_LEN: usize = 0x30;

/// Size of a name-location table record
pub const NAME_RECORD_LEN: usize = 8;

/// Size of a file location table record
pub const FILE_RECORD_LEN: usize = 16;
