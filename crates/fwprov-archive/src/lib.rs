//! Expansion and inspection of gzip-compressed tar overlays.
//!
//! # Architecture
//!
//! - `format.rs` - gzip detection and tar decoding
//! - `sanitize.rs` - Path sanitization (path traversal prevention)
//! - `expand.rs` - Delete-then-extract of every entry onto a root
//! - `inspect.rs` - Listing, reading and extracting single members
//! - `entry.rs` / `options.rs` - Shared types

pub use entry::{EntryInfo, EntryKind, ExpandReport, ExtractedEntry, SkippedEntry};
pub use error::{Error, Result};
pub use expand::expand;
pub use inspect::{entry_info, extract_entry, list_entries, read_entry};
pub use options::{EntryErrorPolicy, ExtractOptions, OwnershipPolicy, Progress};
pub use sanitize::{SanitizedPath, sanitize_path};

pub mod entry;
mod error;
mod expand;
mod format;
mod inspect;
pub mod options;
mod sanitize;
