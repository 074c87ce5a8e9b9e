//! Core value types for archive extraction.
//!
//! `SafePath` and `DestDir` are validated upon construction and cannot be
//! created from raw types without going through validation.

pub mod dest_dir;
pub mod entry;
pub mod safe_path;

pub use dest_dir::DestDir;
pub use entry::Entry;
pub use entry::EntryType;
pub use safe_path::SafePath;
