//! Safe archive extraction with strip-components, filtering and per-entry
//! error recovery.
//!
//! `dearchive` pulls entries from an [`EntrySource`](formats::EntrySource)
//! (TAR, compressed TAR, ZIP or in-memory) and writes them under a
//! destination directory. Every entry name is sanitized before it touches
//! the disk: names with `..` segments are rejected, absolute names are made
//! relative and symlink targets may not leave the destination.
//!
//! Failures are handed to an [`ErrorHandler`] that can retry the entry, skip
//! it, skip every later failure, bail out with the error or abort quietly.
//!
//! # Examples
//!
//! ```no_run
//! use dearchive::ErrorHandlerChoice;
//! use dearchive::ExtractOptions;
//! use dearchive::Extractor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = Extractor::new(ExtractOptions::default().with_strip_components(1))
//!     .on_error(|entry, error| {
//!         eprintln!("{}: {error}", entry.name);
//!         ErrorHandlerChoice::Skip
//!     })
//!     .extract_file("release.tar.gz", "/opt/release")?;
//! println!("Extracted {} files", report.files_extracted);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod copy;
pub mod error;
pub mod extraction;
pub mod filter;
pub mod formats;
pub mod report;
pub mod security;
#[doc(hidden)]
pub mod test_utils;
pub mod types;

pub use api::extract_archive;
pub use config::ExtractOptions;
pub use config::SymlinkPolicy;
pub use error::ExtractionError;
pub use error::Result;
pub use extraction::ErrorHandler;
pub use extraction::ErrorHandlerChoice;
pub use extraction::ExtractionState;
pub use extraction::Extractor;
pub use extraction::PostProcessor;
pub use filter::AcceptAll;
pub use filter::EntryFilter;
pub use filter::PatternFilter;
pub use report::ExtractionOutcome;
pub use report::ExtractionReport;

pub use types::DestDir;
pub use types::Entry;
pub use types::EntryType;
pub use types::SafePath;
