//! Extraction driver and per-entry error recovery.

pub mod engine;
pub mod recovery;
pub(crate) mod replay;
pub(crate) mod writer;

pub use engine::Extractor;
pub use engine::PostProcessor;
pub use recovery::ErrorHandler;
pub use recovery::ErrorHandlerChoice;
pub use recovery::ExtractionState;
