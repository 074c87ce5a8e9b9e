//! Entry sources over concrete archive formats.

pub mod compression;
pub mod detect;
pub mod memory;
pub mod tar;
pub mod traits;
pub mod zip;

pub use compression::CompressionCodec;
pub use detect::ArchiveType;
pub use detect::detect_format;
pub use memory::MemorySource;
pub use tar::TarSource;
pub use traits::EntrySource;
pub use traits::SourceEntry;
pub use zip::ZipSource;
