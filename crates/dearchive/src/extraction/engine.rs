//! Core extraction engine.

use std::collections::HashSet;
use std::fmt;
use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use crate::ExtractOptions;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::filter::AcceptAll;
use crate::filter::EntryFilter;
use crate::formats::EntrySource;
use crate::formats::SourceEntry;
use crate::report::ExtractionOutcome;
use crate::security::sanitize_name;
use crate::types::DestDir;
use crate::types::Entry;
use crate::types::EntryType;

use super::recovery::ErrorHandler;
use super::recovery::ErrorHandlerChoice;
use super::recovery::ExtractionState;
use super::recovery::Recovery;
use super::replay::ReplayReader;
use super::writer;
use super::writer::Written;

/// Hook run after each entry is written, with the entry (under its
/// stripped name) and its destination path.
pub type PostProcessor<'a> = Box<dyn FnMut(&Entry, &Path) -> io::Result<()> + 'a>;

/// Extracts entries from an [`EntrySource`] into a destination directory.
///
/// Entries are processed in source order. Each one is sanitized, stripped,
/// filtered and written; a failure at any step is offered to the error
/// handler, if one is installed, and bails out otherwise.
///
/// # Examples
///
/// ```
/// use dearchive::ErrorHandlerChoice;
/// use dearchive::ExtractOptions;
/// use dearchive::Extractor;
/// use dearchive::formats::MemorySource;
/// use dearchive::types::Entry;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = tempfile::tempdir()?;
/// let mut source = MemorySource::new()
///     .with_file("top/test1", b"one".to_vec())
///     .with_file("top/some/test2", b"two".to_vec());
///
/// let report = Extractor::new(ExtractOptions::default().with_strip_components(1))
///     .filter(|entry: &Entry| !entry.name.contains("some"))
///     .on_error(|_, _| ErrorHandlerChoice::Skip)
///     .extract(&mut source, dest.path())?;
///
/// assert_eq!(report.files_extracted, 1);
/// assert!(dest.path().join("test1").exists());
/// # Ok(())
/// # }
/// ```
pub struct Extractor<'a> {
    options: ExtractOptions,
    filter: Box<dyn EntryFilter + 'a>,
    handler: Option<Box<dyn ErrorHandler + 'a>>,
    post_processor: Option<PostProcessor<'a>>,
}

impl fmt::Debug for Extractor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor")
            .field("options", &self.options)
            .field("has_handler", &self.handler.is_some())
            .field("has_post_processor", &self.post_processor.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for Extractor<'_> {
    fn default() -> Self {
        Self::new(ExtractOptions::default())
    }
}

impl<'a> Extractor<'a> {
    /// Creates an extractor that accepts every entry and bails out on the
    /// first failure.
    #[must_use]
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            options,
            filter: Box::new(AcceptAll),
            handler: None,
            post_processor: None,
        }
    }

    /// Returns the options.
    #[must_use]
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Sets a closure filter. Only entries it returns `true` for are
    /// extracted.
    #[must_use]
    pub fn filter<F>(self, filter: F) -> Self
    where
        F: Fn(&Entry) -> bool + 'a,
    {
        self.entry_filter(filter)
    }

    /// Sets any [`EntryFilter`].
    #[must_use]
    pub fn entry_filter<F: EntryFilter + 'a>(mut self, filter: F) -> Self {
        self.filter = Box::new(filter);
        self
    }

    /// Sets a closure error handler.
    #[must_use]
    pub fn on_error<F>(self, handler: F) -> Self
    where
        F: FnMut(&Entry, &ExtractionError) -> ErrorHandlerChoice + 'a,
    {
        self.error_handler(handler)
    }

    /// Sets any [`ErrorHandler`].
    #[must_use]
    pub fn error_handler<H: ErrorHandler + 'a>(mut self, handler: H) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Sets a hook run after every written entry. Its failures are entry
    /// failures and go through the error handler.
    #[must_use]
    pub fn post_processor<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&Entry, &Path) -> io::Result<()> + 'a,
    {
        self.post_processor = Some(Box::new(hook));
        self
    }

    /// Extracts every entry of `source` into `dest`.
    ///
    /// `dest` must be an existing, writable directory. The returned report's
    /// `outcome` is `Aborted` when the error handler chose `Abort`.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination is invalid, if the source fails
    /// to produce an entry, or if a failed entry resolves to `BailOut`.
    /// Entries written before the error remain on disk.
    pub fn extract<S>(&mut self, source: &mut S, dest: impl AsRef<Path>) -> Result<ExtractionReport>
    where
        S: EntrySource + ?Sized,
    {
        let start = Instant::now();
        let dest = DestDir::new(dest.as_ref())?;
        log::debug!(
            "extracting {} entries into {}",
            source.format_name(),
            dest.as_path().display()
        );

        let Self {
            options,
            filter,
            handler,
            post_processor,
        } = self;
        let mut ctx = ExtractionContext {
            dest,
            options,
            filter: &**filter,
            post_processor: post_processor.as_deref_mut(),
            recovery: Recovery::new(handler.as_deref_mut()),
            report: ExtractionReport::new(),
            seen: HashSet::new(),
            buffer: CopyBuffer::new(),
        };

        while let Some(SourceEntry { entry, content }) = source.next_entry()? {
            let mut content = ctx.open_content(content);
            ctx.process(&entry, &mut content)?;
            if ctx.recovery.state() == ExtractionState::Aborted {
                break;
            }
        }

        ctx.recovery.complete();
        let mut report = ctx.report;
        if ctx.recovery.state() == ExtractionState::Aborted {
            report.outcome = ExtractionOutcome::Aborted;
        }
        report.duration = start.elapsed();
        log::info!(
            "extracted {} files, {} directories, {} symlinks ({} bytes, {} skipped) in {:?}",
            report.files_extracted,
            report.directories_created,
            report.symlinks_created,
            report.bytes_written,
            report.entries_skipped,
            report.duration
        );
        Ok(report)
    }
}

/// Result of one successful attempt at an entry.
enum Step {
    Stripped,
    Filtered,
    Written(Entry, Written),
}

/// State owned by a single `extract` call.
struct ExtractionContext<'x, 'a> {
    dest: DestDir,
    options: &'x ExtractOptions,
    filter: &'x (dyn EntryFilter + 'a),
    post_processor: Option<&'x mut (dyn FnMut(&Entry, &Path) -> io::Result<()> + 'a)>,
    recovery: Recovery<'x, 'a>,
    report: ExtractionReport,
    seen: HashSet<PathBuf>,
    buffer: CopyBuffer,
}

impl ExtractionContext<'_, '_> {
    /// Content is recorded for retries only when a handler could ask for one.
    fn open_content<'r>(&self, content: Box<dyn Read + 'r>) -> ReplayReader<'r> {
        if self.recovery.has_handler() {
            ReplayReader::new(content, self.options.replay_memory_limit)
        } else {
            ReplayReader::passthrough(content)
        }
    }

    /// Runs attempts for one entry until it succeeds or the handler gives up.
    fn process(&mut self, entry: &Entry, content: &mut ReplayReader<'_>) -> Result<()> {
        loop {
            let error = match self.attempt(entry, content) {
                Ok(step) => {
                    self.commit(step);
                    return Ok(());
                }
                Err(error) => error,
            };

            match self.recovery.decide(entry, &error) {
                ErrorHandlerChoice::Retry => {
                    log::warn!("retrying '{}': {error}", entry.name);
                    self.report.retries += 1;
                    content.rewind()?;
                }
                choice @ (ErrorHandlerChoice::Skip | ErrorHandlerChoice::SkipAll) => {
                    log::warn!("skipping '{}' ({choice:?}): {error}", entry.name);
                    self.report.entries_skipped += 1;
                    self.report
                        .add_warning(format!("skipped '{}': {error}", entry.name));
                    return Ok(());
                }
                ErrorHandlerChoice::BailOut => {
                    log::warn!("bailing out on '{}': {error}", entry.name);
                    return Err(error);
                }
                ErrorHandlerChoice::Abort => {
                    log::warn!("aborting on '{}': {error}", entry.name);
                    self.report
                        .add_warning(format!("aborted at '{}': {error}", entry.name));
                    return Ok(());
                }
            }
        }
    }

    fn attempt(&mut self, entry: &Entry, content: &mut ReplayReader<'_>) -> Result<Step> {
        let safe_path = sanitize_name(&entry.name)?;
        let Some(stripped) = safe_path.strip_components(self.options.strip_components) else {
            log::debug!("'{}' consumed by strip-components", entry.name);
            return Ok(Step::Stripped);
        };

        let renamed = entry.renamed(stripped.as_str());
        if !self.filter.accept(&renamed) {
            log::debug!("'{}' rejected by filter", renamed.name);
            return Ok(Step::Filtered);
        }

        self.dest.revalidate()?;
        let written = match &entry.entry_type {
            EntryType::Directory => writer::write_directory(&self.dest, &stripped)?,
            EntryType::File => writer::write_file(
                &self.dest,
                &stripped,
                &renamed,
                content,
                self.options,
                &mut self.buffer,
            )?,
            EntryType::Symlink { target } => {
                writer::write_symlink(&self.dest, &stripped, target, self.options)?
            }
        };

        if !matches!(written, Written::Existing { .. }) {
            if self.seen.insert(written.path().to_path_buf()) {
                self.report
                    .extracted_paths
                    .push(written.path().to_path_buf());
            }
            if let Some(hook) = self.post_processor.as_deref_mut() {
                hook(&renamed, written.path())?;
            }
        }

        log::debug!("{} -> {}", entry.name, written.path().display());
        Ok(Step::Written(renamed, written))
    }

    fn commit(&mut self, step: Step) {
        let report = &mut self.report;
        match step {
            Step::Stripped => report.entries_stripped += 1,
            Step::Filtered => report.entries_filtered += 1,
            Step::Written(_, Written::File { bytes, .. }) => {
                report.files_extracted += 1;
                report.bytes_written = report.bytes_written.saturating_add(bytes);
            }
            Step::Written(_, Written::Directory { .. }) => report.directories_created += 1,
            Step::Written(_, Written::Symlink { .. }) => report.symlinks_created += 1,
            Step::Written(entry, Written::Existing { path }) => {
                log::debug!("'{}' exists at {}, left untouched", entry.name, path.display());
                report.entries_existing += 1;
            }
        }
    }
}
