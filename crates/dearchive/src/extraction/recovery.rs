//! Error recovery state machine.
//!
//! Every failure raised while an entry is processed is offered to an
//! [`ErrorHandler`], whose [`ErrorHandlerChoice`] decides what happens next.

use crate::ExtractionError;
use crate::types::Entry;

/// What to do about a failed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorHandlerChoice {
    /// Attempt the same entry again, from the start of its content.
    ///
    /// There is no retry limit. A handler that always retries a failure
    /// that never clears loops forever.
    Retry,

    /// Abandon this entry and continue with the next one.
    Skip,

    /// Abandon this entry and every later failing entry without asking
    /// again.
    SkipAll,

    /// Stop and return the error. Entries already written stay on disk.
    BailOut,

    /// Stop and return successfully. Entries already written stay on disk.
    Abort,
}

/// Callback consulted when an entry fails.
///
/// Closures taking `(&Entry, &ExtractionError)` implement it:
///
/// ```
/// use dearchive::ErrorHandler;
/// use dearchive::ErrorHandlerChoice;
/// use dearchive::ExtractionError;
/// use dearchive::types::Entry;
///
/// let mut skip_io = |_entry: &Entry, error: &ExtractionError| match error {
///     ExtractionError::Io(_) => ErrorHandlerChoice::Skip,
///     _ => ErrorHandlerChoice::BailOut,
/// };
/// let entry = Entry::file("a.txt", None);
/// let error = ExtractionError::Io(std::io::Error::other("disk full"));
/// assert_eq!(skip_io.handle(&entry, &error), ErrorHandlerChoice::Skip);
/// ```
pub trait ErrorHandler {
    /// Decides how to proceed after `error` occurred for `entry`.
    fn handle(&mut self, entry: &Entry, error: &ExtractionError) -> ErrorHandlerChoice;
}

impl<F> ErrorHandler for F
where
    F: FnMut(&Entry, &ExtractionError) -> ErrorHandlerChoice,
{
    fn handle(&mut self, entry: &Entry, error: &ExtractionError) -> ErrorHandlerChoice {
        self(entry, error)
    }
}

/// State of one extraction call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionState {
    /// Entries are processed; failures go to the handler.
    #[default]
    Running,

    /// The handler chose `SkipAll`; failures are skipped silently.
    SkippingAll,

    /// The handler chose `Abort`.
    Aborted,

    /// The source is exhausted.
    Completed,
}

impl ExtractionState {
    /// Returns `true` once no further entries will be processed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Aborted | Self::Completed)
    }
}

/// Drives [`ExtractionState`] from handler decisions.
pub(crate) struct Recovery<'h, 'a> {
    handler: Option<&'h mut (dyn ErrorHandler + 'a)>,
    state: ExtractionState,
}

impl<'h, 'a> Recovery<'h, 'a> {
    pub(crate) fn new(handler: Option<&'h mut (dyn ErrorHandler + 'a)>) -> Self {
        Self {
            handler,
            state: ExtractionState::Running,
        }
    }

    pub(crate) const fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    pub(crate) const fn state(&self) -> ExtractionState {
        self.state
    }

    /// Decides the fate of a failed entry.
    ///
    /// Without a handler every failure bails out. In `SkippingAll` the
    /// handler is not consulted.
    pub(crate) fn decide(&mut self, entry: &Entry, error: &ExtractionError) -> ErrorHandlerChoice {
        if self.state == ExtractionState::SkippingAll {
            return ErrorHandlerChoice::Skip;
        }

        let choice = self
            .handler
            .as_deref_mut()
            .map_or(ErrorHandlerChoice::BailOut, |handler| {
                handler.handle(entry, error)
            });

        match choice {
            ErrorHandlerChoice::SkipAll => self.state = ExtractionState::SkippingAll,
            ErrorHandlerChoice::Abort => self.state = ExtractionState::Aborted,
            ErrorHandlerChoice::Retry | ErrorHandlerChoice::Skip | ErrorHandlerChoice::BailOut => {}
        }
        choice
    }

    /// Marks the source as exhausted.
    pub(crate) fn complete(&mut self) {
        if !self.state.is_terminal() {
            self.state = ExtractionState::Completed;
        }
    }
}
