use crate::severity::Severity;
use std::cell::{Cell, RefCell};
use std::io::{self, Stderr, Write};

/// Something diagnostics can be reported to.
///
/// Handlers are shared by reference, so implementations that keep state do so
/// through interior mutability.
pub trait ErrorHandler {
    fn handle_text(&self, severity: Severity, text: &str);

    fn debug(&self, text: &str) {
        self.handle_text(Severity::Debug, text);
    }

    fn message(&self, text: &str) {
        self.handle_text(Severity::Message, text);
    }

    fn warning(&self, text: &str) {
        self.handle_text(Severity::Warning, text);
    }

    fn error(&self, text: &str) {
        self.handle_text(Severity::Error, text);
    }

    fn fatal(&self, text: &str) {
        self.handle_text(Severity::Fatal, text);
    }
}

impl<H: ErrorHandler + ?Sized> ErrorHandler for &H {
    fn handle_text(&self, severity: Severity, text: &str) {
        (**self).handle_text(severity, text);
    }
}

impl<H: ErrorHandler + ?Sized> ErrorHandler for Box<H> {
    fn handle_text(&self, severity: Severity, text: &str) {
        (**self).handle_text(severity, text);
    }
}

/// Warning and error tallies.
#[derive(Debug, Default)]
pub struct ErrorCounts {
    nwarnings: Cell<usize>,
    nerrors: Cell<usize>,
}

impl ErrorCounts {
    pub fn record(&self, severity: Severity) {
        if severity.is_error() {
            self.nerrors.set(self.nerrors.get() + 1);
        } else if severity == Severity::Warning {
            self.nwarnings.set(self.nwarnings.get() + 1);
        }
    }

    pub fn nwarnings(&self) -> usize {
        self.nwarnings.get()
    }

    pub fn nerrors(&self) -> usize {
        self.nerrors.get()
    }
}

/// Writes each report as one line to `W`.
pub struct FileErrorHandler<W: Write> {
    out: RefCell<W>,
    context: String,
    counts: ErrorCounts,
}

impl Default for FileErrorHandler<Stderr> {
    fn default() -> Self {
        FileErrorHandler::new(io::stderr())
    }
}

impl<W: Write> FileErrorHandler<W> {
    pub fn new(out: W) -> Self {
        FileErrorHandler {
            out: RefCell::new(out),
            context: String::new(),
            counts: ErrorCounts::default(),
        }
    }

    /// Prepends `context` to every line, e.g. the program name.
    pub fn with_context<S: Into<String>>(out: W, context: S) -> Self {
        FileErrorHandler {
            context: context.into(),
            ..FileErrorHandler::new(out)
        }
    }

    pub fn counts(&self) -> &ErrorCounts {
        &self.counts
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn decorate(&self, severity: Severity, text: &str) -> String {
        let decoration = if severity == Severity::Warning {
            "warning: "
        } else {
            ""
        };
        format!("{}{decoration}{text}\n", self.context)
    }
}

impl<W: Write> ErrorHandler for FileErrorHandler<W> {
    fn handle_text(&self, severity: Severity, text: &str) {
        self.counts.record(severity);

        let line = self.decorate(severity, text);
        let mut out = self.out.borrow_mut();
        // flush now: a bail right after this won't run destructors
        let _ = out.write_all(line.as_bytes()).and_then(|_| out.flush());
    }
}

/// Drops all text but still counts what went by.
#[derive(Debug, Default)]
pub struct SilentErrorHandler {
    counts: ErrorCounts,
}

impl SilentErrorHandler {
    pub fn counts(&self) -> &ErrorCounts {
        &self.counts
    }
}

impl ErrorHandler for SilentErrorHandler {
    fn handle_text(&self, severity: Severity, _: &str) {
        self.counts.record(severity);
    }
}

/// Target of every event a [`TracingErrorHandler`] emits.
pub const TRACING_TARGET: &str = "bail_error_rs";

/// Turns reports into `tracing` events under [`TRACING_TARGET`], tagged with
/// a `context` field so subscribers can tell sources apart.
#[derive(Debug, Clone, Default)]
pub struct TracingErrorHandler {
    context: String,
}

impl TracingErrorHandler {
    pub fn new<S: Into<String>>(context: S) -> Self {
        TracingErrorHandler {
            context: context.into(),
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }
}

impl ErrorHandler for TracingErrorHandler {
    fn handle_text(&self, severity: Severity, text: &str) {
        let context = self.context.as_str();
        match severity {
            Severity::Debug => {
                tracing::debug!(target: TRACING_TARGET, %severity, context, "{text}")
            }
            Severity::Message => {
                tracing::info!(target: TRACING_TARGET, %severity, context, "{text}")
            }
            Severity::Warning => {
                tracing::warn!(target: TRACING_TARGET, %severity, context, "{text}")
            }
            Severity::Error | Severity::Fatal => {
                tracing::error!(target: TRACING_TARGET, %severity, context, "{text}")
            }
        }
    }
}
