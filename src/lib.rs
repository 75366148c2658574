use std::panic::{self, AssertUnwindSafe};

pub mod error_handler;
pub mod exit_with_error;
pub mod severity;

pub use error_handler::{
    ErrorHandler, FileErrorHandler, SilentErrorHandler, TracingErrorHandler,
};
pub use exit_with_error::{ExitCallback, ExitWithError, ProcessExit, BAIL_STATUS};
pub use severity::{Severity, ERROR_THRESHOLD};

/// Reports through another handler, then bails once anything at or above
/// [`ERROR_THRESHOLD`] comes through.
///
/// The inner handler is borrowed, never owned. Every report reaches it
/// unchanged before the bail check runs. If the inner handler panics on an
/// error, the bail still happens; below the threshold the panic carries on
/// to the caller.
///
/// With the default [`ProcessExit`] a bail ends the entire process with status
/// [`BAIL_STATUS`], other threads included, without unwinding. The wrapper adds
/// no locking: it is `Sync` only when the inner handler and exit policy are.
pub struct BailErrorHandler<'a, H: ErrorHandler + ?Sized, X: ExitWithError = ProcessExit> {
    inner: &'a H,
    exit_with_error: X,
}

impl<'a, H: ErrorHandler + ?Sized> BailErrorHandler<'a, H> {
    pub fn new(inner: &'a H) -> Self {
        BailErrorHandler::with_exit(inner, ProcessExit)
    }
}

impl<'a, H: ErrorHandler + ?Sized, X: ExitWithError> BailErrorHandler<'a, H, X> {
    pub fn with_exit(inner: &'a H, exit_with_error: X) -> Self {
        BailErrorHandler {
            inner,
            exit_with_error,
        }
    }

    pub fn inner(&self) -> &'a H {
        self.inner
    }
}

impl<H: ErrorHandler + ?Sized, X: ExitWithError> ErrorHandler for BailErrorHandler<'_, H, X> {
    fn handle_text(&self, severity: Severity, text: &str) {
        let delivered =
            panic::catch_unwind(AssertUnwindSafe(|| self.inner.handle_text(severity, text)));

        if severity.is_error() {
            tracing::debug!(%severity, status = BAIL_STATUS, "bailing");
            self.exit_with_error.exit(BAIL_STATUS);
        }

        if let Err(payload) = delivered {
            panic::resume_unwind(payload);
        }
    }
}

/// Mocks and helpers for tests, here and in the binaries.
pub mod test_utils {
    use super::*;
    use std::cell::RefCell;

    /// Remembers every report in arrival order.
    #[derive(Default)]
    pub struct RecordingErrorHandler {
        reports: RefCell<Vec<(Severity, String)>>,
    }

    impl RecordingErrorHandler {
        pub fn reports(&self) -> Vec<(Severity, String)> {
            self.reports.borrow().clone()
        }
    }

    impl ErrorHandler for RecordingErrorHandler {
        fn handle_text(&self, severity: Severity, text: &str) {
            self.reports
                .borrow_mut()
                .push((severity, text.to_string()));
        }
    }

    /// Panics instead of exiting so a bail can be observed in-process.
    pub struct MockExitWithError {}

    impl ExitWithError for MockExitWithError {
        fn exit(&self, status: i32) -> ! {
            panic!("exit {status}");
        }
    }

    pub fn get_bail_handler(
        inner: &RecordingErrorHandler,
    ) -> BailErrorHandler<'_, RecordingErrorHandler, MockExitWithError> {
        BailErrorHandler::with_exit(inner, MockExitWithError {})
    }

    /// Panics on every report.
    pub struct PanickingErrorHandler {}

    impl ErrorHandler for PanickingErrorHandler {
        fn handle_text(&self, _: Severity, _: &str) {
            panic!("inner failed");
        }
    }

    /// Runs `f`, returning the status it would have exited with, if any.
    /// Panics other than a mocked exit are passed on.
    pub fn exit_status<F: FnOnce()>(f: F) -> Option<i32> {
        let payload = panic::catch_unwind(AssertUnwindSafe(f)).err()?;
        let status = payload
            .downcast_ref::<String>()
            .and_then(|message| message.strip_prefix("exit "))
            .and_then(|status| status.parse().ok());

        match status {
            Some(status) => Some(status),
            None => panic::resume_unwind(payload),
        }
    }
}
