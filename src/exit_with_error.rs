use std::process;

/// Exit status used when a handler bails.
pub const BAIL_STATUS: i32 = 1;

/// How a bailing handler ends the program.
pub trait ExitWithError {
    fn exit(&self, status: i32) -> !;
}

/// Terminates the whole process, every thread included. Nothing is unwound
/// and no destructors run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl ExitWithError for ProcessExit {
    fn exit(&self, status: i32) -> ! {
        process::exit(status);
    }
}

/// Hands termination to a routine supplied by the host, for programs that
/// must tear down in their own way instead of dying on the spot.
#[derive(Clone, Copy)]
pub struct ExitCallback(pub fn(i32) -> !);

impl ExitWithError for ExitCallback {
    fn exit(&self, status: i32) -> ! {
        (self.0)(status)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::panic;

    fn abort_with_status(status: i32) -> ! {
        panic!("callback status {status}");
    }

    #[test]
    fn test_exit_callback() {
        let callback = ExitCallback(abort_with_status);

        let payload = panic::catch_unwind(|| {
            callback.exit(BAIL_STATUS);
        })
        .unwrap_err();

        assert_eq!(
            Some("callback status 1"),
            payload.downcast_ref::<String>().map(String::as_str)
        );
    }
}
