//! Termination flag
//!
//! Handlers and the event loop request shutdown by setting an exit code.
//! The first code set wins; later requests are ignored so the log reports
//! the original cause.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::exit::ExitCode;

/// Sentinel meaning "still running"
const RUNNING: u8 = u8::MAX;

/// Shared termination state
///
/// Can live in a `static`; all methods take `&self`.
#[derive(Debug)]
pub struct Termination {
    code: AtomicU8,
}

impl Default for Termination {
    fn default() -> Self {
        Self::new()
    }
}

impl Termination {
    pub const fn new() -> Self {
        Self {
            code: AtomicU8::new(RUNNING),
        }
    }

    /// Request termination with `code`
    ///
    /// Returns `false` if termination was already requested.
    pub fn terminate(&self, code: ExitCode) -> bool {
        let accepted = self
            .code
            .compare_exchange(RUNNING, code.as_u8(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if accepted {
            log::info!("termination requested: {:?}", code);
        }
        accepted
    }

    pub fn is_terminated(&self) -> bool {
        self.code.load(Ordering::Acquire) != RUNNING
    }

    /// Exit code to report, `Success` while still running
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from_u8(self.code.load(Ordering::Acquire)).unwrap_or(ExitCode::Success)
    }
}
