// src/exit.rs
//! Standardized process exit codes for `archgauge`.
//!
//! Provides a stable contract for scripts and automation.

use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ArchGaugeExit {
    /// Operation completed successfully.
    Success = 0,
    /// Generic error (e.g. IO, config, unwalkable root).
    Error = 1,
    /// Input validation failed (unparsable file, malformed dependency map).
    InvalidInput = 2,
    /// A check failed (audit violation, dependency cycle).
    CheckFailed = 6,
}

impl ArchGaugeExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl Termination for ArchGaugeExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}

impl From<anyhow::Result<ArchGaugeExit>> for ArchGaugeExit {
    fn from(res: anyhow::Result<ArchGaugeExit>) -> Self {
        match res {
            Ok(code) => code,
            Err(e) => {
                eprintln!("error: {e:#}");
                Self::Error
            }
        }
    }
}
