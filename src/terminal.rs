use std::io;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::warn;

/// Keeps the terminal in raw mode while alive.
///
/// Raw mode is left on drop, so early returns through `?` and panics
/// unwinding out of the draw loop still restore the terminal.
pub struct RawModeGuard {
    restore: fn() -> io::Result<()>,
}

impl RawModeGuard {
    pub fn enable() -> io::Result<Self> {
        Self::with_hooks(enable_raw_mode, disable_raw_mode)
    }

    fn with_hooks(enter: fn() -> io::Result<()>, restore: fn() -> io::Result<()>) -> io::Result<Self> {
        enter()?;
        Ok(RawModeGuard { restore })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = (self.restore)() {
            warn!(error = %e, "could not leave raw mode");
        }
    }
}
