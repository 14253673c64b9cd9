use anyhow::Context;
use crossterm::{
    cursor,
    terminal::{self, ClearType},
    ExecutableCommand,
};
use std::io::{stdout, Stdout, Write};

/// Smallest terminal the home screen can lay out in.
pub const MIN_COLS: u16 = 4;
pub const MIN_ROWS: u16 = 2;

/// Raw mode and the alternate screen for the lifetime of the session.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn new() -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        // Drop restores the terminal if a later step fails.
        let guard = Self { _private: () };

        let mut out = stdout();
        out.execute(terminal::EnterAlternateScreen)
            .context("enter alternate screen")?;
        out.execute(terminal::Clear(ClearType::All))
            .context("clear screen")?;
        out.execute(cursor::Hide).context("hide cursor")?;
        tracing::debug!("terminal entered raw mode");

        Ok(guard)
    }

    pub fn stdout() -> Stdout {
        stdout()
    }

    /// Current (cols, rows), rejecting terminals too small to draw into.
    pub fn size() -> anyhow::Result<(u16, u16)> {
        let (cols, rows) = terminal::size().context("get terminal size")?;
        if cols < MIN_COLS || rows < MIN_ROWS {
            anyhow::bail!(
                "terminal too small (need at least {MIN_COLS}x{MIN_ROWS}, got {cols}x{rows})"
            );
        }
        Ok((cols, rows))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let mut out = stdout();
        // Sync output, autowrap and colors may still be in the state a frame left them.
        let _ = out.write_all(b"\x1b[?2026l\x1b[?7h\x1b[0m");
        let _ = out.flush();
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        tracing::debug!("terminal restored");
    }
}
