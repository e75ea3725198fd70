use std::io::{stdout, Write};

use anyhow::Context;
use crossterm::{cursor, terminal, ExecutableCommand};

/// Turns off everything the half-block renderer switches on mid-frame:
/// synchronized updates, autowrap suppression, SGR colors.
const RENDER_MODES_OFF: &[u8] = b"\x1b[?2026l\x1b[?7h\x1b[0m";

/// Raw-mode and alternate-screen session. Restoration runs at most once,
/// either explicitly via `restore` or on drop, so the terminal comes back
/// even when the frame loop bails with an error.
pub struct TerminalGuard {
    restored: bool,
}

impl TerminalGuard {
    pub fn enter() -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        let mut guard = Self { restored: false };
        if let Err(e) = screen_setup() {
            guard.restore();
            return Err(e);
        }
        Ok(guard)
    }

    pub fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        let _ = terminal::disable_raw_mode();
        let mut out = stdout();
        let _ = out.write_all(RENDER_MODES_OFF);
        let _ = out.flush();
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
    }
}

fn screen_setup() -> anyhow::Result<()> {
    let mut out = stdout();
    out.execute(terminal::EnterAlternateScreen)
        .context("enter alternate screen")?;
    out.execute(cursor::Hide).context("hide cursor")?;
    Ok(())
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.restore();
    }
}
