/*
[INPUT]:  Crossterm stdout, terminal raw mode, ratatui backend
[OUTPUT]: TerminalGuard managing alternate screen lifecycle
[POS]:    TUI terminal lifecycle guard
[UPDATE]: When terminal setup or restore steps change
*/

use std::io;

use anyhow::{Context, Result};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, cursor, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub(super) struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    pub(super) fn new() -> Result<Self> {
        install_panic_restore();
        terminal::enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        stdout
            .execute(EnterAlternateScreen)
            .context("enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("create terminal")?;
        terminal.hide_cursor().context("hide cursor")?;
        Ok(Self { terminal })
    }

    pub(super) fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

fn restore() {
    let mut stdout = io::stdout();
    let _ = stdout.execute(LeaveAlternateScreen);
    let _ = stdout.execute(cursor::Show);
    let _ = terminal::disable_raw_mode();
}

/// Leave the alternate screen before the panic message prints
fn install_panic_restore() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        previous(info);
    }));
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        restore();
    }
}
