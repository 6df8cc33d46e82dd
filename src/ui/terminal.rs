use std::io;

use anyhow::{Context, Result};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use crossterm::tty::IsTty;
use log::error;

use super::app::App;
use super::helpers::surface_error;
use super::prompt::Prompt;
use crate::db::Database;

/// Drive the menu over stdin and stdout until the user exits. Styling and the
/// initial screen clear only happen when stdout is an interactive terminal, so
/// piped sessions get plain text.
pub fn run_app(db: &Database) -> Result<()> {
    let mut stdout = io::stdout();
    let interactive = stdout.is_tty();
    if interactive {
        execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))
            .context("failed to clear the screen")?;
    }

    let prompt = Prompt::new(io::stdin().lock(), stdout.lock(), interactive);
    let mut app = App::new(db, prompt);
    app.run().inspect_err(|err| {
        error!("menu aborted: {}", surface_error(err));
    })
}
