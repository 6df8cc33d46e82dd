//! Numbered text menu over stdin/stdout. `Prompt` owns the line-level I/O,
//! `App` owns the menu state and talks to the repositories.

mod app;
mod helpers;
mod prompt;
mod terminal;

pub use app::App;
pub use prompt::{EndOfInput, Prompt};
pub use terminal::run_app;
