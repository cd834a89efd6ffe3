//! Terminal setup and the editor event loop.

use std::io;

use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;
use tracing::debug;

use crate::editor::RecipeEditor;
use crate::storage::RecipeStore;

use super::screens::{EditorScreen, Outcome};

/// Runs the editor dialog until the user closes it.
///
/// Closing discards anything not saved. The terminal is restored on every
/// exit, including a panic inside the loop.
pub fn run(editor: RecipeEditor, store: &RecipeStore) -> io::Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, EditorScreen::new(editor), store);
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    mut screen: EditorScreen,
    store: &RecipeStore,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| screen.render(frame))?;

        if let Event::Key(key) = event::read()? {
            if screen.handle_key(key, store) == Outcome::Close {
                debug!(state = ?screen.editor().state(), "editor closed");
                return Ok(());
            }
        }
    }
}
