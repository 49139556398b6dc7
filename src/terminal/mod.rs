pub mod events;
pub mod state;
pub mod ui;

use anyhow::Result;
use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{self, Event, KeyEventKind};

use crate::mail::MailProvider;
use crate::review::Review;
use state::ReviewScreen;

/// Interactive review of flagged emails. Returns once the user quits; the
/// review keeps whatever was not trashed or deleted.
pub fn run_review(review: &mut Review, provider: &dyn MailProvider) -> Result<()> {
    let terminal = ratatui::init();
    let result = run(terminal, ReviewScreen::new(review), provider);
    ratatui::restore();
    result
}

fn run(
    mut terminal: DefaultTerminal,
    mut state: ReviewScreen<'_>,
    provider: &dyn MailProvider,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, &state))?;
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && events::handle_key(key, &mut state, provider)?
        {
            return Ok(());
        }
    }
}
