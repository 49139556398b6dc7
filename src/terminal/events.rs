use anyhow::Result;
use ratatui::crossterm::event::{KeyCode, KeyEvent};

use crate::cleanup::delete_selected;
use crate::domain::email::DeleteMode;
use crate::mail::MailProvider;
use crate::terminal::state::{ReviewScreen, StatusKind};

/// Returns `Ok(true)` when the user wants to leave the review screen.
pub fn handle_key(
    key: KeyEvent,
    state: &mut ReviewScreen<'_>,
    provider: &dyn MailProvider,
) -> Result<bool> {
    if state.confirm_delete {
        state.confirm_delete = false;
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                run_action(state, provider, DeleteMode::PermanentDelete)
            }
            _ => state.set_status(StatusKind::Info, "Permanent delete cancelled."),
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),

        KeyCode::Down | KeyCode::Char('j') => state.move_cursor(1),
        KeyCode::Up | KeyCode::Char('k') => state.move_cursor(-1),
        KeyCode::PageDown => state.scroll_body(10),
        KeyCode::PageUp => state.scroll_body(-10),

        KeyCode::Char(' ') => state.toggle_highlighted(),
        KeyCode::Char('a') => state.toggle_select_all(),

        KeyCode::Right | KeyCode::Char('n') => state.change_page(1),
        KeyCode::Left | KeyCode::Char('p') => state.change_page(-1),

        KeyCode::Char('t') => run_action(state, provider, DeleteMode::Trash),
        KeyCode::Char('D') => {
            if state.review.selection().is_empty() {
                state.set_status(StatusKind::Warning, "Nothing selected.");
            } else {
                state.confirm_delete = true;
                state.set_status(
                    StatusKind::Warning,
                    format!(
                        "Permanently delete {} emails? This cannot be undone. (y/n)",
                        state.review.selection().len()
                    ),
                );
            }
        }
        _ => {}
    }
    Ok(false)
}

fn run_action(state: &mut ReviewScreen<'_>, provider: &dyn MailProvider, mode: DeleteMode) {
    if state.review.selection().is_empty() {
        state.set_status(StatusKind::Warning, "Nothing selected.");
        return;
    }

    let verb = match mode {
        DeleteMode::Trash => "Moved",
        DeleteMode::PermanentDelete => "Deleted",
    };
    match delete_selected(provider, state.review, mode) {
        Ok(n) => {
            let suffix = if mode == DeleteMode::Trash { " to trash" } else { "" };
            state.set_status(StatusKind::Success, format!("{verb} {n} emails{suffix}."));
        }
        Err(e) => state.set_status(StatusKind::Error, format!("{e:#}")),
    }
    state.after_removal();
}
