use ratatui::widgets::ListState;

use crate::domain::email::Email;
use crate::review::Review;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

pub struct ReviewScreen<'a> {
    pub review: &'a mut Review,
    /// Cursor within the current page.
    pub list_state: ListState,
    pub body_scroll: u16,
    pub status: Option<Status>,
    /// Waiting for y/n before a permanent delete.
    pub confirm_delete: bool,
}

impl<'a> ReviewScreen<'a> {
    pub fn new(review: &'a mut Review) -> Self {
        let mut s = Self {
            review,
            list_state: ListState::default(),
            body_scroll: 0,
            status: None,
            confirm_delete: false,
        };
        s.reset_cursor();
        s
    }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(Status {
            kind,
            text: text.into(),
        });
    }

    /// Back to the first row, or no row when the page is empty.
    pub fn reset_cursor(&mut self) {
        let sel = (!self.review.page_items().is_empty()).then_some(0);
        self.list_state.select(sel);
        self.body_scroll = 0;
    }

    pub fn highlighted(&self) -> Option<&Email> {
        let idx = self.list_state.selected()?;
        self.review.page_items().get(idx)
    }

    pub fn move_cursor(&mut self, delta: i32) {
        let len = self.review.page_items().len();
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let cur = self.list_state.selected().unwrap_or(0) as i32;
        let next = (cur + delta).clamp(0, len as i32 - 1) as usize;
        self.list_state.select(Some(next));
        self.body_scroll = 0;
    }

    pub fn toggle_highlighted(&mut self) {
        let Some(id) = self.highlighted().map(|e| e.id.clone()) else {
            return;
        };
        let included = !self.review.is_selected(&id);
        self.review.toggle_one(&id, included);
    }

    pub fn toggle_select_all(&mut self) {
        let on = !self.review.all_page_selected();
        self.review.toggle_select_all(on);
    }

    pub fn change_page(&mut self, delta: isize) {
        let before = self.review.page_index();
        self.review.change_page(delta);
        if self.review.page_index() != before {
            self.reset_cursor();
        }
    }

    pub fn scroll_body(&mut self, delta: i32) {
        if delta < 0 {
            self.body_scroll = self.body_scroll.saturating_sub((-delta) as u16);
        } else {
            self.body_scroll = self.body_scroll.saturating_add(delta as u16);
        }
    }

    /// Keep the cursor on a real row after emails were removed.
    pub fn after_removal(&mut self) {
        let len = self.review.page_items().len();
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            None => self.list_state.select(Some(0)),
            _ => {}
        }
        self.body_scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::emails;

    #[test]
    fn cursor_stays_on_page() {
        let mut review = Review::new(emails(12));
        let mut s = ReviewScreen::new(&mut review);
        s.move_cursor(50);
        assert_eq!(s.highlighted().map(|e| e.id.as_str()), Some("m9"));
        s.change_page(1);
        assert_eq!(s.highlighted().map(|e| e.id.as_str()), Some("m10"));
        s.move_cursor(5);
        assert_eq!(s.list_state.selected(), Some(1));
    }

    #[test]
    fn select_all_toggles_between_page_and_nothing() {
        let mut review = Review::new(emails(4));
        let mut s = ReviewScreen::new(&mut review);
        s.toggle_select_all();
        assert_eq!(s.review.selection().len(), 4);
        s.toggle_select_all();
        assert!(s.review.selection().is_empty());

        s.toggle_highlighted();
        assert!(s.review.is_selected("m0"));
        s.toggle_highlighted();
        assert!(!s.review.is_selected("m0"));
    }

    #[test]
    fn empty_review_has_no_cursor() {
        let mut review = Review::default();
        let mut s = ReviewScreen::new(&mut review);
        assert!(s.highlighted().is_none());
        s.toggle_highlighted();
        s.move_cursor(1);
        assert!(s.list_state.selected().is_none());
    }
}
