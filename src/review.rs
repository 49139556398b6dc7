//! Pagination and selection over the emails a scan flagged.

use std::collections::HashSet;

use crate::domain::email::{Email, EmailId};

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Default)]
pub struct Review {
    results: Vec<Email>,
    page_index: usize,
    selection: HashSet<EmailId>,
}

impl Review {
    pub fn new(results: Vec<Email>) -> Self {
        Self {
            results,
            ..Self::default()
        }
    }

    /// Drop everything; used when a new scan starts.
    pub fn reset(&mut self) {
        self.results.clear();
        self.selection.clear();
        self.page_index = 0;
    }

    pub fn push(&mut self, email: Email) {
        self.results.push(email);
    }

    pub fn results(&self) -> &[Email] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn total_pages(&self) -> usize {
        self.results.len().div_ceil(PAGE_SIZE)
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    fn clamp_page(&mut self) {
        self.page_index = self.page_index.min(self.total_pages().saturating_sub(1));
    }

    pub fn page_items(&self) -> &[Email] {
        let start = (self.page_index * PAGE_SIZE).min(self.results.len());
        let end = (start + PAGE_SIZE).min(self.results.len());
        &self.results[start..end]
    }

    /// Move by `delta` pages, clamped; selection does not survive the move.
    pub fn change_page(&mut self, delta: isize) {
        self.page_index = self.page_index.saturating_add_signed(delta);
        self.clamp_page();
        self.selection.clear();
    }

    pub fn selection(&self) -> &HashSet<EmailId> {
        &self.selection
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    /// Selected ids in page order.
    pub fn selected_ids(&self) -> Vec<EmailId> {
        self.page_items()
            .iter()
            .filter(|e| self.selection.contains(&e.id))
            .map(|e| e.id.clone())
            .collect()
    }

    pub fn all_page_selected(&self) -> bool {
        let items = self.page_items();
        !items.is_empty() && items.iter().all(|e| self.selection.contains(&e.id))
    }

    /// Replace the selection with the whole current page, or with nothing.
    pub fn toggle_select_all(&mut self, on: bool) {
        self.selection = if on {
            self.page_items().iter().map(|e| e.id.clone()).collect()
        } else {
            HashSet::new()
        };
    }

    /// Ids not on the current page are ignored.
    pub fn toggle_one(&mut self, id: &str, included: bool) {
        if !included {
            self.selection.remove(id);
        } else if self.page_items().iter().any(|e| e.id == id) {
            self.selection.insert(id.to_string());
        }
    }

    pub fn remove(&mut self, ids: &[EmailId]) {
        let gone: HashSet<&str> = ids.iter().map(String::as_str).collect();
        self.results.retain(|e| !gone.contains(e.id.as_str()));
        self.selection.clear();
        self.clamp_page();
    }
}
