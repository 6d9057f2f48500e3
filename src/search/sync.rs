//! Keeps the navigable URL, the search box, the gender picker and the grid's
//! pagination in agreement.
//!
//! The URL history is the only writable state. Every input is turned into a
//! new [`QueryDescriptor`], written to the history (push or replace), and
//! everything else is re-derived from the URL.

use tracing::{debug, info};

use super::descriptor::{PaginationState, QueryDescriptor};
use crate::api::types::Gender;
use crate::telemetry::sanitize_for_log;

/// How a commit is recorded in the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// New entry; back returns to the previous one.
    Push,
    /// Overwrites the current entry.
    Replace,
    /// Moved through existing entries with back/forward.
    Traverse,
}

/// A change of the committed query. Each one warrants a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub descriptor: QueryDescriptor,
    pub mode: HistoryMode,
    pub revision: u64,
}

/// Issued with a fetch; the response is applied only if the ticket is
/// still accepted when it arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub descriptor: QueryDescriptor,
    pub revision: u64,
    /// Data epoch at issue time; see [`SearchSync::mark_data_changed`].
    pub epoch: u64,
}

/// Browser-style history of URLs.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    index: usize,
}

impl History {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            entries: vec![url.into()],
            index: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    /// Append after the current entry, dropping any forward entries.
    pub fn push(&mut self, url: impl Into<String>) {
        self.entries.truncate(self.index + 1);
        self.entries.push(url.into());
        self.index = self.entries.len() - 1;
    }

    pub fn replace(&mut self, url: impl Into<String>) {
        self.entries[self.index] = url.into();
    }

    pub fn back(&mut self) -> Option<&str> {
        if self.can_go_back() {
            self.index -= 1;
            Some(self.current())
        } else {
            None
        }
    }

    pub fn forward(&mut self) -> Option<&str> {
        if self.can_go_forward() {
            self.index += 1;
            Some(self.current())
        } else {
            None
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

pub struct SearchSync {
    history: History,
    descriptor: QueryDescriptor,
    default_per_page: u32,
    /// What the search box shows; not committed until the debounce fires.
    search_text: String,
    revision: u64,
    epoch: u64,
}

impl SearchSync {
    /// Start from a deep link. Invalid parameters fall back silently and the
    /// history starts at the canonical form of the URL.
    pub fn new(initial_url: &str, default_per_page: u32) -> Self {
        let descriptor = QueryDescriptor::from_url(initial_url, default_per_page);
        debug!("initial query {}", descriptor);
        Self {
            history: History::new(descriptor.to_url()),
            search_text: descriptor.name.clone().unwrap_or_default(),
            descriptor,
            default_per_page,
            revision: 0,
            epoch: 0,
        }
    }

    pub fn current(&self) -> &QueryDescriptor {
        &self.descriptor
    }

    pub fn current_url(&self) -> &str {
        self.history.current()
    }

    pub fn pagination(&self) -> PaginationState {
        self.descriptor.pagination()
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Navigate to a URL, e.g. a pasted deep link. Pushes.
    pub fn navigate(&mut self, url: &str) -> Option<Commit> {
        let next = QueryDescriptor::from_url(url, self.default_per_page);
        let commit = self.apply(next, HistoryMode::Push)?;
        self.search_text = commit.descriptor.name.clone().unwrap_or_default();
        Some(commit)
    }

    pub fn back(&mut self) -> Option<Commit> {
        let url = self.history.back()?.to_string();
        Some(self.reload(&url))
    }

    pub fn forward(&mut self) -> Option<Commit> {
        let url = self.history.forward()?.to_string();
        Some(self.reload(&url))
    }

    /// Record keystrokes in the search box. Nothing is committed.
    pub fn on_search_input(&mut self, text: &str) {
        self.search_text = text.to_string();
    }

    /// The debounced search firing: back to page 1, name set (or cleared
    /// when empty), current entry replaced.
    pub fn commit_search(&mut self, term: &str) -> Option<Commit> {
        self.search_text = term.to_string();
        let next = self.descriptor.searched(term);
        self.apply(next, HistoryMode::Replace)
    }

    /// Gender picker selection. An empty or unknown value is ignored; the
    /// filter cannot be cleared from the picker.
    pub fn select_gender(&mut self, value: &str) -> Option<Commit> {
        if value.is_empty() {
            return None;
        }
        let gender = match value.parse::<Gender>() {
            Ok(g) => g,
            Err(e) => {
                debug!("ignoring gender selection: {}", sanitize_for_log(&e));
                return None;
            }
        };
        let next = self.descriptor.filtered(gender);
        self.apply(next, HistoryMode::Replace)
    }

    /// Grid pagination moved. Pushes when it differs from the URL.
    pub fn on_pagination_change(&mut self, state: PaginationState) -> Option<Commit> {
        if state == self.descriptor.pagination() {
            return None;
        }
        let next = self.descriptor.paginated(state);
        self.apply(next, HistoryMode::Push)
    }

    pub fn ticket(&self) -> FetchTicket {
        FetchTicket {
            descriptor: self.descriptor.clone(),
            revision: self.revision,
            epoch: self.epoch,
        }
    }

    /// Record that server data changed. Tickets issued before this no
    /// longer match, even for the same URL.
    pub fn mark_data_changed(&mut self) {
        self.epoch += 1;
    }

    /// Whether a response fetched under `ticket` still describes what the
    /// URL asks for, against data at least as new as the last change.
    pub fn accepts(&self, ticket: &FetchTicket) -> bool {
        ticket.descriptor == self.descriptor && ticket.epoch == self.epoch
    }

    fn apply(&mut self, next: QueryDescriptor, mode: HistoryMode) -> Option<Commit> {
        if next == self.descriptor {
            return None;
        }
        let url = next.to_url();
        match mode {
            HistoryMode::Push => self.history.push(url),
            HistoryMode::Replace => self.history.replace(url),
            HistoryMode::Traverse => {}
        }
        Some(self.commit(next, mode))
    }

    fn reload(&mut self, url: &str) -> Commit {
        let descriptor = QueryDescriptor::from_url(url, self.default_per_page);
        self.search_text = descriptor.name.clone().unwrap_or_default();
        self.commit(descriptor, HistoryMode::Traverse)
    }

    fn commit(&mut self, descriptor: QueryDescriptor, mode: HistoryMode) -> Commit {
        self.revision += 1;
        self.descriptor = descriptor.clone();
        info!(
            "query r{} {:?}: {}",
            self.revision,
            mode,
            sanitize_for_log(&descriptor.to_url())
        );
        Commit {
            descriptor,
            mode,
            revision: self.revision,
        }
    }
}
