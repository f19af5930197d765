//! History search and ordering.

use super::entities::ConversationEntry;

/// Order in which history entries are listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Filter and order applied to a caller's history (Value Object)
///
/// The search term matches, case-insensitively, anywhere in the question,
/// in any model's answer text or in any model id. An empty term matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    search: Option<String>,
    pub order: SortOrder,
}

impl HistoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into().to_lowercase();
        self.search = (!term.is_empty()).then_some(term);
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn matches(&self, entry: &ConversationEntry) -> bool {
        let Some(term) = self.search.as_deref() else {
            return true;
        };

        entry.question.to_lowercase().contains(term)
            || entry.results.iter().any(|r| {
                r.answer_text.to_lowercase().contains(term)
                    || r.model.as_str().to_lowercase().contains(term)
            })
    }

    /// Filter `entries` (newest first, as recorders return them) and put
    /// them in the requested order.
    ///
    /// Entries with equal timestamps keep their recording order.
    pub fn apply(&self, entries: Vec<ConversationEntry>) -> Vec<ConversationEntry> {
        let mut entries: Vec<_> = entries.into_iter().filter(|e| self.matches(e)).collect();
        match self.order {
            SortOrder::NewestFirst => entries.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::OldestFirst => {
                entries.reverse();
                entries.sort_by_key(|e| e.created_at);
            }
        }
        entries
    }
}
