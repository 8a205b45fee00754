//! Append-only transcript of answered questions.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One answered question, immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub sequence_index: u64,
    pub query: String,
    pub response: String,
    /// Destination the assistant was bound to when it answered.
    pub country: String,
    pub recorded_at: DateTime<Utc>,
}

/// Ordered log of exchanges for one session. Sequence indices start at 0
/// and increase by one per append; entries are never reordered or edited.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an exchange and return its sequence index.
    pub fn append(
        &mut self,
        query: impl Into<String>,
        response: impl Into<String>,
        country: impl Into<String>,
    ) -> u64 {
        let sequence_index = self
            .entries
            .last()
            .map_or(0, |last| last.sequence_index + 1);
        self.entries.push(HistoryEntry {
            sequence_index,
            query: query.into(),
            response: response.into(),
            country: country.into(),
            recorded_at: Utc::now(),
        });
        sequence_index
    }

    /// Entries oldest first.
    pub fn list(&self) -> Vec<HistoryEntry> {
        self.entries.clone()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, sequence_index: u64) -> Option<&HistoryEntry> {
        usize::try_from(sequence_index)
            .ok()
            .and_then(|i| self.entries.get(i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn indices_start_at_zero_and_increase() {
        let mut store = HistoryStore::new();
        assert_eq!(store.append("q0", "r0", "Italy"), 0);
        assert_eq!(store.append("q1", "r1", "Italy"), 1);
        assert_eq!(store.append("q2", "r2", "Germany"), 2);

        let indices: Vec<u64> = store.list().iter().map(|e| e.sequence_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn list_is_ordered_and_repeatable() {
        let mut store = HistoryStore::new();
        store.append("first", "a", "Italy");
        store.append("second", "b", "Italy");

        let once = store.list();
        let twice = store.list();

        assert_eq!(once, twice);
        assert_eq!(once[0].query, "first");
        assert_eq!(once[1].query, "second");
    }

    #[test]
    fn get_looks_up_by_sequence_index() {
        let mut store = HistoryStore::new();
        store.append("q", "r", "Spain");
        assert_eq!(store.get(0).map(|e| e.country.as_str()), Some("Spain"));
        assert!(store.get(1).is_none());
    }

    #[test]
    fn entries_serialize_for_export() {
        let mut store = HistoryStore::new();
        store.append("What visa do I need?", "A D visa.", "Italy");

        let json = serde_json::to_value(store.entries()).unwrap();

        assert_eq!(json[0]["sequence_index"], 0);
        assert_eq!(json[0]["query"], "What visa do I need?");
        assert_eq!(json[0]["country"], "Italy");
        assert!(json[0]["recorded_at"].is_string());
    }
}
