use std::collections::VecDeque;

use time::OffsetDateTime;

use crate::core::config::DEFAULT_HISTORY_LIMIT;
use crate::models::layer::LayerId;

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub layer_id: LayerId,
    /// Creation-order index of the layer when it was visited.
    pub layer_index: usize,
    pub visited_at: OffsetDateTime,
}

/// Bounded linear undo log of activations.
///
/// `cursor` points at the entry for the current position; entries after it
/// are the redo branch, which is dropped by the next `record`.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    entries: VecDeque<HistoryEntry>,
    cursor: Option<usize>,
    limit: usize,
}

impl Default for NavigationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl NavigationHistory {
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit),
            cursor: None,
            limit,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.cursor.and_then(|cursor| self.entries.get(cursor))
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor.map_or(false, |cursor| cursor > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor
            .map_or(false, |cursor| cursor + 1 < self.entries.len())
    }

    pub fn record(&mut self, layer_id: LayerId, layer_index: usize) {
        self.discard_redo();
        self.entries.push_back(HistoryEntry {
            layer_id,
            layer_index,
            visited_at: OffsetDateTime::now_utc(),
        });
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Drops every entry after the cursor.
    pub fn discard_redo(&mut self) {
        match self.cursor {
            Some(cursor) => self.entries.truncate(cursor + 1),
            None => self.entries.clear(),
        }
    }

    /// Steps the cursor back and returns the entry it now points at.
    pub fn back(&mut self) -> Option<&HistoryEntry> {
        if !self.can_go_back() {
            return None;
        }
        let cursor = self.cursor? - 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor)
    }

    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        if !self.can_go_forward() {
            return None;
        }
        let cursor = self.cursor? + 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor)
    }

    /// Removes every visit to `layer_id` and merges the consecutive duplicate
    /// visits this leaves behind. The cursor stays on the nearest earlier
    /// surviving entry.
    pub fn purge(&mut self, layer_id: &LayerId) {
        let Some(cursor) = self.cursor else {
            return;
        };
        let mut kept: VecDeque<HistoryEntry> = VecDeque::with_capacity(self.entries.len());
        let mut new_cursor = None;
        for (index, entry) in self.entries.drain(..).enumerate() {
            let repeats_last = kept
                .back()
                .map_or(false, |last| last.layer_id == entry.layer_id);
            if &entry.layer_id != layer_id && !repeats_last {
                kept.push_back(entry);
            }
            if index <= cursor && !kept.is_empty() {
                new_cursor = Some(kept.len() - 1);
            }
        }
        if new_cursor.is_none() && !kept.is_empty() {
            new_cursor = Some(0);
        }
        self.entries = kept;
        self.cursor = new_cursor;
    }
}
