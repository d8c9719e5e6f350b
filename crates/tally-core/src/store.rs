//! In-memory item store
//!
//! A single Vec kept in ascending index order. Operations are plain
//! synchronous mutations; the API server puts the store behind a lock.

use serde::Deserialize;

use crate::{Error, ListItem, Result};

/// Read filter for list items
///
/// `specific_index` takes precedence; the range applies only when both
/// bounds are present. With no usable selector the full collection is
/// returned.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemQuery {
    pub specific_index: Option<u32>,
    pub start_index: Option<u32>,
    pub end_index: Option<u32>,
}

/// Delete selector: exact index, inclusive range, or exact content
///
/// Same precedence as [`ItemQuery`], with content as the last resort.
/// Unlike a read, a delete with no selector is an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteQuery {
    pub specific_index: Option<u32>,
    pub start_index: Option<u32>,
    pub end_index: Option<u32>,
    pub content: Option<String>,
}

/// In-memory store for list items
///
/// Owns the whole collection and enforces index uniqueness. At most one
/// item exists per index at any time.
pub struct ItemStore {
    items: Vec<ListItem>,
}

impl ItemStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// All items, ascending by index
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn index_exists(&self, index: u32) -> bool {
        self.items.iter().any(|item| item.index == index)
    }

    fn sort(&mut self) {
        self.items.sort_by_key(|item| item.index);
    }

    /// Add a batch of items
    ///
    /// The whole batch is rejected if any incoming index collides with
    /// a stored item or with an earlier item in the same batch; nothing
    /// is inserted on failure.
    pub fn add(&mut self, new_items: Vec<ListItem>) -> Result<()> {
        for (pos, item) in new_items.iter().enumerate() {
            if self.index_exists(item.index)
                || new_items[..pos].iter().any(|other| other.index == item.index)
            {
                return Err(Error::IndexConflict(item.index));
            }
        }
        self.items.extend(new_items);
        self.sort();
        Ok(())
    }

    /// Query items by the filter's precedence order
    ///
    /// Never fails; unmatched filters yield an empty vec.
    pub fn query(&self, query: &ItemQuery) -> Vec<ListItem> {
        if let Some(index) = query.specific_index {
            self.items
                .iter()
                .filter(|item| item.index == index)
                .cloned()
                .collect()
        } else if let (Some(start), Some(end)) = (query.start_index, query.end_index) {
            self.items
                .iter()
                .filter(|item| start <= item.index && item.index <= end)
                .cloned()
                .collect()
        } else {
            self.items.clone()
        }
    }

    /// Replace stored items wholesale by index
    ///
    /// All-or-nothing: every target index must already exist. On a
    /// missing index the whole batch is rejected and the store is left
    /// untouched.
    pub fn update(&mut self, updated_items: Vec<ListItem>) -> Result<()> {
        for item in &updated_items {
            if !self.index_exists(item.index) {
                return Err(Error::NotFound(item.index));
            }
        }
        for updated in updated_items {
            if let Some(slot) = self.items.iter_mut().find(|item| item.index == updated.index) {
                *slot = updated;
            }
        }
        self.sort();
        Ok(())
    }

    /// Delete every item matching the selector
    ///
    /// Range and content selectors may remove several items. Returns
    /// the removed count; removing nothing is still a success.
    pub fn delete(&mut self, query: &DeleteQuery) -> Result<usize> {
        let before = self.items.len();
        if let Some(index) = query.specific_index {
            self.items.retain(|item| item.index != index);
        } else if let (Some(start), Some(end)) = (query.start_index, query.end_index) {
            self.items
                .retain(|item| !(start <= item.index && item.index <= end));
        } else if let Some(content) = &query.content {
            self.items.retain(|item| item.content != *content);
        } else {
            return Err(Error::MissingSelector);
        }
        self.sort();
        Ok(before - self.items.len())
    }

    /// Remove every item unconditionally
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Replace the collection with `count` generated items
    ///
    /// Indices run 0..count, content is a per-index label, and marking
    /// alternates starting true at index 0.
    pub fn seed(&mut self, count: u32) {
        self.items = (0..count)
            .map(|i| ListItem {
                content: format!("Item {}", i),
                index: i,
                marked: i % 2 == 0,
            })
            .collect();
    }
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}
