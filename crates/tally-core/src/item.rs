//! List item data model
//!
//! One entity, three fields. The index doubles as identity and sort key.

use serde::{Deserialize, Serialize};

/// Placeholder content for items submitted without a payload
pub const DEFAULT_CONTENT: &str = "Insert item content here.";

fn default_content() -> String {
    DEFAULT_CONTENT.to_string()
}

/// A single list item
///
/// `index` is unsigned, so negative indices fail at deserialization
/// and never reach the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Text payload
    #[serde(default = "default_content")]
    pub content: String,

    /// Unique index across the collection
    pub index: u32,

    /// Checked-off flag
    #[serde(default)]
    pub marked: bool,
}

impl ListItem {
    /// Create an unmarked item with placeholder content
    pub fn new(index: u32) -> Self {
        Self {
            content: default_content(),
            index,
            marked: false,
        }
    }
}

impl std::fmt::Display for ListItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mark = if self.marked { "x" } else { " " };
        write!(f, "[{}] {} {}", mark, self.index, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let item: ListItem = serde_json::from_str(r#"{"index": 3}"#).unwrap();
        assert_eq!(item.content, DEFAULT_CONTENT);
        assert_eq!(item.index, 3);
        assert!(!item.marked);
    }

    #[test]
    fn test_negative_index_is_rejected() {
        let result = serde_json::from_str::<ListItem>(r#"{"index": -1, "content": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        let mut item = ListItem::new(4);
        item.content = "buy milk".to_string();
        assert_eq!(item.to_string(), "[ ] 4 buy milk");
        item.marked = true;
        assert_eq!(item.to_string(), "[x] 4 buy milk");
    }
}
