//! tally-core: Core library for the tally list item service
//!
//! Provides the item model, the in-memory store, and configuration.
//! No persistence - the collection lives for the process lifetime.

pub mod config;
pub mod error;
pub mod item;
pub mod store;

pub use config::Config;
pub use error::Error;
pub use item::ListItem;
pub use store::{DeleteQuery, ItemQuery, ItemStore};

/// Result type for tally operations
pub type Result<T> = std::result::Result<T, Error>;
