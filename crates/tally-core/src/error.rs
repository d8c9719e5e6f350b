//! Error types for tally

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Item index collision: {0}. Ensure all items have a unique index.")]
    IndexConflict(u32),

    #[error("Item with index {0} not found")]
    NotFound(u32),

    #[error("Invalid parameters: no item selector supplied")]
    MissingSelector,

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
