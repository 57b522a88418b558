use thiserror::Error;

/// Errors raised while fetching or reporting pages.
///
/// Backend failures are never retried or classified: they are carried up to
/// the caller as-is and abort the sequence they occurred in.
#[derive(Debug, Error)]
pub enum PaginationError {
    #[error("Error executing query: {0}")]
    Backend(String),

    #[error("Invalid page size limit {0}, expected 1..={}", i32::MAX)]
    InvalidLimit(u32),

    #[error("Failed to write page summary: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to serialize page summary: {0}")]
    Serialize(#[from] serde_json::Error),
}
