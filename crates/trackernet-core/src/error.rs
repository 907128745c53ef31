use thiserror::Error;

pub use abm_core::ModelError;

/// Why a train could not be placed on the network from a feed row.
///
/// These are data-quality conditions, not faults: the caller logs them and
/// hides the affected train until the next snapshot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("station not found: {0}")]
    StationNotFound(String),
    #[error("no link into {station} on {line} matching direction {direction}")]
    NoMatchingLink {
        line: String,
        station: String,
        direction: i64,
    },
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed")]
    Http(#[from] reqwest::Error),
    #[error("feed returned status {0}")]
    Status(reqwest::StatusCode),
}
