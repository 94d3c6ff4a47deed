use std::path::PathBuf;

/// Failures while loading, downloading or persisting the holiday dataset.
///
/// None of these reach a caller of the classifier: the registry logs them
/// and keeps whatever data it already had.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("cannot access holiday cache {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },

    #[error("malformed holiday dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid holiday dataset url '{0}'")]
    InvalidUrl(String),

    #[error("cannot set up https client: {0}")]
    Tls(#[source] std::io::Error),

    #[error("no holiday dataset source configured")]
    NoSource,

    #[error("holiday dataset download failed: {0}")]
    Transport(String),

    #[error("holiday dataset server answered with status {0}")]
    Status(u16),

    #[error("holiday dataset download timed out after {0} seconds")]
    Timeout(u64),

    #[error("malformed entry for {date}: '{raw}'")]
    MalformedEntry {
        date: String,
        raw: String
    },
}
