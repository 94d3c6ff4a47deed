use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("cannot read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },

    #[error("invalid configuration: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("unknown default timezone '{0}'")]
    UnknownTimezone(String),

    #[error("unknown log level '{0}', expected off, error, warn, info, debug or trace")]
    UnknownLogLevel(String),

    #[error("fetch_timeout_secs must be positive")]
    ZeroTimeout,
}
