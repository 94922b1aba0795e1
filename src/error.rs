use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("DNA Center API error: {0}")]
    DnacApi(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The run log destination could not be opened. Always fatal.
    #[error("Could not open file {path} for writing: {source}")]
    LogOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A run log line could not be written. Always fatal.
    #[error("Could not write message to file {path}: {source}")]
    LogWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CollectorError {
    /// Run log failures end the process with a distinct exit status.
    pub fn is_log_failure(&self) -> bool {
        matches!(
            self,
            CollectorError::LogOpen { .. } | CollectorError::LogWrite { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CollectorError>;
