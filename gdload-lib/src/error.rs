use std::path::PathBuf;
use thiserror::Error;

/// Failures that can occur while fetching a bundle to local storage.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Failed to initialize HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Invalid bundle URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to download '{url}': {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Download of '{url}' failed with HTTP status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to write bundle to {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// True for every failure that happened on the network side, including
    /// non-success responses.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Status { .. })
    }
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error("Failed to launch engine {}: {source}", .executable.display())]
    Launch {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("The load queue has shut down")]
    QueueClosed,
}
