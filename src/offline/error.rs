use thiserror::Error;

#[derive(Error, Debug)]
pub enum OfflineError {
    /// Any single precache failure aborts the whole install; the
    /// previously active cache version keeps serving.
    #[error("Precache failed for {url}: {reason}")]
    PrecacheFailed { url: String, reason: String },

    #[error("Cache storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Cache namespace file is invalid: {0}")]
    InvalidNamespace(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
