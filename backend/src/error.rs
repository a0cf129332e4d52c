#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("extraction task: {0}")]
    Task(#[from] tokio::task::JoinError),
}
