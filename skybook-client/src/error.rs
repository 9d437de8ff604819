use reqwest::StatusCode;
use skybook_store::StoreError;

/// Everything a backend call can fail with. Views collapse all of it into
/// "something went wrong"; the variants exist for logs and tests.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Not logged in")]
    Unauthorized,
    #[error("HTTP {status}: {message}")]
    Http { status: StatusCode, message: String },
    #[error("network: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid endpoint: {0}")]
    InvalidUrl(String),
    #[error("session store: {0}")]
    Store(#[from] StoreError),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
