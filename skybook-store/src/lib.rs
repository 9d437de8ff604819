pub mod app_config;
pub mod cookies;
pub mod session;

pub use cookies::{CookieStore, FileCookieStore, MemoryCookieStore};
pub use session::{PollHandle, SessionState, SCOPE_COOKIE, TOKEN_COOKIE};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Cookie file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cookie file is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
