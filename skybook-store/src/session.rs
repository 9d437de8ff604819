use std::sync::Arc;
use std::time::Duration;

use skybook_core::decode_claims;
use skybook_shared::{SessionClaims, TokenResponse};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info};

use crate::cookies::CookieStore;
use crate::StoreResult;

pub const TOKEN_COOKIE: &str = "token";
pub const SCOPE_COOKIE: &str = "scope";

/// Who is logged in, as far as the local cookie jar knows.
///
/// Holding a `token` cookie is what "logged in" means. Nothing here looks at
/// token expiry beyond what the jar itself enforces.
pub struct SessionState {
    cookies: Arc<dyn CookieStore>,
    logged_in: watch::Sender<bool>,
}

impl SessionState {
    pub fn new(cookies: Arc<dyn CookieStore>) -> Self {
        let present = cookies.check(TOKEN_COOKIE);
        let (logged_in, _) = watch::channel(present);
        Self { cookies, logged_in }
    }

    /// Re-read the jar and publish the flag. Subscribers only wake on change.
    pub fn check(&self) -> bool {
        let present = self.cookies.check(TOKEN_COOKIE);
        self.logged_in.send_if_modified(|current| {
            if *current == present {
                return false;
            }
            *current = present;
            true
        });
        present
    }

    /// Stream of the logged-in flag, starting with the value as of this call.
    pub fn is_logged_in(&self) -> WatchStream<bool> {
        self.check();
        WatchStream::new(self.logged_in.subscribe())
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.logged_in.subscribe()
    }

    pub fn token(&self) -> Option<String> {
        self.cookies.get(TOKEN_COOKIE)
    }

    pub fn scope(&self) -> Option<String> {
        self.cookies.get(SCOPE_COOKIE)
    }

    pub fn claims(&self) -> Option<SessionClaims> {
        let token = self.token()?;
        match decode_claims(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!("Stored token is unreadable: {}", e);
                None
            }
        }
    }

    /// `sub` claim of the stored token.
    pub fn username(&self) -> Option<String> {
        self.claims()?.sub
    }

    /// Custom `id` claim of the stored token.
    pub fn user_id(&self) -> Option<String> {
        self.claims()?.id
    }

    /// Persist a fresh token and its scope, both expiring when the token does.
    pub fn store_token(&self, token: &TokenResponse) -> StoreResult<()> {
        let ttl = Some(Duration::from_secs(token.expires_in));
        self.cookies.set(TOKEN_COOKIE, &token.access_token, ttl)?;
        self.cookies.set(SCOPE_COOKIE, &token.scope, ttl)?;
        self.check();
        info!("Session stored, expires in {}s", token.expires_in);
        Ok(())
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.cookies.delete(TOKEN_COOKIE)?;
        self.cookies.delete(SCOPE_COOKIE)?;
        self.check();
        info!("Session cleared");
        Ok(())
    }

    /// Re-check the jar every `every` until the returned handle is cancelled or dropped.
    pub fn spawn_polling(self: &Arc<Self>, every: Duration) -> PollHandle {
        let session = Arc::clone(self);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                session.check();
            }
        });
        PollHandle { task }
    }
}

/// Owns the polling task; the task stops when this is cancelled or dropped.
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn cancel(self) {
        // Drop aborts the task.
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
