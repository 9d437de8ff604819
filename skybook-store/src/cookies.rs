use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{StoreError, StoreResult};

/// A named value with an optional expiry, the way a browser cookie jar holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub value: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Cookie {
    pub fn new(value: impl Into<String>, expires_in: Option<Duration>) -> Self {
        let expires_at = expires_in
            .and_then(|ttl| chrono::Duration::from_std(ttl).ok())
            .and_then(|ttl| Utc::now().checked_add_signed(ttl));
        Self { value: value.into(), expires_at }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Client-side credential storage. Expired entries read as absent.
pub trait CookieStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;

    fn set(&self, name: &str, value: &str, expires_in: Option<Duration>) -> StoreResult<()>;

    fn delete(&self, name: &str) -> StoreResult<()>;

    fn check(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

fn live_value(jar: &HashMap<String, Cookie>, name: &str) -> Option<String> {
    jar.get(name)
        .filter(|cookie| !cookie.is_expired(Utc::now()))
        .map(|cookie| cookie.value.clone())
}

/// Process-local jar, gone when the process exits.
#[derive(Default)]
pub struct MemoryCookieStore {
    jar: RwLock<HashMap<String, Cookie>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStore for MemoryCookieStore {
    fn get(&self, name: &str) -> Option<String> {
        let jar = self.jar.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        live_value(&jar, name)
    }

    fn set(&self, name: &str, value: &str, expires_in: Option<Duration>) -> StoreResult<()> {
        let mut jar = self.jar.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        jar.insert(name.to_string(), Cookie::new(value, expires_in));
        Ok(())
    }

    fn delete(&self, name: &str) -> StoreResult<()> {
        let mut jar = self.jar.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        jar.remove(name);
        Ok(())
    }
}

/// Jar persisted as a JSON object in a single file.
///
/// Every read goes back to disk so that a logout from another process is
/// seen on the next check. Writes replace the file through a rename.
pub struct FileCookieStore {
    path: PathBuf,
    write_lock: RwLock<()>,
}

impl FileCookieStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<HashMap<String, Cookie>> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, jar: &HashMap<String, Cookie>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(jar)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Cookie jar written to {}", self.path.display());
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut HashMap<String, Cookie>)) -> StoreResult<()> {
        let _guard = self.write_lock.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut jar = match self.load() {
            Ok(jar) => jar,
            Err(StoreError::Serialization(e)) => {
                warn!("Discarding malformed cookie file {}: {}", self.path.display(), e);
                HashMap::new()
            }
            Err(e) => return Err(e),
        };
        let now = Utc::now();
        jar.retain(|_, cookie| !cookie.is_expired(now));
        apply(&mut jar);
        self.save(&jar)
    }
}

impl CookieStore for FileCookieStore {
    fn get(&self, name: &str) -> Option<String> {
        let _guard = self.write_lock.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        match self.load() {
            Ok(jar) => live_value(&jar, name),
            Err(e) => {
                warn!("Unreadable cookie file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn set(&self, name: &str, value: &str, expires_in: Option<Duration>) -> StoreResult<()> {
        self.update(|jar| {
            jar.insert(name.to_string(), Cookie::new(value, expires_in));
        })
    }

    fn delete(&self, name: &str) -> StoreResult<()> {
        self.update(|jar| {
            jar.remove(name);
        })
    }
}
