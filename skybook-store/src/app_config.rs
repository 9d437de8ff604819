use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub oauth: OAuthConfig,
    pub session: SessionConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_flights_path")]
    pub flights_path: String,
    #[serde(default = "default_customers_path")]
    pub customers_path: String,
}

fn default_flights_path() -> String { "flights".to_string() }
fn default_customers_path() -> String { "customers".to_string() }

impl ApiConfig {
    pub fn flights_url(&self) -> String {
        join_url(&self.base_url, &self.flights_path)
    }

    pub fn customers_url(&self) -> String {
        join_url(&self.base_url, &self.customers_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_matches('/'))
}

#[derive(Debug, Deserialize, Clone)]
pub struct OAuthConfig {
    pub token_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub cookie_file: PathBuf,
    pub poll_interval_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"))
    }

    /// Layer `default`, `{RUN_MODE}` and `local` files from `dir`, then `SKYBOOK_*` env vars.
    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let file = |name: &str| config::File::with_name(&dir.join(name).to_string_lossy()).required(false);

        let s = config::Config::builder()
            .set_default("api.base_url", "http://localhost:8080/v1/api")?
            .set_default("oauth.token_url", "http://localhost:8081/oauth2/token")?
            .set_default("session.cookie_file", ".skybook/cookies.json")?
            // Seconds between re-reads of the token cookie.
            .set_default("session.poll_interval_seconds", 100_i64)?
            .set_default("http.timeout_seconds", 30_i64)?
            .add_source(file("default"))
            .add_source(file(&run_mode))
            .add_source(file("local"))
            // Eg.. `SKYBOOK_API__BASE_URL=http://api:8080` overrides `api.base_url`
            .add_source(config::Environment::with_prefix("SKYBOOK").prefix_separator("_").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
