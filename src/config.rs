//! Process configuration from environment variables.

use crate::auth::Credentials;
use actix_web::cookie::Key;
use std::path::PathBuf;
use thiserror::Error;

/// Shortest accepted `SESSION_KEY`, in bytes.
pub const MIN_SESSION_KEY_LEN: usize = 64;
/// `DATA_FILE` value that disables persistence.
pub const IN_MEMORY: &str = ":memory:";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_FILE: &str = "data/players.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),
    #[error("SESSION_KEY must be at least 64 bytes, got {0}")]
    ShortSessionKey(usize),
    #[error("{0} must be true or false, got {1:?}")]
    InvalidFlag(&'static str, String),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub credentials: Credentials,
    /// Secret for the session cookie. `None` means a random key per process.
    pub session_key: Option<Vec<u8>>,
    pub secure_cookies: bool,
    /// `None` keeps players in memory only.
    pub data_file: Option<PathBuf>,
    /// CSV roster imported at startup into an empty store.
    pub seed_csv: Option<PathBuf>,
}

impl Config {
    /// Read HOST, PORT, ADMIN_USERNAME, ADMIN_PASSWORD, SESSION_KEY, COOKIE_SECURE,
    /// DATA_FILE and SEED_CSV.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(p) => p.trim().parse().map_err(|_| ConfigError::InvalidPort(p))?,
            None => DEFAULT_PORT,
        };

        let defaults = Credentials::default();
        let credentials = Credentials {
            username: var("ADMIN_USERNAME").unwrap_or(defaults.username),
            password: var("ADMIN_PASSWORD").unwrap_or(defaults.password),
        };

        let session_key = match var("SESSION_KEY") {
            Some(k) if k.len() < MIN_SESSION_KEY_LEN => {
                return Err(ConfigError::ShortSessionKey(k.len()))
            }
            Some(k) => Some(k.into_bytes()),
            None => None,
        };

        let secure_cookies = match var("COOKIE_SECURE") {
            Some(v) => parse_flag("COOKIE_SECURE", &v)?,
            None => false,
        };

        let data_file = match var("DATA_FILE") {
            Some(f) if f == IN_MEMORY => None,
            Some(f) => Some(PathBuf::from(f)),
            None => Some(PathBuf::from(DEFAULT_DATA_FILE)),
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            credentials,
            session_key,
            secure_cookies,
            data_file,
            seed_csv: var("SEED_CSV").map(PathBuf::from),
        })
    }

    /// Key for signing and encrypting session cookies.
    pub fn cookie_key(&self) -> Key {
        match &self.session_key {
            Some(bytes) => Key::from(bytes),
            None => Key::generate(),
        }
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag(name, value.to_string())),
    }
}
