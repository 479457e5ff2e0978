// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use soldium_core::{
    Clock, ENV_SOLDIUM_LOG_JSON, ENV_SOLDIUM_PRESALE_PRICE_USD, ENV_SOLDIUM_PRESALE_RATE,
    ENV_SOLDIUM_PRESALE_WALLET, ENV_SOLDIUM_STORE,
};
use soldium_model::PresaleTerms;
use soldium_store::{DocumentStore, InMemoryStore, SqliteStore, StoreError};

pub const ENV_SOLDIUM_BIND: &str = "SOLDIUM_BIND";
pub const ENV_SOLDIUM_SESSION_TTL_MS: &str = "SOLDIUM_SESSION_TTL_MS";
pub const ENV_SOLDIUM_PASSWORD_PEPPER: &str = "SOLDIUM_PASSWORD_PEPPER";
pub const ENV_SOLDIUM_COUNTDOWN_TICK_MS: &str = "SOLDIUM_COUNTDOWN_TICK_MS";
pub const ENV_SOLDIUM_MAX_BODY_BYTES: &str = "SOLDIUM_MAX_BODY_BYTES";
pub const ENV_SOLDIUM_SHUTDOWN_DRAIN_MS: &str = "SOLDIUM_SHUTDOWN_DRAIN_MS";

const DEV_PASSWORD_PEPPER: &str = "soldium-dev-pepper";

/// Longest session lifetime accepted from the environment.
pub const MAX_SESSION_TTL: Duration = Duration::from_secs(366 * 24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackendSpec {
    Memory,
    Sqlite(PathBuf),
}

impl FromStr for StoreBackendSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "memory" {
            return Ok(Self::Memory);
        }
        match s.strip_prefix("sqlite:") {
            Some(path) if !path.trim().is_empty() => Ok(Self::Sqlite(PathBuf::from(path.trim()))),
            _ => Err(format!(
                "unsupported store backend `{s}`; use memory or sqlite:/path/to/file.db"
            )),
        }
    }
}

impl StoreBackendSpec {
    pub fn open(&self, clock: Arc<dyn Clock>) -> Result<Arc<dyn DocumentStore>, StoreError> {
        let store: Arc<dyn DocumentStore> = match self {
            Self::Memory => Arc::new(InMemoryStore::with_clock(clock)),
            Self::Sqlite(path) => Arc::new(SqliteStore::open_with_clock(path, clock)?),
        };
        Ok(store)
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub store: StoreBackendSpec,
    pub terms: PresaleTerms,
    pub session_ttl: Duration,
    pub password_pepper: String,
    pub countdown_tick: Duration,
    pub max_body_bytes: usize,
    pub log_json: bool,
    pub shutdown_drain: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            store: StoreBackendSpec::Memory,
            terms: PresaleTerms::default(),
            session_ttl: Duration::from_millis(86_400_000),
            password_pepper: DEV_PASSWORD_PEPPER.to_string(),
            countdown_tick: Duration::from_millis(1_000),
            max_body_bytes: 16 * 1024,
            log_json: true,
            shutdown_drain: Duration::from_millis(2_000),
        }
    }
}

type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn env_bool(lookup: Lookup<'_>, name: &str, default: bool) -> bool {
    lookup(name)
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(lookup: Lookup<'_>, name: &str, default: u64) -> u64 {
    lookup(name)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(lookup: Lookup<'_>, name: &str, default: usize) -> usize {
    lookup(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_f64(lookup: Lookup<'_>, name: &str, default: f64) -> f64 {
    lookup(name)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn env_duration_ms(lookup: Lookup<'_>, name: &str, default: Duration) -> Duration {
    Duration::from_millis(env_u64(lookup, name, default.as_millis() as u64))
}

fn env_string(lookup: Lookup<'_>, name: &str, default: &str) -> String {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(&|name| env::var(name).ok())
    }

    /// Builds the config from any variable source. Malformed numbers fall back
    /// to defaults; a malformed store spec or invalid terms are errors.
    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, String> {
        let defaults = Self::default();
        let store = match lookup(ENV_SOLDIUM_STORE) {
            Some(raw) => raw.parse::<StoreBackendSpec>()?,
            None => defaults.store,
        };
        let cfg = Self {
            bind_addr: env_string(lookup, ENV_SOLDIUM_BIND, &defaults.bind_addr),
            store,
            terms: PresaleTerms {
                rate: env_f64(lookup, ENV_SOLDIUM_PRESALE_RATE, defaults.terms.rate),
                price_usd: env_f64(lookup, ENV_SOLDIUM_PRESALE_PRICE_USD, defaults.terms.price_usd),
                presale_wallet: env_string(
                    lookup,
                    ENV_SOLDIUM_PRESALE_WALLET,
                    &defaults.terms.presale_wallet,
                ),
            },
            session_ttl: env_duration_ms(lookup, ENV_SOLDIUM_SESSION_TTL_MS, defaults.session_ttl),
            password_pepper: env_string(
                lookup,
                ENV_SOLDIUM_PASSWORD_PEPPER,
                &defaults.password_pepper,
            ),
            countdown_tick: env_duration_ms(
                lookup,
                ENV_SOLDIUM_COUNTDOWN_TICK_MS,
                defaults.countdown_tick,
            ),
            max_body_bytes: env_usize(lookup, ENV_SOLDIUM_MAX_BODY_BYTES, defaults.max_body_bytes),
            log_json: env_bool(lookup, ENV_SOLDIUM_LOG_JSON, defaults.log_json),
            shutdown_drain: env_duration_ms(
                lookup,
                ENV_SOLDIUM_SHUTDOWN_DRAIN_MS,
                defaults.shutdown_drain,
            ),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.terms.validate()?;
        if self.countdown_tick.is_zero() {
            return Err(format!("{ENV_SOLDIUM_COUNTDOWN_TICK_MS} must be > 0"));
        }
        if self.session_ttl.is_zero() || self.session_ttl > MAX_SESSION_TTL {
            return Err(format!(
                "{ENV_SOLDIUM_SESSION_TTL_MS} must be within 1..={} ms",
                MAX_SESSION_TTL.as_millis()
            ));
        }
        if self.max_body_bytes == 0 {
            return Err(format!("{ENV_SOLDIUM_MAX_BODY_BYTES} must be > 0"));
        }
        Ok(())
    }

    #[must_use]
    pub fn uses_dev_pepper(&self) -> bool {
        self.password_pepper == DEV_PASSWORD_PEPPER
    }
}
