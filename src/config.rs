//! Configuration Module
//!
//! Explicit store configuration for the core, plus the process-level
//! configuration the binary loads from environment variables.

use std::env;
use std::str::FromStr;

/// Collection and attribute layout for one CacheStore.
///
/// Passed explicitly to `CacheStore::new`; the core never reads the
/// environment itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Collection holding the cache documents
    pub collection: String,
    /// Attribute holding the prefixed key
    pub key_attribute: String,
    /// Attribute holding the encoded value
    pub value_attribute: String,
    /// Attribute holding the absolute expiration timestamp
    pub expiration_attribute: String,
    /// Prefix prepended to every caller key
    pub prefix: String,
}

impl StoreConfig {
    /// Creates a config for the given collection with default attribute names.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            ..Self::default()
        }
    }

    /// Replaces the key prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            collection: "cache".to_string(),
            key_attribute: "key".to_string(),
            value_attribute: "value".to_string(),
            expiration_attribute: "expired_at".to_string(),
            prefix: String::new(),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Layout of the cache collection
    pub cache: StoreConfig,
    /// Collection holding session documents
    pub session_collection: String,
    /// Session lifetime in minutes
    pub session_lifetime: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Eager sweep interval in seconds, 0 disables the sweep
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_COLLECTION` - Cache collection name (default: cache)
    /// - `CACHE_KEY_ATTR` - Key attribute (default: key)
    /// - `CACHE_VALUE_ATTR` - Value attribute (default: value)
    /// - `CACHE_EXPIRATION_ATTR` - Expiration attribute (default: expired_at)
    /// - `CACHE_PREFIX` - Global key prefix (default: empty)
    /// - `SESSION_COLLECTION` - Session collection name (default: sessions)
    /// - `SESSION_LIFETIME` - Session lifetime in minutes (default: 120)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Eager sweep frequency in seconds (default: 0, disabled)
    pub fn from_env() -> Self {
        let defaults = StoreConfig::default();
        Self {
            cache: StoreConfig {
                collection: env_or("CACHE_COLLECTION", defaults.collection),
                key_attribute: env_or("CACHE_KEY_ATTR", defaults.key_attribute),
                value_attribute: env_or("CACHE_VALUE_ATTR", defaults.value_attribute),
                expiration_attribute: env_or(
                    "CACHE_EXPIRATION_ATTR",
                    defaults.expiration_attribute,
                ),
                prefix: env_or("CACHE_PREFIX", defaults.prefix),
            },
            session_collection: env_or("SESSION_COLLECTION", "sessions".to_string()),
            session_lifetime: env_or("SESSION_LIFETIME", 120),
            server_port: env_or("SERVER_PORT", 3000),
            sweep_interval: env_or("SWEEP_INTERVAL", 0),
        }
    }

    /// Store layout for sessions: the cache attributes on the session
    /// collection, without a key prefix.
    pub fn session_store(&self) -> StoreConfig {
        StoreConfig {
            collection: self.session_collection.clone(),
            prefix: String::new(),
            ..self.cache.clone()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: StoreConfig::default(),
            session_collection: "sessions".to_string(),
            session_lifetime: 120,
            server_port: 3000,
            sweep_interval: 0,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
