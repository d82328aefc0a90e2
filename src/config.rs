//! Server settings read from environment variables.

use crate::logic::XpWeights;
use crate::models::{SelectionError, SlotConfig};

/// Settings for the web binary. Unparseable values fall back to the defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Slots for games created without explicit counts.
    pub default_slots: SlotConfig,
    pub xp_weights: XpWeights,
}

impl ServerConfig {
    /// Read HOST, PORT, DEFAULT_MERIT_SLOTS and DEFAULT_RANDOM_SLOTS from the environment.
    pub fn from_env() -> Result<Self, SelectionError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Negative slot defaults are rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SelectionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 8080);
        let default_slots = SlotConfig::new(
            parse_or(&lookup, "DEFAULT_MERIT_SLOTS", 16),
            parse_or(&lookup, "DEFAULT_RANDOM_SLOTS", 2),
        )?;
        Ok(Self {
            host,
            port,
            default_slots,
            xp_weights: XpWeights::default(),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {}={:?}", key, raw);
            default
        }),
        None => default,
    }
}
