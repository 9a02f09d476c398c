//! Shop configuration, read from the environment (and a `.env` file when present).
//!
//! | Variable | Default |
//! |----------|---------|
//! | `OWNER_ID` | required; seeded as the first admin |
//! | `SUPPORT_USERNAME` | `@rcsupportbot` |
//! | `SHOP_DATA_DIR` | unset: everything stays in memory |
//! | `ACTOR_BUFFER` | `32` |
//! | `NOTIFY_ATTEMPTS` | `3` |
//! | `PAYEE_NAME` | `CodesProDiscounts` |

use crate::model::UserId;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_SUPPORT_USERNAME: &str = "@rcsupportbot";
pub const DEFAULT_ACTOR_BUFFER: usize = 32;
pub const DEFAULT_NOTIFY_ATTEMPTS: u32 = 3;
pub const DEFAULT_PAYEE_NAME: &str = "CodesProDiscounts";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing environment variable '{0}'")]
    Missing(&'static str),
    #[error("Invalid {key} value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct ShopConfig {
    pub owner_id: UserId,
    pub support_username: String,
    /// Directory for the JSON snapshots; `None` keeps the shop in memory.
    pub data_dir: Option<PathBuf>,
    pub actor_buffer: usize,
    pub notify_attempts: u32,
    pub payee_name: String,
}

impl ShopConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        tracing::info!(
            owner = %config.owner_id,
            persistent = config.data_dir.is_some(),
            "Shop configuration loaded"
        );
        Ok(config)
    }

    /// Builds the configuration from any key lookup, e.g. a map in tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let owner_id = get("OWNER_ID").ok_or(ConfigError::Missing("OWNER_ID"))?;
        let owner_id = UserId(parse("OWNER_ID", &owner_id)?);

        let actor_buffer = match get("ACTOR_BUFFER") {
            Some(v) => parse("ACTOR_BUFFER", &v)?,
            None => DEFAULT_ACTOR_BUFFER,
        };
        if actor_buffer == 0 {
            return Err(ConfigError::Invalid {
                key: "ACTOR_BUFFER",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }

        let notify_attempts = match get("NOTIFY_ATTEMPTS") {
            Some(v) => parse("NOTIFY_ATTEMPTS", &v)?,
            None => DEFAULT_NOTIFY_ATTEMPTS,
        };

        Ok(Self {
            owner_id,
            support_username: get("SUPPORT_USERNAME")
                .unwrap_or_else(|| DEFAULT_SUPPORT_USERNAME.to_string()),
            data_dir: get("SHOP_DATA_DIR").map(PathBuf::from),
            actor_buffer,
            notify_attempts,
            payee_name: get("PAYEE_NAME").unwrap_or_else(|| DEFAULT_PAYEE_NAME.to_string()),
        })
    }

    /// Defaults with nothing persisted.
    pub fn in_memory(owner_id: UserId) -> Self {
        Self {
            owner_id,
            support_username: DEFAULT_SUPPORT_USERNAME.to_string(),
            data_dir: None,
            actor_buffer: DEFAULT_ACTOR_BUFFER,
            notify_attempts: DEFAULT_NOTIFY_ATTEMPTS,
            payee_name: DEFAULT_PAYEE_NAME.to_string(),
        }
    }

    /// `https://t.me/<username>` for the support account.
    pub fn support_link(&self) -> String {
        format!(
            "https://t.me/{}",
            self.support_username.trim_start_matches('@')
        )
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
