use std::path::PathBuf;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::batch::BatchSize;

pub const DEFAULT_FEED_URL: &str = "https://celestrak.org/NORAD/elements/gp.php?GROUP=active&FORMAT=tle";
pub const DEFAULT_OMM_FEED_URL: &str =
    "https://celestrak.org/NORAD/elements/gp.php?GROUP=active&FORMAT=json";

/// Runtime settings. Every key can be overridden with a `TLE_` variable,
/// e.g. `TLE_DB_PATH=/var/lib/tle.sqlite`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub db_path: PathBuf,
    pub feed_url: String,
    pub omm_feed_url: String,
    pub bind: String,
    pub batch_size: BatchSize,
    /// Unset means the HTTP client default.
    pub fetch_timeout_secs: Option<u64>,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("db_path", "data/tle.sqlite")?
            .set_default("feed_url", DEFAULT_FEED_URL)?
            .set_default("omm_feed_url", DEFAULT_OMM_FEED_URL)?
            .set_default("bind", "127.0.0.1:3000")?
            .set_default("batch_size", BatchSize::DEFAULT.get() as i64)?
            .add_source(Environment::with_prefix("TLE").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            db_path: PathBuf::from("data/tle.sqlite"),
            feed_url: DEFAULT_FEED_URL.to_string(),
            omm_feed_url: DEFAULT_OMM_FEED_URL.to_string(),
            bind: "127.0.0.1:3000".to_string(),
            batch_size: BatchSize::DEFAULT,
            fetch_timeout_secs: None,
        }
    }
}
