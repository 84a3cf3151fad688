use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:3000/fakeApi";
pub const API_URL_ENV: &str = "BLOG_API_URL";

/// Runtime settings, read from a TOML file such as
///
/// ```toml
/// api_url = "http://localhost:3000/fakeApi"
/// notification_delay = "5s"
/// ```
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    /// How long the "New post added!" message stays up.
    #[serde(with = "humantime_serde")]
    pub notification_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_owned(),
            notification_delay: Duration::from_secs(5),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Defaults, overlaid with `path` if given, overlaid with `BLOG_API_URL`
    /// if set.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
                    path: path.to_owned(),
                    source,
                })?;
                Config::from_toml(&text).map_err(|source| Error::ConfigParse {
                    path: path.to_owned(),
                    source,
                })?
            }
            None => Config::default(),
        };
        Ok(config.with_api_url_override(env::var(API_URL_ENV).ok()))
    }

    pub fn with_api_url_override(mut self, api_url: Option<String>) -> Self {
        if let Some(api_url) = api_url.filter(|url| !url.is_empty()) {
            self.api_url = api_url;
        }
        self
    }
}
