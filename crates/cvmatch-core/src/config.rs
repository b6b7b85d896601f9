//! Configuration module
//!
//! Client settings are read from `CVMATCH_*` environment variables (a `.env`
//! file is honoured). Command-line flags may override individual fields after
//! loading.

use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::i18n::Locale;

const ENV_PREFIX: &str = "CVMATCH_";
const DEFAULT_API_URL: &str = "http://localhost:8000";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Settings shared by the API client and the workflow controller.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ClientConfig {
    /// Base address of the analysis service
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Upper bound for a whole submit + lookup sequence. Unset means wait
    /// for as long as the service takes.
    #[serde(default)]
    pub analysis_timeout_secs: Option<u64>,
    #[serde(default)]
    pub locale: Locale,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    REQUEST_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            analysis_timeout_secs: None,
            locale: Locale::default(),
        }
    }
}

/// Values given on the command line. Set fields replace what was loaded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub locale: Option<Locale>,
    pub analysis_timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Read `CVMATCH_*` variables without validating them, so that overrides
    /// can still repair a bad value. Call [`ClientConfig::validate`] afterwards.
    pub fn load_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        envy::prefixed(ENV_PREFIX)
            .from_env::<ClientConfig>()
            .context("Failed to read CVMATCH_* environment variables")
    }

    /// Like [`ClientConfig::load_env`], reading explicit key/value pairs.
    pub fn load_vars<I>(vars: I) -> Result<Self, anyhow::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter::<_, ClientConfig>(vars)
            .context("Failed to parse client configuration")
    }

    /// Build from explicit key/value pairs and validate the result.
    pub fn from_vars<I>(vars: I) -> Result<Self, anyhow::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = Self::load_vars(vars)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(url) = overrides.api_url {
            self.api_url = url;
        }
        if let Some(locale) = overrides.locale {
            self.locale = locale;
        }
        if let Some(secs) = overrides.analysis_timeout_secs {
            self.analysis_timeout_secs = Some(secs);
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let url = self.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "CVMATCH_API_URL must start with http:// or https://, got '{}'",
                self.api_url
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "CVMATCH_REQUEST_TIMEOUT_SECS must be greater than 0"
            ));
        }
        if self.analysis_timeout_secs == Some(0) {
            return Err(anyhow::anyhow!(
                "CVMATCH_ANALYSIS_TIMEOUT_SECS must be greater than 0 when set"
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn analysis_timeout(&self) -> Option<Duration> {
        self.analysis_timeout_secs.map(Duration::from_secs)
    }
}
