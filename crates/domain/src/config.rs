//! Client configuration structures

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS};
use crate::errors::{Result, WxWorkError};

/// Long-lived credentials of one WxWork application.
///
/// Immutable once the client is built.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Corporation id, see https://work.weixin.qq.com/api/doc/90000/90135/91039
    pub corp_id: String,
    /// Application secret, see https://work.weixin.qq.com/api/doc/90000/90135/90665#secret
    pub corp_secret: String,
    pub agent_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("corp_id", &self.corp_id)
            .field("corp_secret", &"<redacted>")
            .field("agent_id", &self.agent_id)
            .finish()
    }
}

/// Full client configuration as loaded from the environment or a file
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WxWorkConfig {
    pub corp_id: String,
    pub corp_secret: String,
    pub agent_id: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl WxWorkConfig {
    pub fn new(
        corp_id: impl Into<String>,
        corp_secret: impl Into<String>,
        agent_id: impl Into<String>,
    ) -> Self {
        Self {
            corp_id: corp_id.into(),
            corp_secret: corp_secret.into(),
            agent_id: agent_id.into(),
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Point the client at a different API root (e.g. a mock server).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Override the per-request timeout. Sub-second precision is rounded up,
    /// saturating at `u64::MAX` seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let secs = timeout.as_secs().saturating_add(u64::from(timeout.subsec_nanos() > 0));
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            corp_id: self.corp_id.clone(),
            corp_secret: self.corp_secret.clone(),
            agent_id: self.agent_id.clone(),
        }
    }

    /// Absolute URL for an endpoint path such as `/message/send`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }

    /// Check that every required field is usable.
    ///
    /// # Errors
    /// Returns `WxWorkError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("corp_id", &self.corp_id),
            ("corp_secret", &self.corp_secret),
            ("agent_id", &self.agent_id),
            ("api_base", &self.api_base),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(WxWorkError::Config(format!("{name} must not be empty")));
        }
        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(WxWorkError::Config(format!(
                "api_base must be an http(s) URL, got {}",
                self.api_base
            )));
        }
        if self.timeout_secs == 0 {
            return Err(WxWorkError::Config("timeout_secs must be greater than zero".into()));
        }
        Ok(())
    }
}

impl fmt::Debug for WxWorkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WxWorkConfig")
            .field("corp_id", &self.corp_id)
            .field("corp_secret", &"<redacted>")
            .field("agent_id", &self.agent_id)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
