//! Upstream (FURS) endpoint configuration.
//!
//! The original deployment hardcoded the endpoint host, the VAT rate and
//! the issue timestamp; they are environment-overridable here with
//! defaults equal to the historical values.

use anyhow::Result;
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://981.ablak.arnes.si:2025";

/// Issue/message timestamp sent on every registration. The upstream
/// contract pins this literal; it is not the current time.
pub const DEFAULT_ISSUE_TIMESTAMP: &str = "2023-03-20T15:03:05Z";

pub const DEFAULT_VAT_RATE: f64 = 22.00;

#[derive(Clone, Debug)]
pub struct FursConfig {
    pub base_url: String,
    pub issue_timestamp: String,
    pub vat_rate: f64,
    /// Outbound request timeout. `None` leaves requests unbounded, which
    /// is the historical behavior; set `FURS_TIMEOUT_SECS` to bound them.
    pub timeout: Option<Duration>,
}

impl Default for FursConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            issue_timestamp: DEFAULT_ISSUE_TIMESTAMP.to_string(),
            vat_rate: DEFAULT_VAT_RATE,
            timeout: None,
        }
    }
}

impl FursConfig {
    pub fn from_env() -> Result<Self> {
        let base_url =
            env::var("FURS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let issue_timestamp = env::var("FURS_ISSUE_TIMESTAMP")
            .unwrap_or_else(|_| DEFAULT_ISSUE_TIMESTAMP.to_string());
        let vat_rate = match env::var("FURS_VAT_RATE") {
            Ok(rate) => rate.parse()?,
            Err(_) => DEFAULT_VAT_RATE,
        };
        let timeout = match env::var("FURS_TIMEOUT_SECS") {
            Ok(secs) => Some(Duration::from_secs(secs.parse()?)),
            Err(_) => None,
        };

        Ok(Self {
            base_url,
            issue_timestamp,
            vat_rate,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_historical_values() {
        let config = FursConfig::default();
        assert_eq!(config.base_url, "http://981.ablak.arnes.si:2025");
        assert_eq!(config.issue_timestamp, "2023-03-20T15:03:05Z");
        assert_eq!(config.vat_rate, 22.00);
        assert!(config.timeout.is_none());
    }
}
