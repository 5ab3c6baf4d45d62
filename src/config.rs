//! Gateway configuration.

use crate::domain::request::{MerchantCredentials, SystemCredentials};
use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// How the integrating system reaches the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(flatten)]
    pub credentials: SystemCredentials,

    /// Web service endpoint, e.g. "https://gateway.example/ws/ProcessMsg"
    pub endpoint_url: String,

    /// Deliberately broken endpoint, only used to exercise transport failures.
    #[serde(default)]
    pub invalid_url: Option<String>,

    /// Seconds a round trip may block before it fails.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl SystemConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub system: SystemConfig,
    pub merchant: MerchantCredentials,
}

impl GatewayConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Rejects configurations the gateway would refuse anyway.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("system.system_id", &self.system.credentials.system_id),
            ("system.system_guid", &self.system.credentials.system_guid),
            ("system.passcode", &self.system.credentials.passcode),
            ("system.endpoint_url", &self.system.endpoint_url),
            ("merchant.account_id", &self.merchant.account_id),
            ("merchant.account_passcode", &self.merchant.account_passcode),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(PaymentError::Config(format!("{name} must not be empty")));
        }
        if self.system.timeout_secs == 0 {
            return Err(PaymentError::Config(
                "system.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
