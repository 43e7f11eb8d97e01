use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{NotificationHubError, Result};

/// Prefix of every environment variable read by [`HubConfig::from_env`]
pub const ENV_PREFIX: &str = "NOTIFICATION_HUB_";

/// Whether `NotificationRequest::message` travels as the request body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadMode {
    /// Send the message (when present) as the HTTP body
    #[default]
    Attach,
    /// Send headers only and never a body
    HeadersOnly,
}

/// Notification hub configuration
///
/// Environment variables:
/// - `NOTIFICATION_HUB_CONNECTION_STRING` (required)
/// - `NOTIFICATION_HUB_NAME` (required)
/// - `NOTIFICATION_HUB_PAYLOAD_MODE` (`attach` | `headers_only`, default `attach`)
#[derive(Clone, Serialize, Deserialize)]
pub struct HubConfig {
    pub connection_string: String,
    #[serde(rename = "name")]
    pub hub_name: String,
    #[serde(default)]
    pub payload_mode: PayloadMode,
}

impl HubConfig {
    /// Create new hub configuration
    pub fn new(connection_string: String, hub_name: String) -> Self {
        Self {
            connection_string,
            hub_name,
            payload_mode: PayloadMode::default(),
        }
    }

    pub fn with_payload_mode(mut self, payload_mode: PayloadMode) -> Self {
        self.payload_mode = payload_mode;
        self
    }

    /// Load from `NOTIFICATION_HUB_*` environment variables
    pub fn from_env() -> Result<Self> {
        envy::prefixed(ENV_PREFIX)
            .from_env::<HubConfig>()
            .map_err(|e| NotificationHubError::Config(format!("environment: {}", e)))
    }

    /// Load from an explicit set of `NOTIFICATION_HUB_*` pairs
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter::<_, HubConfig>(pairs)
            .map_err(|e| NotificationHubError::Config(format!("environment: {}", e)))
    }
}

impl fmt::Debug for HubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubConfig")
            .field("connection_string", &"<redacted>")
            .field("hub_name", &self.hub_name)
            .field("payload_mode", &self.payload_mode)
            .finish()
    }
}
