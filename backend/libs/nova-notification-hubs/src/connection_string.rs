use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::errors::{NotificationHubError, Result};
use crate::token::TokenProvider;

const ENDPOINT_KEY: &str = "endpoint";
const KEY_NAME_KEY: &str = "sharedaccesskeyname";
const KEY_VALUE_KEY: &str = "sharedaccesskey";

/// Parsed `Endpoint=...;SharedAccessKeyName=...;SharedAccessKey=...` string
///
/// Keys match case-insensitively, unknown keys are ignored and the last
/// occurrence of a repeated key wins. All three keys must carry a non-empty
/// value.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionString {
    pub endpoint: String,
    pub key_name: String,
    pub key_value: String,
}

impl ConnectionString {
    pub fn parse(raw: &str) -> Result<Self> {
        let mut endpoint = None;
        let mut key_name = None;
        let mut key_value = None;

        for (index, entry) in raw.split(';').enumerate() {
            if entry.is_empty() {
                continue;
            }

            // Only the first '=' separates; base64 values end in padding.
            let (key, value) = entry.split_once('=').ok_or_else(|| {
                NotificationHubError::Config(format!(
                    "connection string entry {} has no '=' separator",
                    index
                ))
            })?;

            let key = key.trim();
            if key.eq_ignore_ascii_case(ENDPOINT_KEY) {
                endpoint = Some(value.to_string());
            } else if key.eq_ignore_ascii_case(KEY_NAME_KEY) {
                key_name = Some(value.to_string());
            } else if key.eq_ignore_ascii_case(KEY_VALUE_KEY) {
                key_value = Some(value.to_string());
            }
        }

        let endpoint = required(endpoint, "Endpoint")?;
        let key_name = required(key_name, "SharedAccessKeyName")?;
        let key_value = required(key_value, "SharedAccessKey")?;

        Url::parse(&endpoint).map_err(|e| {
            NotificationHubError::Config(format!("invalid endpoint '{}': {}", endpoint, e))
        })?;

        Ok(Self {
            endpoint,
            key_name,
            key_value,
        })
    }

    /// Split into the hub endpoint and a token provider for its key pair
    pub fn into_parts(self) -> (String, TokenProvider) {
        (
            self.endpoint,
            TokenProvider::new(self.key_name, self.key_value),
        )
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(NotificationHubError::Config(format!(
            "connection string is missing {}",
            name
        ))),
    }
}

impl FromStr for ConnectionString {
    type Err = NotificationHubError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionString")
            .field("endpoint", &self.endpoint)
            .field("key_name", &self.key_name)
            .field("key_value", &"<redacted>")
            .finish()
    }
}
