// Shared Access Signature generation - HMAC-SHA256 over audience + expiry

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::errors::{NotificationHubError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Lifetime of every generated token
pub const TOKEN_TTL_SECONDS: i64 = 60 * 60;

/// Signs SAS tokens for a single shared access key
#[derive(Clone)]
pub struct TokenProvider {
    key_name: String,
    key_value: String,
}

impl TokenProvider {
    /// Create a provider from a key name and its base64 key value
    pub fn new(key_name: impl Into<String>, key_value: impl Into<String>) -> Self {
        Self {
            key_name: key_name.into(),
            key_value: key_value.into(),
        }
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    /// Generate a token scoped to `audience`, valid for one hour from now
    pub fn generate_sas_token(&self, audience: &str) -> Result<String> {
        self.generate_sas_token_at(audience, Utc::now())
    }

    /// Generate a token as if the current time were `now`
    ///
    /// Format:
    /// `SharedAccessSignature sr={audience}&sig={signature}&se={expiry}&skn={key_name}`
    ///
    /// The audience is percent-encoded and then lowercased; the signature is
    /// computed over exactly that form, so the service can recompute it from
    /// the `sr` field.
    pub fn generate_sas_token_at(&self, audience: &str, now: DateTime<Utc>) -> Result<String> {
        let expires_on = expiry_from(now);
        let encoded_audience = encode_component(audience).to_lowercase();

        let string_to_sign = format!("{}\n{}", encoded_audience, expires_on);
        let signature = encode_component(&self.sign(&string_to_sign)?);

        Ok(format!(
            "SharedAccessSignature sr={}&sig={}&se={}&skn={}",
            encoded_audience, signature, expires_on, self.key_name
        ))
    }

    /// Decode the base64 key value into raw HMAC key bytes
    pub(crate) fn signing_key(&self) -> Result<Vec<u8>> {
        STANDARD.decode(&self.key_value).map_err(|e| {
            NotificationHubError::Config(format!(
                "SharedAccessKey for '{}' is not valid base64: {}",
                self.key_name, e
            ))
        })
    }

    fn sign(&self, payload: &str) -> Result<String> {
        let key = self.signing_key()?;
        let mut mac = HmacSha256::new_from_slice(&key)
            .map_err(|e| NotificationHubError::Config(format!("HMAC error: {}", e)))?;

        mac.update(payload.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("key_name", &self.key_name)
            .field("key_value", &"<redacted>")
            .finish()
    }
}

/// Expiry in whole Unix seconds, rounded half-up from millisecond precision
fn expiry_from(now: DateTime<Utc>) -> i64 {
    (now.timestamp_millis() + 500).div_euclid(1000) + TOKEN_TTL_SECONDS
}

/// Percent-encode everything except ASCII alphanumerics and `-._~`
///
/// This is stricter than query-string encoding: `!*'();:@&=+$,/?` are all
/// escaped.
pub fn encode_component(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
