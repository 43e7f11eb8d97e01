use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const JSON_CONTENT_TYPE: &str = "application/json;charset=utf-8";
pub const XML_CONTENT_TYPE: &str = "application/xml";

/// Push platform tags understood by the hub (`ServiceBusNotification-Format`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Apple,
    /// Firebase Cloud Messaging, tagged `gcm` on the wire
    #[serde(rename = "gcm")]
    Fcm,
    Windows,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Apple => "apple",
            Platform::Fcm => "gcm",
            Platform::Windows => "windows",
        }
    }

    /// Content type used by the platform factories
    pub fn default_content_type(&self) -> &'static str {
        match self {
            Platform::Apple | Platform::Fcm => JSON_CONTENT_TYPE,
            Platform::Windows => XML_CONTENT_TYPE,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single notification to deliver to one device
///
/// `message` and `headers` are explicitly optional: an absent header map means
/// no caller headers at all, which keeps header precedence in
/// [`NotificationHub::send_direct_notification`](crate::NotificationHub::send_direct_notification)
/// unambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub message: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub content_type: String,
    pub platform: String,
}

impl NotificationRequest {
    /// Request for an arbitrary platform tag and content type
    pub fn new(platform: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            message: None,
            headers: None,
            content_type: content_type.into(),
            platform: platform.into(),
        }
    }

    pub fn for_platform(platform: Platform) -> Self {
        Self::new(platform.as_str(), platform.default_content_type())
    }

    /// Apple (APNs) request without a message body
    pub fn create_apple_request() -> Self {
        Self::for_platform(Platform::Apple)
    }

    pub fn create_apple_request_with_message(message: impl Into<String>) -> Self {
        Self::create_apple_request().with_message(message)
    }

    pub fn create_apple_request_with_headers(
        message: impl Into<String>,
        headers: HashMap<String, String>,
    ) -> Self {
        Self::create_apple_request_with_message(message).with_headers(headers)
    }

    /// Firebase (FCM) request without a message body
    pub fn create_fcm_request() -> Self {
        Self::for_platform(Platform::Fcm)
    }

    pub fn create_fcm_request_with_message(message: impl Into<String>) -> Self {
        Self::create_fcm_request().with_message(message)
    }

    pub fn create_fcm_request_with_headers(
        message: impl Into<String>,
        headers: HashMap<String, String>,
    ) -> Self {
        Self::create_fcm_request_with_message(message).with_headers(headers)
    }

    /// Windows (WNS) request without a message body
    pub fn create_windows_request() -> Self {
        Self::for_platform(Platform::Windows)
    }

    pub fn create_windows_request_with_message(message: impl Into<String>) -> Self {
        Self::create_windows_request().with_message(message)
    }

    pub fn create_windows_request_with_headers(
        message: impl Into<String>,
        headers: HashMap<String, String>,
    ) -> Self {
        Self::create_windows_request_with_message(message).with_headers(headers)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Merge `headers` into the request; later values replace earlier ones
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.get_or_insert_with(HashMap::new).extend(headers);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }
}

/// Delivery metadata returned by the hub for an accepted notification
///
/// Each field is empty when the hub omitted the corresponding header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub location: String,
    pub correlation_id: String,
    pub tracking_id: String,
}
