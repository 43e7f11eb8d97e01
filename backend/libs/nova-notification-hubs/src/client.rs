use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use tracing::{debug, info, warn};

use crate::config::{HubConfig, PayloadMode};
use crate::connection_string::ConnectionString;
use crate::errors::{NotificationHubError, Result};
use crate::models::{NotificationRequest, NotificationResponse};
use crate::token::TokenProvider;
use crate::transport::{HttpRequest, HttpTransport, ReqwestTransport};

pub const API_VERSION: &str = "2015-01";

const STATUS_CREATED: u16 = 201;

const FORMAT_HEADER: &str = "servicebusnotification-format";
const DEVICE_HANDLE_HEADER: &str = "servicebusnotification-devicehandle";

const TRACKING_ID_HEADER: &str = "TrackingId";
const CORRELATION_ID_HEADER: &str = "x-ms-correlation-request-id";
const LOCATION_HEADER: &str = "Location";

/// Notification Hubs client
///
/// Sends direct notifications to a single device handle through a named hub.
/// The client is immutable after construction; every send signs a fresh SAS
/// token and issues exactly one request, so one instance can be shared across
/// concurrent tasks.
#[derive(Clone)]
pub struct NotificationHub {
    hub_name: String,
    base_uri: String,
    token_provider: TokenProvider,
    payload_mode: PayloadMode,
    transport: Arc<dyn HttpTransport>,
}

impl NotificationHub {
    /// Create a client that sends through a default `reqwest` transport
    ///
    /// # Arguments
    /// * `connection_string` - `Endpoint=sb://...;SharedAccessKeyName=...;SharedAccessKey=...`
    /// * `hub_name` - Hub path segment, used verbatim
    pub fn new(connection_string: &str, hub_name: impl Into<String>) -> Result<Self> {
        Self::with_transport(
            connection_string,
            hub_name,
            Arc::new(ReqwestTransport::new()),
        )
    }

    /// Create a client over a caller-supplied transport
    pub fn with_transport(
        connection_string: &str,
        hub_name: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        let (base_uri, token_provider) = ConnectionString::parse(connection_string)?.into_parts();

        // Reject an undecodable key now rather than on the first send.
        token_provider.signing_key()?;

        let hub_name = hub_name.into();

        info!(
            endpoint = %base_uri,
            hub = %hub_name,
            key_name = %token_provider.key_name(),
            "Initialized notification hub client"
        );

        Ok(Self {
            hub_name,
            base_uri,
            token_provider,
            payload_mode: PayloadMode::default(),
            transport,
        })
    }

    /// Create a client from loaded configuration
    pub fn from_config(cfg: &HubConfig) -> Result<Self> {
        Ok(Self::new(&cfg.connection_string, cfg.hub_name.clone())?
            .with_payload_mode(cfg.payload_mode))
    }

    pub fn with_payload_mode(mut self, payload_mode: PayloadMode) -> Self {
        self.payload_mode = payload_mode;
        self
    }

    pub fn hub_name(&self) -> &str {
        &self.hub_name
    }

    /// Endpoint exactly as configured; also the SAS audience
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn payload_mode(&self) -> PayloadMode {
        self.payload_mode
    }

    /// Direct-send URL: the `sb://` prefix becomes `https://`, the rest of the
    /// endpoint is kept as written.
    pub fn messages_url(&self) -> String {
        let base = match self.base_uri.strip_prefix("sb://") {
            Some(rest) => format!("https://{}", rest),
            None => self.base_uri.clone(),
        };
        let separator = if base.ends_with('/') { "" } else { "/" };

        format!(
            "{}{}{}/messages/api-version={}&direct=true",
            base, separator, self.hub_name, API_VERSION
        )
    }

    /// Send one notification directly to `device_handle`
    ///
    /// # Returns
    /// Delivery metadata on 201 Created; `InvalidResponse` for any other
    /// status and `Transport` when the request never completed.
    pub async fn send_direct_notification(
        &self,
        device_handle: &str,
        request: &NotificationRequest,
    ) -> Result<NotificationResponse> {
        let device_handle_prefix = device_handle.chars().take(8).collect::<String>();
        let outbound = self.build_request(device_handle, request)?;

        debug!(
            hub = %self.hub_name,
            platform = %request.platform,
            device_handle = %device_handle_prefix,
            has_body = outbound.body.is_some(),
            "Sending direct notification"
        );

        let response = self.transport.execute(outbound).await?;

        if response.status != STATUS_CREATED {
            warn!(
                hub = %self.hub_name,
                status = response.status,
                device_handle = %device_handle_prefix,
                "Notification hub rejected direct notification"
            );
            return Err(NotificationHubError::InvalidResponse {
                status: response.status,
                body: response.body,
            });
        }

        let result = NotificationResponse {
            location: response.header_or_empty(LOCATION_HEADER),
            correlation_id: response.header_or_empty(CORRELATION_ID_HEADER),
            tracking_id: response.header_or_empty(TRACKING_ID_HEADER),
        };

        info!(
            hub = %self.hub_name,
            tracking_id = %result.tracking_id,
            correlation_id = %result.correlation_id,
            "Direct notification accepted"
        );

        Ok(result)
    }

    /// Build the outbound request without sending it
    ///
    /// Caller headers go in first; `Authorization`,
    /// `ServiceBusNotification-Format`, `Content-Type` and
    /// `ServiceBusNotification-DeviceHandle` are set afterwards and always
    /// replace a caller header of the same name.
    pub fn build_request(
        &self,
        device_handle: &str,
        request: &NotificationRequest,
    ) -> Result<HttpRequest> {
        let authorization = self.token_provider.generate_sas_token(&self.base_uri)?;

        let mut headers = HeaderMap::new();

        if let Some(custom) = &request.headers {
            for (name, value) in custom {
                headers.insert(header_name(name)?, header_value(name, value)?);
            }
        }

        headers.insert(AUTHORIZATION, header_value("Authorization", &authorization)?);
        headers.insert(
            HeaderName::from_static(FORMAT_HEADER),
            header_value("ServiceBusNotification-Format", &request.platform)?,
        );
        headers.insert(
            CONTENT_TYPE,
            header_value("Content-Type", &request.content_type)?,
        );
        headers.insert(
            HeaderName::from_static(DEVICE_HANDLE_HEADER),
            header_value("ServiceBusNotification-DeviceHandle", device_handle)?,
        );

        Ok(HttpRequest {
            method: Method::POST,
            url: self.messages_url(),
            headers,
            body: self.outbound_body(request),
        })
    }

    /// The one place deciding whether the message is sent as the body
    fn outbound_body(&self, request: &NotificationRequest) -> Option<String> {
        match self.payload_mode {
            PayloadMode::Attach => request.message.clone(),
            PayloadMode::HeadersOnly => None,
        }
    }
}

impl fmt::Debug for NotificationHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationHub")
            .field("hub_name", &self.hub_name)
            .field("base_uri", &self.base_uri)
            .field("token_provider", &self.token_provider)
            .field("payload_mode", &self.payload_mode)
            .finish_non_exhaustive()
    }
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
        NotificationHubError::InvalidRequest(format!("invalid header name '{}': {}", name, e))
    })
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| {
        NotificationHubError::InvalidRequest(format!("invalid value for header '{}': {}", name, e))
    })
}
