/// Nova Notification Hubs Shared Library
///
/// This library provides a Notification Hubs client for sending direct push
/// notifications to a single device through a named hub.
///
/// It handles:
/// - Connection string parsing (`Endpoint`, `SharedAccessKeyName`, `SharedAccessKey`)
/// - Shared Access Signature (SAS) token generation with HMAC-SHA256
/// - Platform-tagged notification requests (Apple, FCM, Windows)
/// - Request construction, header precedence and response interpretation
/// - A pluggable HTTP transport with a `reqwest` default
pub mod client;
pub mod config;
pub mod connection_string;
pub mod errors;
pub mod models;
pub mod token;
pub mod transport;

pub use client::NotificationHub;
pub use config::{HubConfig, PayloadMode};
pub use connection_string::ConnectionString;
pub use errors::{NotificationHubError, Result};
pub use models::{NotificationRequest, NotificationResponse, Platform};
pub use token::TokenProvider;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
