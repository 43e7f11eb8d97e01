use thiserror::Error;

use crate::transport::TransportError;

/// Notification Hubs client error types
#[derive(Error, Debug)]
pub enum NotificationHubError {
    /// Malformed connection string, invalid endpoint, undecodable signing key
    /// or unusable environment configuration.
    #[error("Notification hub configuration error: {0}")]
    Config(String),

    /// A header name or value that cannot be carried on an HTTP request.
    #[error("Invalid notification request: {0}")]
    InvalidRequest(String),

    /// The hub answered with anything other than 201 Created.
    #[error("Unexpected notification hub response: {status} - {body}")]
    InvalidResponse { status: u16, body: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl NotificationHubError {
    /// Status code of a rejected send, if the hub answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            NotificationHubError::InvalidResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<NotificationHubError> for String {
    fn from(err: NotificationHubError) -> Self {
        err.to_string()
    }
}

pub type Result<T> = std::result::Result<T, NotificationHubError>;
