use anyhow::{Context, Result};
use nova_notification_hubs::{HubConfig, NotificationHub, NotificationRequest};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Sends one direct Apple notification using `NOTIFICATION_HUB_*` settings
///
/// Extra variables:
/// - `HUB_SENDER_DEVICE_HANDLE` (required)
/// - `HUB_SENDER_MESSAGE` (optional APNs JSON payload)
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    let cfg = HubConfig::from_env().context("loading notification hub configuration")?;
    let hub = NotificationHub::from_config(&cfg).context("creating notification hub client")?;

    let device_handle =
        std::env::var("HUB_SENDER_DEVICE_HANDLE").context("HUB_SENDER_DEVICE_HANDLE is not set")?;

    let request = match std::env::var("HUB_SENDER_MESSAGE") {
        Ok(message) => NotificationRequest::create_apple_request_with_message(message),
        Err(_) => NotificationRequest::create_apple_request(),
    };

    tracing::info!(hub = %hub.hub_name(), "Sending direct notification");

    let response = hub
        .send_direct_notification(&device_handle, &request)
        .await
        .context("sending direct notification")?;

    tracing::info!(
        tracking_id = %response.tracking_id,
        correlation_id = %response.correlation_id,
        location = %response.location,
        "Notification accepted by hub"
    );

    Ok(())
}
