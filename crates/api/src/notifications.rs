//! In-process relay standing in for the external notification collaborator.
//!
//! Subscribes to the event bus and logs each delivery. A real deployment
//! replaces this with a push/notification service consuming the same
//! subscription.

use darkroom_events::DomainEvent;
use tokio::sync::broadcast;

/// Consume events until the bus closes.
pub async fn relay(mut rx: broadcast::Receiver<DomainEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                tracing::info!(
                    event_type = %event.event_type,
                    source_entity_id = ?event.source_entity_id,
                    payload = %event.payload,
                    "Delivering notification"
                );
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Notification relay lagged; events dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    tracing::info!("Notification relay stopped");
}
