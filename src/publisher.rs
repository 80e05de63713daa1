//! Publishes domain events to NATS when a server is configured.

use crate::domain::events::{DomainEvent, EventEnvelope};

#[derive(Clone, Default)]
pub struct EventPublisher {
    nats: Option<async_nats::Client>,
}

impl EventPublisher {
    pub fn new(nats: Option<async_nats::Client>) -> Self { Self { nats } }

    /// Connects to `url` if given. A server that cannot be reached disables
    /// publishing rather than failing start-up.
    pub async fn connect(url: Option<&str>) -> Self {
        let Some(url) = url else { return Self::default() };
        match async_nats::connect(url).await {
            Ok(client) => {
                tracing::info!(%url, "connected to NATS");
                Self::new(Some(client))
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "NATS unavailable, events disabled");
                Self::default()
            }
        }
    }

    pub fn is_enabled(&self) -> bool { self.nats.is_some() }

    pub async fn publish(&self, event: DomainEvent) {
        let Some(nats) = &self.nats else { return };
        let subject = event.subject();
        let payload = match serde_json::to_vec(&EventEnvelope::from(event)) {
            Ok(p) => p,
            Err(e) => { tracing::error!(subject, error = %e, "failed to encode event"); return; }
        };
        if let Err(e) = nats.publish(subject.to_string(), payload.into()).await {
            tracing::warn!(subject, error = %e, "failed to publish event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::CategoryEvent;

    #[tokio::test]
    async fn test_disabled_publisher_is_a_no_op() {
        let publisher = EventPublisher::connect(None).await;
        assert!(!publisher.is_enabled());
        publisher.publish(DomainEvent::Category(CategoryEvent::OrphansDropped { count: 0, categories: vec![] })).await;
    }
}
