//! Domain events
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::DroppedCategory;

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "aggregate", content = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    Category(CategoryEvent),
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CategoryEvent {
    /// Rows that were hidden from the served tree.
    OrphansDropped { count: usize, categories: Vec<DroppedCategory> },
}

impl DomainEvent {
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Category(CategoryEvent::OrphansDropped { .. }) => "catalog.category.orphans_dropped",
        }
    }
}

/// Wire form of an event: what gets published.
#[derive(Clone, Debug, Serialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: DomainEvent,
}

impl From<DomainEvent> for EventEnvelope {
    fn from(event: DomainEvent) -> Self {
        Self { id: Uuid::now_v7(), occurred_at: Utc::now(), event }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::DropReason;
    use crate::domain::value_objects::CategorySource;

    #[test]
    fn test_orphans_dropped_envelope() {
        let dropped = DroppedCategory { id: 2, source: CategorySource::Native, key: 2, parent_id: 99, reason: DropReason::DanglingParent };
        let event = DomainEvent::Category(CategoryEvent::OrphansDropped { count: 1, categories: vec![dropped] });
        assert_eq!(event.subject(), "catalog.category.orphans_dropped");

        let json = serde_json::to_value(EventEnvelope::from(event)).unwrap();
        assert_eq!(json["aggregate"], "category");
        assert_eq!(json["event"]["type"], "orphans_dropped");
        assert_eq!(json["event"]["categories"][0]["reason"], "dangling_parent");
        assert!(json["id"].is_string());
    }
}
