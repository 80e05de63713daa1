//! HTTP surface: routes, shared state and the response envelopes.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::{IntoResponse, Response}, routing::get, Json, Router};
use serde::Serialize;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::domain::aggregates::{CategoryNode, CategoryTree, DroppedCategory};
use crate::domain::events::{CategoryEvent, DomainEvent};
use crate::publisher::EventPublisher;
use crate::repository::CategoryRepository;
use crate::CatalogError;

pub const SERVICE_NAME: &str = "redington-catalog";

#[derive(Clone)]
pub struct AppState {
    pub categories: Arc<dyn CategoryRepository>,
    pub events: EventPublisher,
}

impl AppState {
    pub fn new(categories: Arc<dyn CategoryRepository>, events: EventPublisher) -> Self { Self { categories, events } }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": SERVICE_NAME})) }))
        .route("/product/category", get(category_tree))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct CategoryTreeResponse {
    pub success: bool,
    pub categories: Vec<CategoryNode>,
}

async fn category_tree(State(s): State<AppState>) -> Result<Json<CategoryTreeResponse>, ApiError> {
    let records = s.categories.fetch_all().await?;
    let rows = records.len();
    let (categories, dropped) = CategoryTree::assemble(records)?.into_parts();

    if !dropped.is_empty() {
        tracing::warn!(rows, dropped = dropped.len(), "categories hidden from tree: parent not reachable");
        report_dropped(&s.events, dropped);
    }

    tracing::debug!(rows, roots = categories.len(), "category tree assembled");
    Ok(Json(CategoryTreeResponse { success: true, categories }))
}

/// Publishes the dropped rows in the background. Returns the publishing task,
/// or `None` when events are disabled.
fn report_dropped(events: &EventPublisher, dropped: Vec<DroppedCategory>) -> Option<JoinHandle<()>> {
    if !events.is_enabled() { return None; }
    let events = events.clone();
    let event = DomainEvent::Category(CategoryEvent::OrphansDropped { count: dropped.len(), categories: dropped });
    Some(tokio::spawn(async move { events.publish(event).await }))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub struct ApiError(CatalogError);

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self { Self(e) }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_validation() {
            tracing::error!(error = %self.0, "category data rejected");
        } else {
            tracing::error!(error = %self.0, "category storage failure");
        }
        let body = ErrorBody { success: false, error: self.0.to_string() };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::DropReason;
    use crate::domain::value_objects::CategorySource;

    #[tokio::test]
    async fn test_disabled_events_spawn_nothing() {
        let dropped = vec![DroppedCategory { id: 2, source: CategorySource::Native, key: 2, parent_id: 99, reason: DropReason::DanglingParent }];
        assert!(report_dropped(&EventPublisher::default(), dropped).is_none());
    }
}
