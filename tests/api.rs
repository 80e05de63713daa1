use std::sync::Arc;
use async_trait::async_trait;
use axum::{body::Body, http::{Request, StatusCode}};
use redington_catalog::api::{app_router, AppState};
use redington_catalog::publisher::EventPublisher;
use redington_catalog::{CatalogError, CategoryRecord, CategoryRepository, Result};
use serde_json::{json, Value};
use tower::ServiceExt;

struct StaticCategories(Vec<CategoryRecord>);

#[async_trait]
impl CategoryRepository for StaticCategories {
    async fn fetch_all(&self) -> Result<Vec<CategoryRecord>> { Ok(self.0.clone()) }
}

struct UnavailableCategories;

#[async_trait]
impl CategoryRepository for UnavailableCategories {
    async fn fetch_all(&self) -> Result<Vec<CategoryRecord>> { Err(CatalogError::Storage(sqlx::Error::PoolTimedOut)) }
}

async fn get(repo: impl CategoryRepository + 'static, uri: &str) -> (StatusCode, Value) {
    let app = app_router(AppState::new(Arc::new(repo), EventPublisher::default()));
    let response = app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_service() {
    let (status, body) = get(StaticCategories(vec![]), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn empty_table_returns_empty_tree() {
    let (status, body) = get(StaticCategories(vec![]), "/product/category").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "categories": []}));
}

#[tokio::test]
async fn native_child_nests_under_parent() {
    let repo = StaticCategories(vec![
        CategoryRecord::native(1, "Computers", None),
        CategoryRecord::native(2, "Laptops", Some(1)),
    ]);
    let (status, body) = get(repo, "/product/category").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({
        "success": true,
        "categories": [{
            "id": 1, "name": "Computers", "parent_id": null, "source": "native", "magento_category_id": null,
            "children": [{
                "id": 2, "name": "Laptops", "parent_id": 1, "source": "native", "magento_category_id": null,
                "children": []
            }]
        }]
    }));
}

#[tokio::test]
async fn colliding_ids_form_separate_roots() {
    let repo = StaticCategories(vec![
        CategoryRecord::native(5, "Networking", None),
        CategoryRecord::magento(6, 5, "Networking (Magento)", None),
    ]);
    let (_, body) = get(repo, "/product/category").await;
    let roots = body["categories"].as_array().unwrap();
    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0]["source"], "native");
    assert_eq!(roots[1]["source"], "magento");
    assert_eq!(roots[1]["magento_category_id"], 5);
}

#[tokio::test]
async fn dangling_parent_is_hidden() {
    let repo = StaticCategories(vec![
        CategoryRecord::native(1, "Computers", None),
        CategoryRecord::native(2, "Orphan", Some(99)),
    ]);
    let (status, body) = get(repo, "/product/category").await;
    assert_eq!(status, StatusCode::OK);
    let roots = body["categories"].as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["id"], 1);
    assert_eq!(roots[0]["children"], json!([]));
}

#[tokio::test]
async fn storage_failure_is_500_with_message() {
    let (status, body) = get(UnavailableCategories, "/product/category").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Storage error"));
}

#[tokio::test]
async fn malformed_row_is_reported_as_invalid_data() {
    let mut bad = CategoryRecord::magento(3, 0, "Broken", None);
    bad.magento_category_id = None;
    let (status, body) = get(StaticCategories(vec![CategoryRecord::native(1, "Computers", None), bad]), "/product/category").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid category row"));
}
