#![allow(dead_code)]

use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use catalog_api::app::{router, AppState};
use catalog_api::db::models::Entity;
use catalog_api::db::query::{CatalogCollection, Direction, Query};
use catalog_api::db::repository::CatalogRepository;
use catalog_api::error::AppError;

/// In-memory stand-in for the document store.
///
/// Evaluates filters with `Query::matches` and applies the requested ordering
/// on string attributes. Counts every query it serves.
#[derive(Default)]
pub struct MemoryCatalog {
    brands: Vec<Entity>,
    items: Vec<Entity>,
    queries: AtomicUsize,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_brand(mut self, id: &str, attributes: Value) -> Self {
        self.brands.push(entity(id, attributes));
        self
    }

    pub fn with_item(mut self, id: &str, attributes: Value) -> Self {
        self.items.push(entity(id, attributes));
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(AtomicOrdering::SeqCst)
    }
}

#[async_trait]
impl CatalogRepository for MemoryCatalog {
    async fn find(&self, query: &Query) -> Result<Vec<Entity>, AppError> {
        self.queries.fetch_add(1, AtomicOrdering::SeqCst);

        let source = match query.collection {
            CatalogCollection::Brands => &self.brands,
            CatalogCollection::Items => &self.items,
        };

        let mut matched: Vec<Entity> = source
            .iter()
            .filter(|e| query.matches(e))
            .cloned()
            .collect();

        if let Some(order) = &query.order_by {
            matched.sort_by(|a, b| {
                let ord = compare_attribute(a, b, &order.field);
                match order.direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }

        Ok(matched)
    }
}

fn compare_attribute(a: &Entity, b: &Entity, field: &str) -> Ordering {
    let key = |e: &Entity| e.attribute(field).and_then(Value::as_str).map(str::to_string);
    key(a).cmp(&key(b))
}

/// A store that fails every query.
pub struct BrokenCatalog;

#[async_trait]
impl CatalogRepository for BrokenCatalog {
    async fn find(&self, _query: &Query) -> Result<Vec<Entity>, AppError> {
        Err(AppError::Database(
            "server selection timeout: mongodb://admin:hunter2@db:27017".into(),
        ))
    }
}

pub fn entity(id: &str, attributes: Value) -> Entity {
    match attributes {
        Value::Object(map) => Entity::new(id, map),
        _ => panic!("attributes must be a JSON object"),
    }
}

/// Build a `TestServer` backed by the given repository.
pub fn server(repo: Arc<dyn CatalogRepository>) -> axum_test::TestServer {
    axum_test::TestServer::builder()
        .build(router(AppState::new(repo)))
}

/// The sample catalog shared by most API tests.
pub fn sample_catalog() -> MemoryCatalog {
    MemoryCatalog::new()
        .with_brand("b1", serde_json::json!({ "brand_name": "Nike" }))
        .with_brand("b2", serde_json::json!({ "brand_name": "Adidas" }))
        .with_item(
            "i1",
            serde_json::json!({
                "brand_name": "Nike",
                "gender": "male",
                "category": { "name": "shoes" },
                "subCategory": "Running",
                "createdAt": "2024-03-01T09:00:00.000Z"
            }),
        )
        .with_item(
            "i2",
            serde_json::json!({
                "brand_name": "Adidas",
                "gender": "female",
                "category": { "name": "shoes" },
                "subCategory": "Nike",
                "createdAt": "2024-05-12T18:30:00.000Z"
            }),
        )
        .with_item(
            "i3",
            serde_json::json!({
                "brand_name": "Puma",
                "gender": "unisex",
                "category": { "name": "bags" },
                "subCategory": "Backpacks",
                "createdAt": "2023-11-20T07:15:00.000Z"
            }),
        )
        .with_item(
            "i4",
            serde_json::json!({
                "brand_name": "Nike",
                "gender": "female",
                "category": { "name": "Shirts" },
                "subCategory": "Training",
                "createdAt": "2024-01-05T12:00:00.000Z"
            }),
        )
}

pub fn ids(results: &[Value]) -> Vec<&str> {
    results
        .iter()
        .map(|r| r["id"].as_str().expect("every entity carries an id"))
        .collect()
}
