use async_trait::async_trait;

use crate::db::models::Entity;
use crate::db::query::{CatalogCollection, Query};
use crate::error::AppError;

/// Read access to the catalog collections.
///
/// This trait allows mocking the database layer in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Execute a read query and return every matching entity, in store order.
    async fn find(&self, query: &Query) -> Result<Vec<Entity>, AppError>;
}

/// Physical collection names in the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNames {
    pub brands: String,
    pub items: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            brands: "Brands".to_string(),
            items: "All_Items".to_string(),
        }
    }
}

impl CollectionNames {
    pub fn resolve(&self, collection: CatalogCollection) -> &str {
        match collection {
            CatalogCollection::Brands => &self.brands,
            CatalogCollection::Items => &self.items,
        }
    }
}

/// MongoDB implementation of the CatalogRepository.
pub struct MongoCatalogRepository {
    db: mongodb::Database,
    collections: CollectionNames,
}

impl MongoCatalogRepository {
    pub fn new(db: &mongodb::Database, collections: CollectionNames) -> Self {
        Self {
            db: db.clone(),
            collections,
        }
    }

    fn collection(&self, collection: CatalogCollection) -> mongodb::Collection<bson::Document> {
        self.db.collection(self.collections.resolve(collection))
    }
}

#[async_trait]
impl CatalogRepository for MongoCatalogRepository {
    async fn find(&self, query: &Query) -> Result<Vec<Entity>, AppError> {
        use futures::TryStreamExt;
        use mongodb::options::FindOptions;

        let options = FindOptions::builder().sort(query.sort_document()).build();

        let cursor = self
            .collection(query.collection)
            .find(query.filter_document())
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let documents: Vec<bson::Document> = cursor
            .try_collect()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(
            collection = self.collections.resolve(query.collection),
            matched = documents.len(),
            "catalog query executed"
        );

        Ok(documents.into_iter().map(Entity::from_document).collect())
    }
}
