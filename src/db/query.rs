//! Typed read queries against the catalog collections.
//!
//! A [`Query`] names a collection, a conjunction of field filters and an
//! optional ordering. It is translated into store filter/sort documents by the
//! repository, and can be evaluated in memory against an [`Entity`].

use bson::{Bson, Document as BsonDocument};
use serde_json::Value;

use crate::db::models::Entity;

/// Attribute paths the catalog filters and orders on.
pub mod fields {
    pub const BRAND_NAME: &str = "brand_name";
    pub const GENDER: &str = "gender";
    pub const CATEGORY_NAME: &str = "category.name";
    pub const SUB_CATEGORY: &str = "subCategory";
    pub const CREATED_AT: &str = "createdAt";
}

/// Logical collections. Physical names come from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogCollection {
    Brands,
    Items,
}

/// Comparison applied by a [`FieldFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    /// Dotted attribute path.
    pub field: String,
    pub comparison: Comparison,
    pub value: String,
}

impl FieldFilter {
    fn matches(&self, entity: &Entity) -> bool {
        match self.comparison {
            Comparison::Equal => matches!(
                entity.attribute(&self.field),
                Some(Value::String(stored)) if *stored == self.value
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    fn sort_value(self) -> i32 {
        match self {
            Direction::Ascending => 1,
            Direction::Descending => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub collection: CatalogCollection,
    pub filters: Vec<FieldFilter>,
    pub order_by: Option<OrderBy>,
}

impl Query {
    pub fn new(collection: CatalogCollection) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            order_by: None,
        }
    }

    /// Add an equality filter. Filters are combined with AND.
    pub fn where_eq(mut self, field: &str, value: impl Into<String>) -> Self {
        self.filters.push(FieldFilter {
            field: field.to_string(),
            comparison: Comparison::Equal,
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            direction,
        });
        self
    }

    /// Store filter document for this query.
    ///
    /// Filters on distinct fields share one document; a field filtered more
    /// than once falls back to an explicit `$and`.
    pub fn filter_document(&self) -> BsonDocument {
        let mut filter = BsonDocument::new();
        let repeated = self.filters.iter().enumerate().any(|(i, f)| {
            self.filters[..i].iter().any(|earlier| earlier.field == f.field)
        });

        if repeated {
            let clauses: Vec<BsonDocument> = self
                .filters
                .iter()
                .map(|f| {
                    let mut clause = BsonDocument::new();
                    clause.insert(f.field.as_str(), filter_value(f));
                    clause
                })
                .collect();
            filter.insert("$and", clauses);
        } else {
            for f in &self.filters {
                filter.insert(f.field.as_str(), filter_value(f));
            }
        }
        filter
    }

    /// Store sort document, if the query is ordered.
    pub fn sort_document(&self) -> Option<BsonDocument> {
        self.order_by.as_ref().map(|order| {
            let mut sort = BsonDocument::new();
            sort.insert(order.field.as_str(), order.direction.sort_value());
            sort
        })
    }

    /// Whether an entity satisfies every filter of this query.
    pub fn matches(&self, entity: &Entity) -> bool {
        self.filters.iter().all(|f| f.matches(entity))
    }
}

fn filter_value(filter: &FieldFilter) -> Bson {
    match filter.comparison {
        Comparison::Equal => Bson::String(filter.value.clone()),
    }
}
