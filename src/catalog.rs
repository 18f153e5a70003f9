//! Catalog query operations, separated from the HTTP layer for testability.
//!
//! Every operation validates its input, builds one or two [`Query`] values and
//! runs them through a [`CatalogRepository`]. Store failures are tagged with
//! the operation's caller-facing message; invalid input never reaches the
//! store.

use std::collections::HashMap;

use crate::db::models::Entity;
use crate::db::query::{fields, CatalogCollection, Direction, Query};
use crate::db::repository::CatalogRepository;
use crate::error::AppError;

/// Gender values items are tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Unisex,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unisex => "unisex",
        }
    }

    /// Exact, case-sensitive match on `male` or `female` only.
    pub fn parse_binary(value: &str) -> Option<Self> {
        match value {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }

    /// Case-insensitive match on any gender, including `unisex`.
    pub fn parse_any(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "unisex" => Some(Gender::Unisex),
            _ => None,
        }
    }
}

/// Caller-facing failure messages, one per operation.
pub mod messages {
    pub const LIST_BRANDS: &str = "Error fetching brands";
    pub const ITEMS_BY_BRAND: &str = "Error fetching items by brand";
    pub const LIST_ITEMS: &str = "Error fetching all items";
    pub const ITEMS_BY_GENDER: &str = "Error fetching items by gender";
    pub const ITEMS_BY_GENDER_AND_CATEGORY: &str = "Error fetching items";
    pub const ITEMS_BY_CATEGORY_AND_SUBCATEGORY: &str =
        "Error fetching items by category and subcategory";
    pub const ITEMS_BY_SUBCATEGORY: &str = "Error fetching items by subcategory";
    pub const SEARCH: &str = "Error performing search";

    pub const INVALID_BINARY_GENDER: &str = "Invalid gender specified. Use 'male' or 'female'.";
    pub const INVALID_GENDER: &str = "Invalid gender specified.";
    pub const GENDER_AND_CATEGORY_REQUIRED: &str = "Both gender and category name are required.";
    pub const SEARCH_TERM_REQUIRED: &str = "A search term 'q' is required.";
}

// -- Query construction --

pub fn brands_query() -> Query {
    Query::new(CatalogCollection::Brands).order_by(fields::BRAND_NAME, Direction::Ascending)
}

pub fn items_by_brand_query(brand_name: &str) -> Query {
    Query::new(CatalogCollection::Items).where_eq(fields::BRAND_NAME, brand_name)
}

pub fn all_items_query() -> Query {
    Query::new(CatalogCollection::Items).order_by(fields::CREATED_AT, Direction::Descending)
}

pub fn items_by_gender_query(gender: Gender) -> Query {
    Query::new(CatalogCollection::Items).where_eq(fields::GENDER, gender.as_str())
}

/// Category names are matched lower-cased.
pub fn items_by_gender_and_category_query(gender: Gender, category_name: &str) -> Query {
    Query::new(CatalogCollection::Items)
        .where_eq(fields::GENDER, gender.as_str())
        .where_eq(fields::CATEGORY_NAME, category_name.to_lowercase())
}

/// Matched verbatim, no case normalization.
pub fn items_by_category_and_subcategory_query(
    category_name: &str,
    sub_category_name: &str,
) -> Query {
    Query::new(CatalogCollection::Items)
        .where_eq(fields::CATEGORY_NAME, category_name)
        .where_eq(fields::SUB_CATEGORY, sub_category_name)
}

pub fn items_by_subcategory_query(sub_category_name: &str) -> Query {
    Query::new(CatalogCollection::Items).where_eq(fields::SUB_CATEGORY, sub_category_name)
}

/// The two independent queries behind a search: by brand, then by subcategory.
pub fn search_queries(term: &str) -> (Query, Query) {
    (
        items_by_brand_query(term),
        items_by_subcategory_query(term),
    )
}

// -- Operations --

pub async fn list_brands(repo: &dyn CatalogRepository) -> Result<Vec<Entity>, AppError> {
    run(repo, &brands_query(), messages::LIST_BRANDS).await
}

pub async fn list_items_by_brand(
    repo: &dyn CatalogRepository,
    brand_name: &str,
) -> Result<Vec<Entity>, AppError> {
    run(repo, &items_by_brand_query(brand_name), messages::ITEMS_BY_BRAND).await
}

pub async fn list_items(repo: &dyn CatalogRepository) -> Result<Vec<Entity>, AppError> {
    run(repo, &all_items_query(), messages::LIST_ITEMS).await
}

pub async fn list_items_by_gender(
    repo: &dyn CatalogRepository,
    gender: &str,
) -> Result<Vec<Entity>, AppError> {
    let gender = Gender::parse_binary(gender)
        .ok_or_else(|| AppError::BadRequest(messages::INVALID_BINARY_GENDER.into()))?;

    run(repo, &items_by_gender_query(gender), messages::ITEMS_BY_GENDER).await
}

pub async fn list_items_by_gender_and_category(
    repo: &dyn CatalogRepository,
    gender: &str,
    category_name: &str,
) -> Result<Vec<Entity>, AppError> {
    if gender.is_empty() || category_name.is_empty() {
        return Err(AppError::BadRequest(
            messages::GENDER_AND_CATEGORY_REQUIRED.into(),
        ));
    }

    let gender = Gender::parse_any(gender)
        .ok_or_else(|| AppError::BadRequest(messages::INVALID_GENDER.into()))?;

    run(
        repo,
        &items_by_gender_and_category_query(gender, category_name),
        messages::ITEMS_BY_GENDER_AND_CATEGORY,
    )
    .await
}

pub async fn list_items_by_category_and_subcategory(
    repo: &dyn CatalogRepository,
    category_name: &str,
    sub_category_name: &str,
) -> Result<Vec<Entity>, AppError> {
    run(
        repo,
        &items_by_category_and_subcategory_query(category_name, sub_category_name),
        messages::ITEMS_BY_CATEGORY_AND_SUBCATEGORY,
    )
    .await
}

pub async fn list_items_by_subcategory(
    repo: &dyn CatalogRepository,
    sub_category_name: &str,
) -> Result<Vec<Entity>, AppError> {
    run(
        repo,
        &items_by_subcategory_query(sub_category_name),
        messages::ITEMS_BY_SUBCATEGORY,
    )
    .await
}

/// Items whose brand or subcategory equals `term`, brand matches first.
///
/// Both lookups run concurrently; if either fails the whole search fails.
pub async fn search(
    repo: &dyn CatalogRepository,
    term: Option<&str>,
) -> Result<Vec<Entity>, AppError> {
    let term = term
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest(messages::SEARCH_TERM_REQUIRED.into()))?;

    let (by_brand, by_subcategory) = search_queries(term);
    let (brand_matches, subcategory_matches) =
        futures::try_join!(repo.find(&by_brand), repo.find(&by_subcategory))
            .map_err(|e| e.in_operation(messages::SEARCH))?;

    tracing::debug!(
        term,
        brand_matches = brand_matches.len(),
        subcategory_matches = subcategory_matches.len(),
        "search sub-queries completed"
    );

    Ok(merge_by_id([brand_matches, subcategory_matches]))
}

/// Union result sets keyed by identifier.
///
/// Output follows first-insertion order. When an identifier repeats, the later
/// copy replaces the earlier one in place.
pub fn merge_by_id<I>(result_sets: I) -> Vec<Entity>
where
    I: IntoIterator<Item = Vec<Entity>>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<Entity> = Vec::new();

    for entity in result_sets.into_iter().flatten() {
        match positions.get(&entity.id) {
            Some(&index) => merged[index] = entity,
            None => {
                positions.insert(entity.id.clone(), merged.len());
                merged.push(entity);
            }
        }
    }

    merged
}

async fn run(
    repo: &dyn CatalogRepository,
    query: &Query,
    failure_message: &'static str,
) -> Result<Vec<Entity>, AppError> {
    repo.find(query)
        .await
        .map_err(|e| e.in_operation(failure_message))
}
