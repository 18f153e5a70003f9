use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::app::AppState;
use crate::catalog;
use crate::db::models::Entity;
use crate::error::AppError;

type EntityList = Result<Json<Vec<Entity>>, AppError>;

/// Query string of `GET /search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Axum handler for `GET /getBrands`.
pub async fn list_brands_handler(State(state): State<AppState>) -> EntityList {
    let brands = catalog::list_brands(state.catalog_repo.as_ref()).await?;
    Ok(Json(brands))
}

/// Axum handler for `GET /items/brand/{brandName}`.
pub async fn items_by_brand_handler(
    State(state): State<AppState>,
    Path(brand_name): Path<String>,
) -> EntityList {
    let items = catalog::list_items_by_brand(state.catalog_repo.as_ref(), &brand_name).await?;
    Ok(Json(items))
}

/// Axum handler for `GET /items`.
pub async fn list_items_handler(State(state): State<AppState>) -> EntityList {
    let items = catalog::list_items(state.catalog_repo.as_ref()).await?;
    Ok(Json(items))
}

/// Axum handler for `GET /items/gender/{gender}`.
pub async fn items_by_gender_handler(
    State(state): State<AppState>,
    Path(gender): Path<String>,
) -> EntityList {
    let items = catalog::list_items_by_gender(state.catalog_repo.as_ref(), &gender).await?;
    Ok(Json(items))
}

/// Axum handler for `GET /items/{gender}/category/{categoryName}`.
pub async fn items_by_gender_and_category_handler(
    State(state): State<AppState>,
    Path((gender, category_name)): Path<(String, String)>,
) -> EntityList {
    let items = catalog::list_items_by_gender_and_category(
        state.catalog_repo.as_ref(),
        &gender,
        &category_name,
    )
    .await?;
    Ok(Json(items))
}

/// Axum handler for `GET /items/filter/{categoryName}/{subCategoryName}`.
pub async fn items_by_category_and_subcategory_handler(
    State(state): State<AppState>,
    Path((category_name, sub_category_name)): Path<(String, String)>,
) -> EntityList {
    let items = catalog::list_items_by_category_and_subcategory(
        state.catalog_repo.as_ref(),
        &category_name,
        &sub_category_name,
    )
    .await?;
    Ok(Json(items))
}

/// Axum handler for `GET /items/subcategory/{subCategoryName}`.
pub async fn items_by_subcategory_handler(
    State(state): State<AppState>,
    Path(sub_category_name): Path<String>,
) -> EntityList {
    let items =
        catalog::list_items_by_subcategory(state.catalog_repo.as_ref(), &sub_category_name)
            .await?;
    Ok(Json(items))
}

/// Axum handler for `GET /search?q=term`.
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> EntityList {
    let results = catalog::search(state.catalog_repo.as_ref(), params.q.as_deref()).await?;
    Ok(Json(results))
}
