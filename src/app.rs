use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::catalog as handlers;
use crate::db::repository::CatalogRepository;

/// Shared state handed to every handler.
///
/// Built once at boot and cloned per request; the repository is the only
/// shared resource and is read-only from the service's point of view.
#[derive(Clone)]
pub struct AppState {
    pub catalog_repo: Arc<dyn CatalogRepository>,
}

impl AppState {
    pub fn new(catalog_repo: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog_repo }
    }
}

/// Build the catalog router with permissive CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/getBrands", get(handlers::list_brands_handler))
        .route("/items", get(handlers::list_items_handler))
        .route("/items/brand/{brand_name}", get(handlers::items_by_brand_handler))
        .route("/items/gender/{gender}", get(handlers::items_by_gender_handler))
        .route(
            "/items/{gender}/category/{category_name}",
            get(handlers::items_by_gender_and_category_handler),
        )
        .route(
            "/items/filter/{category_name}/{sub_category_name}",
            get(handlers::items_by_category_and_subcategory_handler),
        )
        .route(
            "/items/subcategory/{sub_category_name}",
            get(handlers::items_by_subcategory_handler),
        )
        .route("/search", get(handlers::search_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
