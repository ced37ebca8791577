use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::ServerConfig;
use crate::data_store::RecipeStore;
use crate::recipe::create_recipe_router;

/// Any origin, any method, any header.
fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Builds the full application: recipe routes under `/api`, permissive CORS, and the
/// request body cap from `config`.
pub fn create_app(store: Arc<dyn RecipeStore>, config: &ServerConfig) -> Router {
    Router::new()
        .nest("/api", create_recipe_router(store))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.body_limit))
        .layer(build_cors_layer())
}
