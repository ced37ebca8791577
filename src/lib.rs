//! # Recetas: a small HTTP API for recipes
//!
//! This crate stores recipes (name, ingredients, instructions) in a single PostgreSQL table
//! and exposes them over HTTP:
//!
//! - **List/search**: `GET /api/recetas?search=...`
//! - **Fetch**: `GET /api/recetas/:id`
//! - **Create**: `POST /api/recetas`
//! - **Replace**: `PUT /api/recetas/:id`
//! - **Delete**: `DELETE /api/recetas/:id`
//!
//! Every failure is answered with HTTP 400 and the envelope
//! `{"success": false, "error": "<message>"}`; the kind of failure (bad id, bad body, unknown
//! id, duplicate name, database trouble) is carried by the message only.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ HTTP API Layer (Axum routes, envelopes) │
//! ├─────────────────────────────────────────┤
//! │ Validation (ids, required fields)       │
//! ├─────────────────────────────────────────┤
//! │ RecipeStore (trait-based abstraction)   │
//! ├─────────────────────────────────────────┤
//! │ Connection provider (pooled sessions)   │
//! ├─────────────────────────────────────────┤
//! │ SQL statements (PostgreSQL)             │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! # use recetas::{InMemoryRecipeStore, ServerConfig, create_app};
//! # use std::sync::Arc;
//! let store = Arc::new(InMemoryRecipeStore::new());
//! let app = create_app(store, &ServerConfig::default());
//! // axum::serve(listener, app).await
//! # let _ = app;
//! ```
//!
//! Validation happens before storage is touched:
//!
//! ```rust
//! # use recetas::{RecipeRequest, ValidationError, parse_recipe_id};
//! assert!(parse_recipe_id("12").is_ok());
//! assert!(parse_recipe_id("doce").is_err());
//!
//! let incomplete = RecipeRequest {
//!     nombre: Some("Tortilla".to_string()),
//!     ingredientes: Some(String::new()),
//!     instrucciones: None,
//! };
//! assert_eq!(
//!     incomplete.validate(),
//!     Err(ValidationError::MissingField("ingredientes"))
//! );
//! ```

#![deny(missing_docs)]
mod config;
mod data_store;
mod errors;
mod recipe;
mod router;

/// Command-line interface utilities for program termination and output formatting.
pub mod cli_utils;

/// Command-line interface command handlers for `recetasctl`.
pub mod commands;

/// Connection provider: pool construction and per-request session acquisition.
pub mod connection;

/// HTTP client utilities for interacting with a recetas server.
pub mod http_utils;

/// PostgreSQL statements and embedded migrations.
pub mod sql;

pub use config::{
    ConfigError, DEFAULT_BODY_LIMIT, DEFAULT_DB_PORT, DEFAULT_MAX_CONNECTIONS, DEFAULT_PORT,
    DatabaseConfig, ServerConfig,
};
pub use data_store::{InMemoryRecipeStore, PgRecipeStore, RecipeStore};
pub use errors::{
    ApiError, CONFLICT_MESSAGE, ErrorResponse, INVALID_DETAILS_MESSAGE, INVALID_ID_MESSAGE,
    NOT_FOUND_MESSAGE, RETRY_MESSAGE, StoreError, ValidationError,
};
pub use recipe::{
    CREATED_MESSAGE, CreateRecipeResponse, DELETED_MESSAGE, GetRecipeResponse, ListInfo,
    ListRecipesResponse, MessageResponse, Recipe, RecipeFields, RecipeRequest, SearchParams,
    UPDATED_MESSAGE, create_recipe_router, parse_recipe_id,
};
pub use router::create_app;
