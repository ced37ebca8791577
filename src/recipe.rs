//! # Recipes
//!
//! The recipe model, request validation, and the HTTP handlers for `/recetas`.
//!
//! Every handler follows the same shape: validate the path and body without touching storage,
//! run exactly one store operation, and wrap the result in a JSON envelope. Failures of any
//! kind come back as `{"success": false, "error": "..."}` with status 400.
//!
//! ## Routes
//!
//! | Method | Path            | Success body                                 |
//! |--------|-----------------|----------------------------------------------|
//! | GET    | `/recetas`      | `{"info": {"count": n}, "nombre": [...]}`    |
//! | GET    | `/recetas/:id`  | `{"success": true, "receta": {...}}`         |
//! | POST   | `/recetas`      | `{"success": true, "message": "...", "id": n}` |
//! | PUT    | `/recetas/:id`  | `{"success": true, "message": "..."}`        |
//! | DELETE | `/recetas/:id`  | `{"success": true, "message": "..."}`        |

use std::num::IntErrorKind;
use std::sync::Arc;

use axum::Router;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Json;
use axum::routing::get;
use serde::{Deserialize, Serialize};

use crate::data_store::RecipeStore;
use crate::errors::{ApiError, ValidationError};

/// Message returned after a recipe is created.
pub const CREATED_MESSAGE: &str = "¡Receta creada! 🎉 A cocinar se ha dicho. 🍳";
/// Message returned after a recipe is updated.
pub const UPDATED_MESSAGE: &str = "¡Receta mejorada! 🎉¡A disfrutar cocinando! 🍳";
/// Message returned after a recipe is deleted.
pub const DELETED_MESSAGE: &str = "Receta evaporada con éxito 🗑️";

/////////////////////////////////////////////// Recipe ////////////////////////////////////////////////

/// A stored recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recipe {
    /// Identifier assigned by storage on insert.
    pub id: i64,
    /// Recipe name; unique across all recipes.
    pub nombre: String,
    /// Free-text ingredient list.
    pub ingredientes: String,
    /// Free-text preparation steps.
    pub instrucciones: String,
}

/// The three content fields of a recipe, already validated as present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFields {
    /// Recipe name.
    pub nombre: String,
    /// Ingredient list.
    pub ingredientes: String,
    /// Preparation steps.
    pub instrucciones: String,
}

impl RecipeFields {
    /// Attaches an id, producing the stored form.
    pub fn into_recipe(self, id: i64) -> Recipe {
        Recipe {
            id,
            nombre: self.nombre,
            ingredientes: self.ingredientes,
            instrucciones: self.instrucciones,
        }
    }
}

/////////////////////////////////////////// Validation ////////////////////////////////////////////

/// Body of a create or update request, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRequest {
    /// Recipe name.
    #[serde(default)]
    pub nombre: Option<String>,
    /// Ingredient list.
    #[serde(default)]
    pub ingredientes: Option<String>,
    /// Preparation steps.
    #[serde(default)]
    pub instrucciones: Option<String>,
}

impl RecipeRequest {
    /// Builds a request with all three fields set.
    pub fn new(
        nombre: impl Into<String>,
        ingredientes: impl Into<String>,
        instrucciones: impl Into<String>,
    ) -> Self {
        Self {
            nombre: Some(nombre.into()),
            ingredientes: Some(ingredientes.into()),
            instrucciones: Some(instrucciones.into()),
        }
    }

    /// Checks that every field is present and non-empty.
    ///
    /// Text containing NUL is refused as well; PostgreSQL cannot store it in `TEXT`.
    pub fn validate(self) -> Result<RecipeFields, ValidationError> {
        fn required(
            value: Option<String>,
            field: &'static str,
        ) -> Result<String, ValidationError> {
            match value {
                Some(v) if v.contains('\0') => Err(ValidationError::InvalidField(field)),
                Some(v) if !v.is_empty() => Ok(v),
                _ => Err(ValidationError::MissingField(field)),
            }
        }

        Ok(RecipeFields {
            nombre: required(self.nombre, "nombre")?,
            ingredientes: required(self.ingredientes, "ingredientes")?,
            instrucciones: required(self.instrucciones, "instrucciones")?,
        })
    }
}

/// Parses a path id, which must be a base-10 integer.
///
/// An integer outside the `i64` range is a number that no stored recipe can carry, so it is
/// reported as [`ApiError::NotFound`] rather than as an invalid id.
pub fn parse_recipe_id(raw: &str) -> Result<i64, ApiError> {
    match raw.parse::<i64>() {
        Ok(id) => Ok(id),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Err(ApiError::NotFound(raw.to_string()))
        }
        Err(_) => Err(ValidationError::InvalidId(raw.to_string()).into()),
    }
}

fn path_id(path: Result<Path<String>, PathRejection>) -> Result<i64, ApiError> {
    let Path(raw) = path.map_err(|e| ValidationError::InvalidId(e.body_text()))?;
    parse_recipe_id(&raw)
}

fn validate_body(
    body: Result<Json<RecipeRequest>, JsonRejection>,
) -> Result<RecipeFields, ValidationError> {
    let Json(request) = body.map_err(|e| ValidationError::MalformedBody(e.body_text()))?;
    request.validate()
}

////////////////////////////////////////////// Responses //////////////////////////////////////////////

/// Query string accepted by the list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    /// Substring to look for in recipe names.
    pub search: Option<String>,
}

/// Summary information for a list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListInfo {
    /// Number of recipes returned.
    pub count: usize,
}

/// Response from listing recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRecipesResponse {
    /// Result metadata.
    pub info: ListInfo,
    /// The matching recipes.
    pub nombre: Vec<Recipe>,
}

/// Response from fetching one recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRecipeResponse {
    /// Always true.
    pub success: bool,
    /// The requested recipe.
    pub receta: Recipe,
}

/// Response from creating a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRecipeResponse {
    /// Always true.
    pub success: bool,
    /// Confirmation text.
    pub message: String,
    /// Identifier assigned to the new recipe.
    pub id: i64,
}

/// Response from updating or deleting a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Always true.
    pub success: bool,
    /// Confirmation text.
    pub message: String,
}

impl MessageResponse {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

////////////////////////////////////////////// Routes //////////////////////////////////////////////////

type RecipeState = State<Arc<dyn RecipeStore>>;

async fn list_recipes(
    State(store): RecipeState,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<ListRecipesResponse>, ApiError> {
    let Query(params) = query.map_err(|e| ValidationError::MalformedQuery(e.body_text()))?;
    let recipes = store.list(params.search.as_deref()).await?;
    Ok(Json(ListRecipesResponse {
        info: ListInfo {
            count: recipes.len(),
        },
        nombre: recipes,
    }))
}

async fn get_recipe(
    State(store): RecipeState,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<GetRecipeResponse>, ApiError> {
    let id = path_id(path)?;
    let receta = store.get(id).await?;
    Ok(Json(GetRecipeResponse {
        success: true,
        receta,
    }))
}

async fn create_recipe(
    State(store): RecipeState,
    body: Result<Json<RecipeRequest>, JsonRejection>,
) -> Result<Json<CreateRecipeResponse>, ApiError> {
    let fields = validate_body(body)?;
    let id = store.create(&fields).await?;
    tracing::info!(id, nombre = %fields.nombre, "recipe created");
    Ok(Json(CreateRecipeResponse {
        success: true,
        message: CREATED_MESSAGE.to_string(),
        id,
    }))
}

async fn update_recipe(
    State(store): RecipeState,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<RecipeRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = path_id(path)?;
    let fields = validate_body(body)?;
    store.update(id, &fields).await?;
    tracing::info!(id, "recipe updated");
    Ok(Json(MessageResponse::ok(UPDATED_MESSAGE)))
}

async fn delete_recipe(
    State(store): RecipeState,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = path_id(path)?;
    store.delete(id).await?;
    tracing::info!(id, "recipe deleted");
    Ok(Json(MessageResponse::ok(DELETED_MESSAGE)))
}

/// Creates the HTTP router for recipe endpoints.
///
/// The routes are relative; the daemon nests them under `/api`.
pub fn create_recipe_router(store: Arc<dyn RecipeStore>) -> Router {
    Router::new()
        .route("/recetas", get(list_recipes).post(create_recipe))
        .route(
            "/recetas/:id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
        .with_state(store)
}
