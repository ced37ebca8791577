//! # Recipe Storage Abstraction
//!
//! Handlers talk to storage only through the [`RecipeStore`] trait. Two implementations exist:
//!
//! - [`PgRecipeStore`]: PostgreSQL via a managed pool. Each call acquires one session for its
//!   duration and releases it on every exit path.
//! - [`InMemoryRecipeStore`]: a mutex-guarded map with the same id and uniqueness semantics,
//!   for tests and local experiments.
//!
//! Not-found is reported as [`StoreError::NotFound`] and duplicate names as
//! [`StoreError::Conflict`], whichever backend is used.
//!
//! ```rust
//! # use recetas::{InMemoryRecipeStore, RecipeRequest, RecipeStore};
//! # tokio_test_block(async {
//! let store = InMemoryRecipeStore::new();
//! let fields = RecipeRequest::new("Tortilla", "huevos,patata", "mezclar y freír")
//!     .validate()
//!     .unwrap();
//! let id = store.create(&fields).await.unwrap();
//! assert_eq!(store.get(id).await.unwrap().nombre, "Tortilla");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::connection;
use crate::errors::StoreError;
use crate::recipe::{Recipe, RecipeFields};
use crate::sql;

/// Storage interface for recipes.
///
/// Implementors must be safe to share across request handlers.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Lists recipes whose name contains `search`, or every recipe when `search` is `None` or
    /// empty. Results are ordered by id.
    async fn list(&self, search: Option<&str>) -> Result<Vec<Recipe>, StoreError>;

    /// Fetches one recipe.
    ///
    /// # Returns
    /// * `Ok(Recipe)` - The recipe
    /// * `Err(StoreError::NotFound)` - No recipe has this id
    async fn get(&self, id: i64) -> Result<Recipe, StoreError>;

    /// Inserts a recipe and returns its newly assigned id.
    ///
    /// # Returns
    /// * `Ok(i64)` - The new id
    /// * `Err(StoreError::Conflict)` - A recipe with the same name exists
    async fn create(&self, fields: &RecipeFields) -> Result<i64, StoreError>;

    /// Replaces all three content fields of an existing recipe.
    ///
    /// # Returns
    /// * `Ok(())` - The recipe was updated
    /// * `Err(StoreError::NotFound)` - No recipe has this id
    /// * `Err(StoreError::Conflict)` - Another recipe already uses the new name
    async fn update(&self, id: i64, fields: &RecipeFields) -> Result<(), StoreError>;

    /// Removes a recipe.
    ///
    /// # Returns
    /// * `Ok(())` - The recipe was removed
    /// * `Err(StoreError::NotFound)` - No recipe has this id
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

////////////////////////////////////////////// PostgreSQL /////////////////////////////////////////////

/// [`RecipeStore`] backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgRecipeStore {
    pool: PgPool,
}

impl PgRecipeStore {
    /// Wraps an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn list(&self, search: Option<&str>) -> Result<Vec<Recipe>, StoreError> {
        let mut session = connection::acquire(&self.pool).await?;
        sql::recipe::list(&mut session, search).await
    }

    async fn get(&self, id: i64) -> Result<Recipe, StoreError> {
        let mut session = connection::acquire(&self.pool).await?;
        sql::recipe::get(&mut session, id)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, fields: &RecipeFields) -> Result<i64, StoreError> {
        let mut session = connection::acquire(&self.pool).await?;
        let mut tx = sqlx::Connection::begin(&mut *session).await?;
        let id = sql::recipe::create(&mut tx, fields).await?;
        tx.commit().await?;
        Ok(id)
    }

    async fn update(&self, id: i64, fields: &RecipeFields) -> Result<(), StoreError> {
        let mut session = connection::acquire(&self.pool).await?;
        let mut tx = sqlx::Connection::begin(&mut *session).await?;
        if !sql::recipe::update(&mut tx, id, fields).await? {
            return Err(StoreError::NotFound(id));
        }
        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut session = connection::acquire(&self.pool).await?;
        let mut tx = sqlx::Connection::begin(&mut *session).await?;
        if !sql::recipe::delete(&mut tx, id).await? {
            return Err(StoreError::NotFound(id));
        }
        tx.commit().await?;
        Ok(())
    }
}

////////////////////////////////////////////// In-memory //////////////////////////////////////////////

#[derive(Debug, Default)]
struct Recipes {
    last_id: i64,
    by_id: BTreeMap<i64, Recipe>,
}

impl Recipes {
    fn name_taken(&self, nombre: &str, except: Option<i64>) -> bool {
        self.by_id
            .values()
            .any(|r| r.nombre == nombre && Some(r.id) != except)
    }
}

/// Thread-safe in-memory [`RecipeStore`].
///
/// Ids start at 1 and are never reused, matching a database sequence. Name matching in
/// [`RecipeStore::list`] is case-sensitive, like PostgreSQL's `LIKE`.
#[derive(Debug, Default)]
pub struct InMemoryRecipeStore {
    recipes: Mutex<Recipes>,
}

impl InMemoryRecipeStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Recipes>, StoreError> {
        self.recipes
            .lock()
            .map_err(|_| StoreError::Database("recipe store lock poisoned".to_string()))
    }
}

#[async_trait]
impl RecipeStore for InMemoryRecipeStore {
    async fn list(&self, search: Option<&str>) -> Result<Vec<Recipe>, StoreError> {
        let recipes = self.lock()?;
        let needle = search.unwrap_or_default();
        Ok(recipes
            .by_id
            .values()
            .filter(|r| r.nombre.contains(needle))
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Recipe, StoreError> {
        let recipes = self.lock()?;
        recipes.by_id.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, fields: &RecipeFields) -> Result<i64, StoreError> {
        let mut recipes = self.lock()?;
        if recipes.name_taken(&fields.nombre, None) {
            return Err(StoreError::Conflict(fields.nombre.clone()));
        }
        recipes.last_id += 1;
        let id = recipes.last_id;
        recipes.by_id.insert(id, fields.clone().into_recipe(id));
        Ok(id)
    }

    async fn update(&self, id: i64, fields: &RecipeFields) -> Result<(), StoreError> {
        let mut recipes = self.lock()?;
        if !recipes.by_id.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        if recipes.name_taken(&fields.nombre, Some(id)) {
            return Err(StoreError::Conflict(fields.nombre.clone()));
        }
        recipes.by_id.insert(id, fields.clone().into_recipe(id));
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut recipes = self.lock()?;
        recipes
            .by_id
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}
