//! Recipe operations for PostgreSQL database.
//!
//! Name uniqueness is enforced by the `recetas_nombre_key` unique index; a unique violation
//! is reported as [`StoreError::Conflict`]. Update and delete report whether a row was
//! affected, which is the authoritative existence check.

use sqlx::PgConnection;

use crate::errors::StoreError;
use crate::recipe::{Recipe, RecipeFields};

/// Result type for database operations.
pub type SqlResult<T> = Result<T, StoreError>;

/// Builds the `LIKE` pattern for a name search.
///
/// `None` and the empty string match everything. `%`, `_` and `\` in the search text are
/// escaped so they match literally.
pub fn search_pattern(search: Option<&str>) -> String {
    match search {
        Some(s) if !s.is_empty() => {
            let mut pattern = String::with_capacity(s.len() + 2);
            pattern.push('%');
            for c in s.chars() {
                if matches!(c, '%' | '_' | '\\') {
                    pattern.push('\\');
                }
                pattern.push(c);
            }
            pattern.push('%');
            pattern
        }
        _ => "%".to_string(),
    }
}

fn conflict_or(e: sqlx::Error, nombre: &str) -> StoreError {
    match StoreError::from(e) {
        StoreError::Conflict(_) => StoreError::Conflict(nombre.to_string()),
        other => other,
    }
}

/// Lists recipes whose name contains `search`, ordered by id.
///
/// # Arguments
/// * `conn` - PostgreSQL session or transaction
/// * `search` - Optional substring of the recipe name
pub async fn list(conn: &mut PgConnection, search: Option<&str>) -> SqlResult<Vec<Recipe>> {
    sqlx::query_as::<_, Recipe>(
        r#"
        SELECT id, nombre, ingredientes, instrucciones
        FROM recetas
        WHERE nombre LIKE $1 ESCAPE '\'
        ORDER BY id ASC
        "#,
    )
    .bind(search_pattern(search))
    .fetch_all(&mut *conn)
    .await
    .map_err(StoreError::from)
}

/// Retrieves a recipe by id.
///
/// # Returns
/// * `Ok(Some(Recipe))` - Recipe found
/// * `Ok(None)` - Recipe not found
/// * `Err(StoreError)` - Database error
pub async fn get(conn: &mut PgConnection, id: i64) -> SqlResult<Option<Recipe>> {
    sqlx::query_as::<_, Recipe>(
        r#"
        SELECT id, nombre, ingredientes, instrucciones
        FROM recetas
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(StoreError::from)
}

/// Inserts a recipe and returns the id the database assigned.
///
/// # Returns
/// * `Ok(i64)` - The new id
/// * `Err(StoreError::Conflict)` - A recipe with this name exists
/// * `Err(StoreError)` - Database error
pub async fn create(conn: &mut PgConnection, fields: &RecipeFields) -> SqlResult<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO recetas (nombre, ingredientes, instrucciones)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(&fields.nombre)
    .bind(&fields.ingredientes)
    .bind(&fields.instrucciones)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| conflict_or(e, &fields.nombre))
}

/// Replaces all content fields of a recipe.
///
/// # Returns
/// * `Ok(true)` - Recipe existed and was updated
/// * `Ok(false)` - Recipe did not exist
/// * `Err(StoreError::Conflict)` - Another recipe already uses the new name
pub async fn update(conn: &mut PgConnection, id: i64, fields: &RecipeFields) -> SqlResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE recetas
        SET nombre = $1, ingredientes = $2, instrucciones = $3
        WHERE id = $4
        "#,
    )
    .bind(&fields.nombre)
    .bind(&fields.ingredientes)
    .bind(&fields.instrucciones)
    .bind(id)
    .execute(&mut *conn)
    .await
    .map_err(|e| conflict_or(e, &fields.nombre))?;

    Ok(result.rows_affected() > 0)
}

/// Deletes a recipe.
///
/// # Returns
/// * `Ok(true)` - Recipe existed and was deleted
/// * `Ok(false)` - Recipe did not exist
pub async fn delete(conn: &mut PgConnection, id: i64) -> SqlResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM recetas
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await
    .map_err(StoreError::from)?;

    Ok(result.rows_affected() > 0)
}
