//! PostgreSQL statements for recipes.
//!
//! Functions here take a borrowed connection (a pooled session or an open transaction) and
//! run parameterized SQL against the `recetas` table. Session lifetime is the caller's concern.

/// Recipe operations on the `recetas` table.
pub mod recipe;

/// Schema migrations from `migrations/`, embedded at compile time.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
