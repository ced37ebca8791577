//! # Command Handlers
//!
//! Command handlers for the `recetasctl` CLI. Each handler validates its arguments, issues one
//! request through [`crate::http_utils::RecetasClient`], and prints the JSON response.

pub mod recipe;

pub use recipe::handle_recipe_command;
