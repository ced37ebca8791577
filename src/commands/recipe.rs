//! # Recipe Command Handler
//!
//! Handles `list`, `get`, `create`, `update` and `delete`.

use crate::cli_utils;
use crate::http_utils::{self, RecetasClient};
use crate::recipe::RecipeRequest;

/// Usage text for the recipe commands.
pub const RECIPE_USAGE: &str = r#"Commands:
  list [search]                                         List recipes, optionally filtered by name
  get <id>                                              Show one recipe
  create <nombre> <ingredientes> <instrucciones>        Create a recipe
  update <id> <nombre> <ingredientes> <instrucciones>   Replace a recipe
  delete <id>                                           Delete a recipe"#;

/// Dispatches one CLI command.
///
/// # Arguments
/// * `args` - Command arguments (first element is the command name)
/// * `client` - HTTP client for API communication
pub async fn handle_recipe_command(args: &[String], client: &RecetasClient) {
    let Some(command) = args.first() else {
        cli_utils::exit_with_usage_error("No command specified", RECIPE_USAGE);
    };
    let rest = &args[1..];

    match command.as_str() {
        "list" => handle_list(rest, client).await,
        "get" => handle_get(rest, client).await,
        "create" => handle_create(rest, client).await,
        "update" => handle_update(rest, client).await,
        "delete" => handle_delete(rest, client).await,
        _ => cli_utils::exit_with_usage_error(
            &format!("Unknown command '{}'", command),
            RECIPE_USAGE,
        ),
    }
}

async fn handle_list(args: &[String], client: &RecetasClient) {
    if args.len() > 1 {
        cli_utils::exit_with_usage_error("list takes at most one argument", RECIPE_USAGE);
    }
    let search = args.first().map(String::as_str);
    let response =
        http_utils::execute_or_exit(|| client.list(search), "Failed to list recipes").await;
    cli_utils::print_json_or_exit(&response, "recipe list");
}

async fn handle_get(args: &[String], client: &RecetasClient) {
    cli_utils::expect_args_or_exit(args, 1, "get", RECIPE_USAGE);
    let response = http_utils::execute_or_exit(|| client.get(&args[0]), "Failed to get recipe").await;
    cli_utils::print_json_or_exit(&response, "recipe");
}

async fn handle_create(args: &[String], client: &RecetasClient) {
    cli_utils::expect_args_or_exit(args, 3, "create", RECIPE_USAGE);
    let request = RecipeRequest::new(&args[0], &args[1], &args[2]);
    let response =
        http_utils::execute_or_exit(|| client.create(&request), "Failed to create recipe").await;
    cli_utils::print_json_or_exit(&response, "create response");
}

async fn handle_update(args: &[String], client: &RecetasClient) {
    cli_utils::expect_args_or_exit(args, 4, "update", RECIPE_USAGE);
    let request = RecipeRequest::new(&args[1], &args[2], &args[3]);
    let response = http_utils::execute_or_exit(
        || client.update(&args[0], &request),
        "Failed to update recipe",
    )
    .await;
    cli_utils::print_json_or_exit(&response, "update response");
}

async fn handle_delete(args: &[String], client: &RecetasClient) {
    cli_utils::expect_args_or_exit(args, 1, "delete", RECIPE_USAGE);
    let response =
        http_utils::execute_or_exit(|| client.delete(&args[0]), "Failed to delete recipe").await;
    cli_utils::print_json_or_exit(&response, "delete response");
}
