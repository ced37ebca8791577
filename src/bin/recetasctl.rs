use arrrg::CommandLine;
use arrrg_derive::CommandLine;

use recetas::{
    cli_utils,
    commands::{handle_recipe_command, recipe::RECIPE_USAGE},
    http_utils::RecetasClient,
};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Options {
    #[arrrg(optional, "Base URL of the recetas API server")]
    base_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (options, free) =
        Options::from_command_line_relaxed("USAGE: recetasctl [--base-url <url>] <command> [args...]");

    if free.is_empty() {
        cli_utils::exit_with_usage_error(
            "No command specified",
            &format!(
                "Usage: recetasctl [--base-url <url>] <command> [args...]\n\n{}",
                RECIPE_USAGE
            ),
        );
    }

    let base_url = if options.base_url.is_empty() {
        "http://localhost:3000".to_string()
    } else {
        options.base_url
    };

    let client = RecetasClient::new(base_url);
    handle_recipe_command(&free, &client).await;

    Ok(())
}
