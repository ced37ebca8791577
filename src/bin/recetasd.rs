use std::sync::Arc;

use arrrg::CommandLine;
use arrrg_derive::CommandLine;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use recetas::{DatabaseConfig, PgRecipeStore, ServerConfig, connection, create_app, sql};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Args {
    #[arrrg(optional, "Host to bind the HTTP server")]
    host: Option<String>,
    #[arrrg(optional, "Port to bind the HTTP server")]
    port: Option<u16>,
    #[arrrg(flag, "Skip running embedded migrations at startup")]
    skip_migrations: bool,
    #[arrrg(flag, "Enable verbose logging")]
    verbose: bool,
}

const HELP_TEXT: &str = r#"recetasd - Recipe API daemon

USAGE:
    recetasd [OPTIONS]

OPTIONS:
    --host <HOST>         Host to bind the HTTP server [default: 0.0.0.0]
    --port <PORT>         Port to bind the HTTP server [default: 3000]
    --skip-migrations     Do not run embedded migrations at startup
    --verbose             Enable verbose logging

ENVIRONMENT:
    DB_HOST               Database host [default: localhost]
    DB_PORT               Database port [default: 5432]
    DB_USER               Database user (required)
    DB_PASS               Database password
    DB_SCHEMA             Database name (required)
    DB_MAX_CONNECTIONS    Pool size [default: 10]
    RUST_LOG              Log filter [default: info]

    Variables may also be placed in a .env file in the working directory.

API ENDPOINTS:
    GET    /api/recetas?search=<text>   List recipes, optionally filtered by name
    GET    /api/recetas/{id}            Get a recipe
    POST   /api/recetas                 Create a recipe
    PUT    /api/recetas/{id}            Replace a recipe
    DELETE /api/recetas/{id}            Delete a recipe"#;

fn init_tracing(verbose: bool) {
    let default = if verbose { "recetas=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, free) = Args::from_command_line("USAGE: recetasd [OPTIONS]");

    if !free.is_empty() && free[0] == "help" {
        println!("{}", HELP_TEXT);
        return Ok(());
    }

    dotenvy::dotenv().ok();
    init_tracing(args.verbose);

    let defaults = ServerConfig::default();
    let server_config = ServerConfig {
        host: args.host.unwrap_or(defaults.host),
        port: args.port.unwrap_or(defaults.port),
        body_limit: defaults.body_limit,
    };
    let db_config = DatabaseConfig::from_env()?;
    tracing::debug!(config = ?db_config, "database configuration loaded");

    let pool = connection::connect(&db_config).await?;
    if !args.skip_migrations {
        sql::MIGRATOR.run(&pool).await?;
        tracing::info!("migrations applied");
    }

    let store = Arc::new(PgRecipeStore::new(pool.clone()));
    let app = create_app(store, &server_config);

    let addr = server_config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    println!("🚀 recetasd started");
    println!("📡 Server listening on: http://{}", addr);
    println!("🗄️  Database: {}:{}/{}", db_config.host, db_config.port, db_config.schema);
    println!("💡 Use Ctrl+C for graceful shutdown");
    println!();

    let shutdown_signal = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        println!();
        println!("🛑 Shutdown signal received, stopping server gracefully...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    pool.close().await;
    println!("👋 recetasd stopped");

    Ok(())
}
