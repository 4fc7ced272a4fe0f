//! phonebook-cli entrypoint

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell as ClapShell};
use std::sync::Arc;

use phonebook::graphql::CurrentUser;
use phonebook::{
    build_schema, create_event_channel, AuthConfig, AuthService, SledStore, Store,
};

mod cli;
use cli::*;

// ══════════════════════════════════════════════════════════════════════════════
// UTILITIES
// ══════════════════════════════════════════════════════════════════════════════

fn expand_path(path: &str) -> String {
    if path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return path.replacen("~", &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

// ══════════════════════════════════════════════════════════════════════════════
// MAIN
// ══════════════════════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.global.log_level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    };
    std::env::set_var("RUST_LOG", log_level);
    tracing_subscriber::fmt::init();

    let db_path = expand_path(&cli.global.db_path);
    let quiet = cli.global.quiet;

    // Ensure parent directory exists
    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let store = Arc::new(SledStore::open(&db_path)?);

    let auth_config = AuthConfig::from_env();
    let auth = AuthService::new(&auth_config.jwt_secret, auth_config.login_password.as_str());

    match cli.command {
        Commands::Serve { command } => {
            handle_serve_command(command, store, auth, quiet).await?;
        }

        Commands::Graphql { command } => {
            handle_graphql_command(command, store, auth).await?;
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let shell = match shell {
                Shell::Bash => ClapShell::Bash,
                Shell::Zsh => ClapShell::Zsh,
                Shell::Fish => ClapShell::Fish,
                Shell::Elvish => ClapShell::Elvish,
                Shell::PowerShell => ClapShell::PowerShell,
            };
            generate(shell, &mut cmd, "phonebook-cli", &mut std::io::stdout());
        }

        Commands::Version => {
            println!("phonebook-cli {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

// ══════════════════════════════════════════════════════════════════════════════
// COMMAND HANDLERS
// ══════════════════════════════════════════════════════════════════════════════

async fn handle_serve_command(
    command: ServeCommands,
    store: Arc<SledStore>,
    auth: AuthService,
    quiet: bool,
) -> Result<()> {
    match command {
        ServeCommands::Http { port, host } => {
            // Notification bus for subscriptions, injected into the app
            let (event_sender, _event_receiver) = create_event_channel(256);

            let app = phonebook::server::app(store, auth, event_sender);

            let addr = format!("{}:{}", host, port);
            if !quiet {
                println!("GraphQL server running at http://{}/graphql", addr);
                println!("WebSocket subscriptions at ws://{}/ws", addr);
                println!("GraphiQL playground at http://{}/graphql", addr);
            }

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app).await?;
        }
    }
    Ok(())
}

async fn handle_graphql_command(
    command: GraphqlCommands,
    store: Arc<SledStore>,
    auth: AuthService,
) -> Result<()> {
    match command {
        GraphqlCommands::Schema { output } => {
            let schema = build_schema(store, auth);
            let sdl = schema.sdl();
            if output == "-" {
                println!("{}", sdl);
            } else {
                std::fs::write(&output, sdl)?;
                println!("Schema written to {}", output);
            }
        }

        GraphqlCommands::Query {
            query,
            variables,
            token,
            pretty,
        } => {
            let schema = build_schema(store.clone(), auth.clone());

            let query_str = if let Some(path) = query.strip_prefix('@') {
                std::fs::read_to_string(path)?
            } else {
                query
            };

            let mut request = async_graphql::Request::new(query_str);

            if let Some(vars) = variables {
                let vars: serde_json::Value = serde_json::from_str(&vars)?;
                request = request.variables(async_graphql::Variables::from_json(vars));
            }

            // One-shot requests authenticate the same way HTTP ones do:
            // token to identity, then a fresh read of the user document.
            let current = token
                .and_then(|t| auth.resolve_identity(&t))
                .and_then(|identity| store.get_user(identity.user_id).ok().flatten());
            request = request.data(CurrentUser(current));

            let response = schema.execute(request).await;
            let output = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{}", output);
        }
    }
    Ok(())
}
