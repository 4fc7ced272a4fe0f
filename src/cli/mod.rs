mod serve;
mod graphql;

pub use serve::ServeCommands;
pub use graphql::GraphqlCommands;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ══════════════════════════════════════════════════════════════════════════════
// GLOBAL OPTIONS
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Parser)]
#[command(name = "phonebook-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "GraphQL phonebook and library catalogue over a local document store")]
#[command(long_about = r#"
phonebook-cli serves a GraphQL API over persons, users, authors and books,
persisted in an embedded document store.

EXAMPLES:
  # Start the GraphQL server
  phonebook-cli serve http --port 4000

  # Print the schema SDL
  phonebook-cli graphql schema

  # Run a one-shot query against the local store
  phonebook-cli graphql query '{ personCount }'

ENVIRONMENT VARIABLES:
  PHONEBOOK_DB          Database path (default: ~/.local/share/phonebook/db)
  PHONEBOOK_LOG         Log level (trace, debug, info, warn, error)
  PHONEBOOK_HOST        Server host (default: 127.0.0.1)
  PHONEBOOK_PORT        Server port (default: 4000)
  PHONEBOOK_JWT_SECRET  Token signing key (required for a served instance)
  PHONEBOOK_PASSWORD    Shared login password (default: "secret")
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalOptions {
    /// Path to the document database
    #[arg(short, long, env = "PHONEBOOK_DB", global = true)]
    #[arg(default_value = "~/.local/share/phonebook/db")]
    pub db_path: String,

    /// Log level
    #[arg(short, long, env = "PHONEBOOK_LOG", global = true)]
    #[arg(value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

// ══════════════════════════════════════════════════════════════════════════════
// VALUE ENUMS
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Elvish,
    PowerShell,
}

// ══════════════════════════════════════════════════════════════════════════════
// COMMANDS
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Subcommand)]
pub enum Commands {
    /// Start the GraphQL server
    #[command(visible_alias = "srv")]
    Serve {
        #[command(subcommand)]
        command: ServeCommands,
    },

    /// GraphQL operations against the local store
    #[command(visible_alias = "gql")]
    Graphql {
        #[command(subcommand)]
        command: GraphqlCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print version information
    Version,
}
