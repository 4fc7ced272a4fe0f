use clap::Subcommand;

#[derive(Subcommand)]
pub enum GraphqlCommands {
    /// Print the schema SDL
    Schema {
        /// Output file (- for stdout)
        #[arg(default_value = "-")]
        output: String,
    },

    /// Execute a one-shot query against the local store
    Query {
        /// Query string, or @file to read from a file
        query: String,

        /// Query variables as a JSON object
        #[arg(short, long)]
        variables: Option<String>,

        /// Bearer token to execute as an authenticated user
        #[arg(short, long)]
        token: Option<String>,

        /// Pretty print the response
        #[arg(short, long)]
        pretty: bool,
    },
}
