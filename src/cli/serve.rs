use clap::Subcommand;

#[derive(Subcommand)]
pub enum ServeCommands {
    /// Serve GraphQL over HTTP with WebSocket subscriptions
    Http {
        /// Port to listen on
        #[arg(short, long, env = "PHONEBOOK_PORT", default_value = "4000")]
        port: u16,

        /// Host to bind to
        #[arg(long, env = "PHONEBOOK_HOST", default_value = "127.0.0.1")]
        host: String,
    },
}
