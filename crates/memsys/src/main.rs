//! memsys - Memory System CLI
//!
//! Signs in against memsys-server, keeps the session on disk and checks the
//! access guard locally before each request.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod cli;
mod commands;
mod config;
mod error;

use cli::{Cli, Commands};
use commands::Context;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("memsys=warn".parse()?))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = config::Config::resolve(&cli.api_url, cli.data_dir)?;
    let ctx = Context::new(config);

    // Execute command
    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&ctx, email, password).await,
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Whoami => commands::auth::whoami(&ctx),
        Commands::Events(cmd) => commands::events::execute(cmd.action, &ctx).await,
        Commands::Report { event_id } => commands::report::show(&ctx, &event_id).await,
        Commands::Reports => commands::report::list(&ctx).await,
        Commands::Feedback(cmd) => commands::feedback::execute(cmd.action, &ctx).await,
    }
}
