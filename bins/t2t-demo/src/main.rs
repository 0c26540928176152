mod cmd;
mod config;
mod error;

use clap::Parser;
use config::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let result = cli.transformer().and_then(|t| match cli.command {
        Commands::Data => cmd::data::run(&t),
        Commands::Json(args) => cmd::json::run(&t, args),
        Commands::Record => cmd::record::run(&t),
    });
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
