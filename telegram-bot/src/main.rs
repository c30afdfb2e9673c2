//! Binary for the chat history tracker bot.

use anyhow::Result;
use chronicle_core::init_tracing;
use clap::Parser;
use telegram_bot::{load_config, run_bot, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            init_tracing(&config.log_file)?;
            run_bot(config).await
        }
    }
}
