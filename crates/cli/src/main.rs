// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! pitwall - update daemon CLI

mod client;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::client::UpdateClient;

#[derive(Parser)]
#[command(
    name = "pitwall",
    version,
    about = "Remote update trigger for pitwall deployments"
)]
struct Cli {
    /// Daemon WebSocket URL
    #[arg(long, global = true, default_value_t = client::default_url())]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trigger an update and stream progress until it finishes
    Update,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Update => {
            let client = UpdateClient::new(cli.url);
            client.update(&mut std::io::stdout()).await?;
            println!("Update complete");
        }
    }

    Ok(())
}
