mod cli;
mod config;
mod logging;
mod render;
mod session;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    session::run(cli::Cli::parse()).await
}
