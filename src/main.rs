mod cli;
mod application;
mod domain;
mod data;
mod vocab;
mod infra;

use anyhow::Result;
use cli::Cli;
use clap::Parser;
use tracing_subscriber::filter::Directive;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let directive: Directive = if cli.debug() {
        "squad_prepro=debug".parse()?
    } else {
        "squad_prepro=info".parse()?
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(directive),
        )
        .init();

    cli.run()
}
