use anyhow::Result;
use clap::Parser;
use debugfile::Cli;

fn main() -> Result<()> {
    // stdout carries launch configurations, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    Cli::parse().execute()
}
