use anyhow::Result;
use clap::Parser;
use cvescan::cli::{Cli, Commands};
use cvescan::config::Config;
use cvescan::orchestrator::{run, RunContext};
use std::path::PathBuf;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { path, config, api_key, out } => {
            let config_path = config.unwrap_or_else(|| PathBuf::from("cvescan.toml"));
            let cfg = Config::load_or_default(&config_path);
            let ctx = RunContext::new(&cfg, api_key);

            let report = run(&path, &ctx).await?;
            let json = serde_json::to_string_pretty(&report)?;

            match out {
                Some(path) => std::fs::write(&path, json)?,
                None => println!("{json}"),
            }
            Ok(())
        }
    }
}
