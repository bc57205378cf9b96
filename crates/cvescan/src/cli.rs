use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cvescan", version, about = "Which functions are reachable from known-vulnerable third-party libraries?")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a C/C++ project tree and emit a vulnerability-impact report.
    Scan {
        /// Root of the already-extracted project tree to analyze.
        path: PathBuf,

        /// Path to a `cvescan.toml` config file. Defaults to `./cvescan.toml`
        /// if present, otherwise built-in defaults.
        #[arg(long)]
        config: Option<PathBuf>,

        /// NVD API key; overrides `[nvd].api_key` from the config file.
        #[arg(long)]
        api_key: Option<String>,

        /// Where to write the JSON report. Defaults to stdout.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}
