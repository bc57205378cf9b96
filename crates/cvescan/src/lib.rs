//! Pipeline Orchestrator and its supporting CLI/config/report surface — the
//! thin, real-adapter layer built around the core analysis crates
//! (`cvescan-versioning`, `cvescan-advisories`, `cvescan-callgraph`,
//! `cvescan-impact`) so the pipeline is runnable end-to-end from a terminal.

pub mod cli;
pub mod config;
pub mod orchestrator;
pub mod report;
pub mod sources;

pub use config::Config;
pub use orchestrator::{run, RunContext};
pub use report::Report;
