// src/cli/mod.rs
//! CLI command handlers.

pub mod args;
pub mod handlers;

pub use args::{Cli, Commands};

use crate::exit::ArchGaugeExit;
use anyhow::Result;

/// Routes a parsed command line to its handler.
///
/// # Errors
/// Returns error if the selected command fails to run.
pub fn dispatch(cli: &Cli) -> Result<ArchGaugeExit> {
    match &cli.command {
        Commands::Scan { root, json, decay } => handlers::handle_scan(root, *json, *decay),
        Commands::Cohesion { module, root, json } => handlers::handle_cohesion(module, root, *json),
        Commands::Deps { root, json } => handlers::handle_deps(root, *json),
        Commands::Cycles { root, map, json } => handlers::handle_cycles(root, map.as_deref(), *json),
        Commands::Audit {
            file,
            root,
            allow,
            json,
        } => handlers::handle_audit(file, root, allow, *json),
        Commands::Graph { file } => handlers::handle_graph(file),
    }
}
