// src/cli/args.rs
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "archgauge",
    version,
    about = "Architectural quality analyzer for Python projects"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Raise log verbosity (-v info, -vv debug). `RUST_LOG` overrides it.
    #[arg(long, short, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report coupling, cohesion, instability and abstractness per module
    Scan {
        #[arg(value_name = "ROOT", default_value = ".")]
        root: PathBuf,
        /// Emit the project report as JSON
        #[arg(long)]
        json: bool,
        /// Override the coupling decay constant
        #[arg(long, value_name = "K")]
        decay: Option<f64>,
    },
    /// Show LCOM4 and density for each class of a module
    Cohesion {
        #[arg(value_name = "MODULE")]
        module: String,
        #[arg(value_name = "ROOT", default_value = ".")]
        root: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// List in-project dependency edges
    Deps {
        #[arg(value_name = "ROOT", default_value = ".")]
        root: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Find dependency cycles in the project or in a hypothetical map
    Cycles {
        #[arg(value_name = "ROOT", default_value = ".")]
        root: PathBuf,
        /// JSON file holding `{module: [imports]}` to check instead of the project
        #[arg(long, value_name = "FILE")]
        map: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Check that a file imports only allowed in-project modules
    Audit {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long, value_name = "ROOT", default_value = ".")]
        root: PathBuf,
        /// Allowed in-project modules, comma separated
        #[arg(long, value_delimiter = ',')]
        allow: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Dump the flow graph of one file as JSON
    Graph {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}
