// src/bin/archgauge.rs
use clap::Parser;
use tracing_subscriber::EnvFilter;

use archgauge_core::cli::{self, Cli};
use archgauge_core::exit::ArchGaugeExit;

fn main() -> ArchGaugeExit {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    ArchGaugeExit::from(cli::dispatch(&cli))
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
