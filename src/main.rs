use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use subway_lines::{
    cli::{self, Cli},
    network::MemoryNetwork,
};

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let now = std::time::Instant::now();
    let mut network = MemoryNetwork::load_or_default(&args.data)?;
    debug!(path = %args.data.display(), elapsed = ?now.elapsed(), "Loaded network");

    let changed = cli::run(&mut network, args.command, &mut io::stdout().lock())?;
    if changed {
        network.save(&args.data)?;
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
