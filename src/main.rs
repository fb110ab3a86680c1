use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use whatsend::cli::Cli;

fn main() -> Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Run the main application logic from the library
    if let Err(e) = whatsend::run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
