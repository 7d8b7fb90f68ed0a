use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use termexam::bootstrap;
use termexam::cli::Cli;
use termexam::tui;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = bootstrap::resolve_data_dir(&cli);
    init_logging(&data_dir)?;

    let boot = bootstrap::bootstrap(&cli, &data_dir)?;
    tui::run_tui(boot.session, boot.service)
}

/// The TUI owns the terminal, so logs go to a file under the data dir.
fn init_logging(data_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(data_dir)?;
    let file = std::fs::File::create(data_dir.join("termexam.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
