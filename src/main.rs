// sso-status - AWS SSO session status for the menu bar

mod auth;
mod aws_config;
mod cli;
mod config;
mod error;
mod expiry;
mod menu;
mod models;
mod preferences;
mod profile_store;
mod session;

use clap::error::ErrorKind;
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Mutex;

fn main() {
    // Unrecognized arguments fall back to the status poll; the host only
    // understands what we print, never the exit code.
    let (args, parse_error) = match cli::Cli::try_parse() {
        Ok(args) => (args, None),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return;
        }
        Err(e) => (cli::Cli::default(), Some(e)),
    };

    init_tracing(args.verbose);

    if let Some(e) = parse_error {
        tracing::warn!("Ignoring arguments: {}", e.kind());
    }

    if let Err(e) = cli::execute(args) {
        tracing::error!("{}", e);
    }
}

fn init_tracing(verbose: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    let filter = || {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into())
    };

    // stdout belongs to the menu bar host, so logs go to a file
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("/tmp"))
        .join("sso-status");
    let _ = std::fs::create_dir_all(&log_dir);

    match OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("sso-status.log"))
    {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init(),
    }
}
