//! # chunkguard command-line entry point
//!
//! ```bash
//! chunkguard check --dataset era5.json --chunks time=24,latitude=721,longitude=1440
//! chunkguard check --dataset era5.json --chunks-file plan.json --json
//! chunkguard config set-max-chunk-bytes 536870912
//! ```
//!
//! Oversized chunks are reported as warnings on stderr and do not change the
//! exit status. A plan naming an unknown dimension, or an unreadable input,
//! exits non-zero.

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Reports go to stdout

mod cli;

use clap::Parser as _;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let settings_path = cli.settings_path();
    let (settings, load_error) = match chunkguard::config::load_config_from(&settings_path) {
        Ok(settings) => (settings, None),
        Err(e) => (chunkguard::config::GuardSettings::default(), Some(e)),
    };

    chunkguard::logging::init(settings.log_dir.as_deref())?;

    // Reported only now that a subscriber is installed
    if let Some(e) = load_error {
        tracing::warn!("Ignoring unreadable settings file, using defaults: {e:#}");
    }

    cli::run_command(cli.command, &settings_path, settings)?;
    Ok(())
}
