mod audio;
mod cli;
mod config;
mod encode;
mod error;
mod pipeline;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;

use cli::Cli;
use pipeline::PipelineConfig;

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            std::process::exit(1);
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.default_log_filter()))
        .format_timestamp_millis()
        .init();

    // Parameters only change when a config file is passed explicitly
    let params = match cli.config {
        Some(ref path) => match config::load_config(path) {
            Ok(params) => {
                log::info!("Loaded config from {}", path.display());
                params
            }
            Err(err) => {
                log::warn!("Ignoring config {}: {:#}", path.display(), err);
                PipelineConfig::default()
            }
        },
        None => PipelineConfig::default(),
    };

    log::info!("engine-loop - loop asset filter");
    log::info!("Input: {}", cli.input.display());
    log::info!("Output: {}", cli.output.display());
    log::debug!("Parameters: {:?}", params);

    let report = pipeline::run(&cli.input, &cli.output, &params)
        .with_context(|| format!("Failed to build loop from {}", cli.input.display()))?;

    println!("{}", report);
    Ok(())
}
