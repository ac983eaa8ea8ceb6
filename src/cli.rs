use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "engine-loop",
    version,
    about = "Turns a raw engine recording into a high-passed, click-free, normalized loop"
)]
pub struct Cli {
    /// Input WAV file (mono, 16-bit PCM)
    pub input: PathBuf,

    /// Output WAV file
    pub output: PathBuf,

    /// TOML file overriding the filter parameters
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log stage details
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}
