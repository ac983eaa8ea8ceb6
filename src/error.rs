use std::path::PathBuf;

/// Errors raised by the loop-asset pipeline.
///
/// `Open`, `Decode` and `UnsupportedFormat` all happen while loading the input,
/// before any transform runs and before the output path is touched.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to open input {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode input {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: symphonia::core::errors::Error,
    },
    #[error("unsupported input {}: {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },
    #[error("invalid audio buffer: {0}")]
    InvalidBuffer(&'static str),
    #[error("failed to write output {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
