use crate::error::PipelineError;

/// Mono clip held fully in memory. Samples are nominally in [-1.0, 1.0].
#[derive(Clone, Debug, PartialEq)]
pub struct AudioBuffer {
    pub samples: Vec<f64>,
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Builds a buffer, padding an empty stream to a single silent sample so
    /// every later stage can rely on `len() >= 1`.
    pub fn new(mut samples: Vec<f64>, sample_rate: u32) -> Result<Self, PipelineError> {
        if sample_rate == 0 {
            return Err(PipelineError::InvalidBuffer("sample rate must be positive"));
        }
        if samples.is_empty() {
            samples.push(0.0);
        }
        Ok(Self { samples, sample_rate })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f64 {
        self.samples.iter().map(|s| s.abs()).fold(0.0f64, f64::max)
    }
}
