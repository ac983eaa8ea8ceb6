use std::fmt;
use std::path::{Path, PathBuf};

use crate::audio::buffer::AudioBuffer;
use crate::error::PipelineError;

/// Output quantization scale, one below the input divisor.
pub const I16_OUTPUT_SCALE: f64 = 32767.0;

/// Diagnostics for a written loop asset.
#[derive(Clone, Debug, PartialEq)]
pub struct LoopReport {
    pub output: PathBuf,
    /// |first - last| of the encoded samples, in integer counts
    pub boundary_mismatch: u32,
    /// Peak of the float buffer as a percentage of full scale
    pub peak_percent: f64,
}

impl fmt::Display for LoopReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "✓ Generated {}", self.output.display())?;
        writeln!(f, "  Boundary mismatch: {} counts", self.boundary_mismatch)?;
        write!(f, "  Peak level: {:.1}%", self.peak_percent)
    }
}

/// `round(y * 32767)`. The float-to-int cast saturates, so overshoot clips
/// instead of wrapping.
pub fn quantize(samples: &[f64]) -> Vec<i16> {
    samples
        .iter()
        .map(|&y| (y * I16_OUTPUT_SCALE).round() as i16)
        .collect()
}

pub fn boundary_mismatch(pcm: &[i16]) -> u32 {
    match (pcm.first(), pcm.last()) {
        (Some(&first), Some(&last)) => (first as i32 - last as i32).unsigned_abs(),
        _ => 0,
    }
}

/// Writes `buffer` as mono 16-bit PCM at its own sample rate.
///
/// Samples go to `<output>.part` first and are renamed over `output` only once
/// the header is finalized.
pub fn write_wav(output: &Path, buffer: &AudioBuffer) -> Result<LoopReport, PipelineError> {
    let pcm = quantize(&buffer.samples);
    let write_err = |source: hound::Error| PipelineError::Write {
        path: output.to_path_buf(),
        source,
    };

    let mut partial = output.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let written = write_pcm(&partial, spec, &pcm)
        .and_then(|()| std::fs::rename(&partial, output).map_err(hound::Error::from));

    if let Err(e) = written {
        let _ = std::fs::remove_file(&partial);
        return Err(write_err(e));
    }

    log::info!(
        "Wrote {} samples at {}Hz to {}",
        pcm.len(),
        buffer.sample_rate,
        output.display()
    );

    Ok(LoopReport {
        output: output.to_path_buf(),
        boundary_mismatch: boundary_mismatch(&pcm),
        peak_percent: buffer.peak() * 100.0,
    })
}

fn write_pcm(path: &Path, spec: hound::WavSpec, pcm: &[i16]) -> Result<(), hound::Error> {
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &s in pcm {
        writer.write_sample(s)?;
    }
    writer.finalize()
}
