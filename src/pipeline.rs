use std::path::Path;

use crate::audio::buffer::AudioBuffer;
use crate::audio::envelope::Envelope;
use crate::audio::{decode, filter, loudness, spectral};
use crate::encode::wav::{self, LoopReport};
use crate::error::PipelineError;

pub const DEFAULT_CUTOFF_HZ: f64 = 300.0;
pub const DEFAULT_ORDER: u32 = 4;
pub const DEFAULT_FADE_SECONDS: f64 = 0.003;
pub const DEFAULT_TARGET_PEAK: f64 = 0.98;

/// Fixed design parameters of the loop-asset filter.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    /// High-pass corner frequency in Hz
    pub cutoff_hz: f64,
    /// Butterworth order of the magnitude curve
    pub order: u32,
    /// Length of each boundary fade
    pub fade_seconds: f64,
    /// Peak level after normalization, as a fraction of full scale
    pub target_peak: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cutoff_hz: DEFAULT_CUTOFF_HZ,
            order: DEFAULT_ORDER,
            fade_seconds: DEFAULT_FADE_SECONDS,
            target_peak: DEFAULT_TARGET_PEAK,
        }
    }
}

/// Decodes `input`, filters it into a loopable clip and writes `output`.
///
/// The input is fully loaded before `output` is touched, so a bad input never
/// leaves a file behind.
pub fn run(input: &Path, output: &Path, config: &PipelineConfig) -> Result<LoopReport, PipelineError> {
    log::info!("Decoding {}...", input.display());
    let buffer = decode::load_wav(input)?;

    let buffer = process(buffer, config);

    log::info!("Encoding {}...", output.display());
    wav::write_wav(output, &buffer)
}

/// In-memory part of the pipeline: DC removal through loudness normalization.
pub fn process(mut buffer: AudioBuffer, config: &PipelineConfig) -> AudioBuffer {
    let offset = filter::remove_dc(&mut buffer);
    log::info!("Removed DC offset {:+.6}", offset);

    let mut frame = spectral::forward(&buffer);
    let curve = filter::highpass_curve(&frame.frequencies, config.cutoff_hz, config.order);
    filter::attenuate(&mut frame, &curve);
    log::info!(
        "High-pass {:.1}Hz order {} over {} bins",
        config.cutoff_hz,
        config.order,
        frame.num_bins()
    );

    buffer.samples = spectral::inverse(&frame);
    debug_assert_eq!(buffer.len(), frame.len);

    let envelope = Envelope::new(buffer.sample_rate, config.fade_seconds);
    let fade_len = envelope.apply(&mut buffer);
    log::info!("Boundary fade: {} samples", fade_len);

    match loudness::normalize_peak(&mut buffer, config.target_peak) {
        Some(gain) => log::info!("Normalized to {:.2} peak (gain {:.4})", config.target_peak, gain),
        None => log::info!("Silent signal, normalization skipped"),
    }

    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use std::path::PathBuf;

    fn tone(freq: f64, amplitude: f64, sample_rate: u32, seconds: f64) -> AudioBuffer {
        let n = (sample_rate as f64 * seconds) as usize;
        let samples = (0..n)
            .map(|i| amplitude * (2.0 * PI * freq * i as f64 / sample_rate as f64).sin())
            .collect();
        AudioBuffer::new(samples, sample_rate).unwrap()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("engine-loop-pipeline-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn defaults_are_the_fixed_design() {
        let config = PipelineConfig::default();
        assert_eq!(config.cutoff_hz, 300.0);
        assert_eq!(config.order, 4);
        assert_eq!(config.fade_seconds, 0.003);
        assert_eq!(config.target_peak, 0.98);
    }

    #[test]
    fn tone_above_cutoff_loops_cleanly() {
        let out = process(tone(440.0, 0.5, 48000, 1.0), &PipelineConfig::default());
        assert_eq!(out.len(), 48000);
        assert_eq!(out.sample_rate, 48000);
        assert!((out.peak() - 0.98).abs() < 1e-9);

        let pcm = wav::quantize(&out.samples);
        assert!(wav::boundary_mismatch(&pcm) < 10);
    }

    #[test]
    fn filtered_spectrum_has_no_dc() {
        let mut buffer = tone(440.0, 0.5, 48000, 0.25);
        for s in buffer.samples.iter_mut() {
            *s += 0.2;
        }
        filter::remove_dc(&mut buffer);
        let mut frame = spectral::forward(&buffer);
        let curve = filter::highpass_curve(&frame.frequencies, DEFAULT_CUTOFF_HZ, DEFAULT_ORDER);
        filter::attenuate(&mut frame, &curve);
        assert_eq!(frame.bins[0].norm(), 0.0);
    }

    #[test]
    fn low_rumble_is_suppressed() {
        let mut mix = tone(40.0, 0.5, 8000, 1.0);
        let high = tone(2000.0, 0.1, 8000, 1.0);
        for (a, b) in mix.samples.iter_mut().zip(high.samples.iter()) {
            *a += b;
        }
        let out = process(mix, &PipelineConfig::default());
        let frame = spectral::forward(&out);
        // 1 Hz per bin at one second
        assert!(frame.bins[40].norm() < frame.bins[2000].norm() * 1e-2);
    }

    #[test]
    fn constant_input_produces_silence() {
        // a decoded 16-bit level, so the mean is exact
        let buffer = AudioBuffer::new(vec![-12000.0 / 32768.0; 4800], 48000).unwrap();

        let mut centered = buffer.clone();
        filter::remove_dc(&mut centered);
        assert!(centered.samples.iter().all(|&s| s == 0.0));
        assert!(spectral::forward(&centered).bins.iter().all(|c| c.norm() == 0.0));

        let out = process(buffer, &PipelineConfig::default());
        assert!(out.samples.iter().all(|&s| s.abs() < 1e-12));
        assert!(wav::quantize(&out.samples).iter().all(|&s| s == 0));
    }

    #[test]
    fn single_sample_survives() {
        let buffer = AudioBuffer::new(vec![0.4], 44100).unwrap();
        let out = process(buffer, &PipelineConfig::default());
        assert_eq!(out.samples, vec![0.0]);
    }

    #[test]
    fn all_pass_round_trip_is_identity() {
        let original = tone(1234.5, 0.7, 44100, 0.1);
        let mut frame = spectral::forward(&original);
        let all_pass = filter::FilterCurve {
            gains: vec![1.0; frame.num_bins()],
        };
        filter::attenuate(&mut frame, &all_pass);
        let restored = spectral::inverse(&frame);
        for (a, b) in original.samples.iter().zip(restored.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn run_writes_loop_asset() {
        let dir = scratch_dir("run");
        let input = dir.join("raw.wav");
        let output = dir.join("loop.wav");

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&input, spec).unwrap();
        for s in tone(440.0, 0.5, 48000, 1.0).samples {
            writer.write_sample((s * 32767.0).round() as i16).unwrap();
        }
        writer.finalize().unwrap();

        let report = run(&input, &output, &PipelineConfig::default()).unwrap();
        assert_eq!(report.output, output);
        assert!(report.boundary_mismatch < 10);
        assert!((report.peak_percent - 98.0).abs() < 1e-6);

        let reader = hound::WavReader::open(&output).unwrap();
        assert_eq!(reader.spec().sample_rate, 48000);
        assert_eq!(reader.len(), 48000);
    }

    #[test]
    fn missing_input_writes_nothing() {
        let dir = scratch_dir("missing");
        let input = dir.join("nope.wav");
        let output = dir.join("never.wav");
        let err = run(&input, &output, &PipelineConfig::default()).unwrap_err();
        assert!(err.to_string().contains("nope.wav"));
        assert!(!output.exists());
    }
}
