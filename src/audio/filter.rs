use super::buffer::AudioBuffer;
use super::spectral::SpectralFrame;

/// Per-bin real gains of the high-pass shaping curve.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterCurve {
    pub gains: Vec<f64>,
}

/// Subtracts the mean from every sample. Returns the removed offset.
pub fn remove_dc(buffer: &mut AudioBuffer) -> f64 {
    let mean = buffer.samples.iter().sum::<f64>() / buffer.len() as f64;
    for s in buffer.samples.iter_mut() {
        *s -= mean;
    }
    mean
}

/// Butterworth-style high-pass magnitude, `1 / sqrt(1 + (fc / f)^(2n))`.
///
/// The formula is singular at 0 Hz, so the DC bin is pinned to exactly zero.
pub fn highpass_gain(freq: f64, cutoff_hz: f64, order: u32) -> f64 {
    if freq <= 0.0 {
        return 0.0;
    }
    let ratio = (cutoff_hz / freq).powi(2 * order as i32);
    1.0 / (1.0 + ratio).sqrt()
}

pub fn highpass_curve(frequencies: &[f64], cutoff_hz: f64, order: u32) -> FilterCurve {
    let mut gains: Vec<f64> = frequencies
        .iter()
        .map(|&f| highpass_gain(f, cutoff_hz, order))
        .collect();
    if let Some(dc) = gains.first_mut() {
        *dc = 0.0;
    }
    FilterCurve { gains }
}

/// Scales each coefficient by its gain. A real factor leaves phase intact.
pub fn attenuate(frame: &mut SpectralFrame, curve: &FilterCurve) {
    assert_eq!(
        frame.bins.len(),
        curve.gains.len(),
        "filter curve does not match spectral frame"
    );
    for (bin, &gain) in frame.bins.iter_mut().zip(curve.gains.iter()) {
        *bin *= gain;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::spectral;

    const FC: f64 = 300.0;

    #[test]
    fn dc_removal_centers_signal() {
        let mut buffer = AudioBuffer::new(vec![1.0, 2.0, 3.0, 6.0], 8000).unwrap();
        let offset = remove_dc(&mut buffer);
        assert_eq!(offset, 3.0);
        assert_eq!(buffer.samples, vec![-2.0, -1.0, 0.0, 3.0]);
    }

    #[test]
    fn constant_signal_becomes_silence() {
        let mut buffer = AudioBuffer::new(vec![0.25; 480], 48000).unwrap();
        remove_dc(&mut buffer);
        assert!(buffer.samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn gain_curve_shape() {
        assert_eq!(highpass_gain(0.0, FC, 4), 0.0);
        assert!((highpass_gain(FC, FC, 4) - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert!(highpass_gain(30.0, FC, 4) < 1e-3);
        assert!(highpass_gain(3000.0, FC, 4) > 0.999_999);
        assert!(highpass_gain(440.0, FC, 4) > 0.95);
    }

    #[test]
    fn curve_is_monotonic_and_bounded() {
        let freqs = spectral::frequency_map(4800, 48000);
        let curve = highpass_curve(&freqs, FC, 4);
        assert_eq!(curve.gains.len(), freqs.len());
        assert_eq!(curve.gains[0], 0.0);
        for pair in curve.gains.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert!(curve.gains.iter().all(|&g| (0.0..=1.0).contains(&g)));
    }

    #[test]
    fn attenuation_blocks_dc_and_preserves_phase() {
        let samples: Vec<f64> = (0..960)
            .map(|i| 0.3 + 0.5 * (2.0 * std::f64::consts::PI * 1000.0 * i as f64 / 48000.0).sin())
            .collect();
        let buffer = AudioBuffer::new(samples, 48000).unwrap();
        let mut frame = spectral::forward(&buffer);
        let before = frame.bins.clone();
        let curve = highpass_curve(&frame.frequencies, FC, 4);
        attenuate(&mut frame, &curve);

        assert_eq!(frame.bins[0].norm(), 0.0);
        // 1 kHz sits at bin 20 of a 960-point frame
        let (a, b) = (before[20], frame.bins[20]);
        assert!(b.norm() > 0.0);
        assert!((a.arg() - b.arg()).abs() < 1e-12);
        assert!((b.norm() / a.norm() - curve.gains[20]).abs() < 1e-12);
    }
}
