use rustfft::{num_complex::Complex, FftPlanner};

use super::buffer::AudioBuffer;

/// Non-negative half of a real signal's spectrum.
#[derive(Clone, Debug)]
pub struct SpectralFrame {
    /// floor(len / 2) + 1 coefficients, unnormalized
    pub bins: Vec<Complex<f64>>,
    /// Center frequency of each bin in Hz (bin 0 is exactly 0 Hz)
    pub frequencies: Vec<f64>,
    /// Time-domain length the frame was computed from
    pub len: usize,
}

impl SpectralFrame {
    pub fn num_bins(&self) -> usize {
        self.bins.len()
    }
}

/// Bin-to-frequency map for an `n`-point real transform, `k * sample_rate / n`.
pub fn frequency_map(n: usize, sample_rate: u32) -> Vec<f64> {
    let sr = sample_rate as f64;
    (0..n / 2 + 1).map(|k| k as f64 * sr / n as f64).collect()
}

/// Forward real DFT. Works for any length; the planner picks mixed-radix or
/// Bluestein depending on the factors of `n`.
pub fn forward(buffer: &AudioBuffer) -> SpectralFrame {
    let n = buffer.len();
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);

    let mut scratch: Vec<Complex<f64>> = buffer
        .samples
        .iter()
        .map(|&s| Complex::new(s, 0.0))
        .collect();
    fft.process(&mut scratch);
    scratch.truncate(n / 2 + 1);

    SpectralFrame {
        bins: scratch,
        frequencies: frequency_map(n, buffer.sample_rate),
        len: n,
    }
}

/// Inverse real DFT back to exactly `frame.len` samples.
///
/// The negative-frequency half is rebuilt as the conjugate mirror. Imaginary
/// parts of the DC bin and, for even lengths, the Nyquist bin cannot exist in a
/// real signal and are dropped.
pub fn inverse(frame: &SpectralFrame) -> Vec<f64> {
    let n = frame.len;
    assert_eq!(frame.bins.len(), n / 2 + 1, "spectral frame does not match its length");

    let mut full = vec![Complex::new(0.0, 0.0); n];
    full[..frame.bins.len()].copy_from_slice(&frame.bins);
    full[0].im = 0.0;
    if n % 2 == 0 && n > 1 {
        full[n / 2].im = 0.0;
    }
    for k in 1..(n + 1) / 2 {
        full[n - k] = full[k].conj();
    }

    let mut planner = FftPlanner::<f64>::new();
    let ifft = planner.plan_fft_inverse(n);
    ifft.process(&mut full);

    // rustfft leaves the inverse unnormalized
    let scale = 1.0 / n as f64;
    full.iter().map(|c| c.re * scale).collect()
}
