use super::buffer::AudioBuffer;

/// Linear fade-in/fade-out applied to the head and tail of a clip so it can
/// loop without a click.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    /// Requested ramp length in samples, `floor(sample_rate * seconds)`
    pub fade_len: usize,
}

impl Envelope {
    pub fn new(sample_rate: u32, fade_seconds: f64) -> Self {
        let fade_len = (sample_rate as f64 * fade_seconds).floor().max(0.0) as usize;
        Self { fade_len }
    }

    /// Rising ramp 0 -> 1 over `len` evenly spaced points, endpoints included.
    pub fn fade_in(len: usize) -> Vec<f64> {
        linspace(0.0, 1.0, len)
    }

    /// Falling ramp 1 -> 0, the mirror of [`Envelope::fade_in`].
    pub fn fade_out(len: usize) -> Vec<f64> {
        linspace(1.0, 0.0, len)
    }

    /// Ramp length actually used for a buffer of `n` samples. Clamped to half
    /// the buffer so the two windows never overlap.
    pub fn effective_len(&self, n: usize) -> usize {
        self.fade_len.min(n / 2)
    }

    /// Applies the fade-in then the fade-out in place. Returns the ramp length used.
    pub fn apply(&self, buffer: &mut AudioBuffer) -> usize {
        let n = buffer.len();
        let len = self.effective_len(n);
        if len < self.fade_len {
            log::debug!(
                "Fade window clamped from {} to {} samples (buffer has {})",
                self.fade_len,
                len,
                n
            );
        }
        if len == 0 {
            return 0;
        }

        for (s, g) in buffer.samples[..len].iter_mut().zip(Self::fade_in(len)) {
            *s *= g;
        }
        for (s, g) in buffer.samples[n - len..].iter_mut().zip(Self::fade_out(len)) {
            *s *= g;
        }
        len
    }
}

/// `len` evenly spaced points from `start` to `stop`. The last point is exactly
/// `stop`; a single point is `start`.
fn linspace(start: f64, stop: f64, len: usize) -> Vec<f64> {
    match len {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (len - 1) as f64;
            let mut ramp: Vec<f64> = (0..len).map(|i| start + i as f64 * step).collect();
            ramp[len - 1] = stop;
            ramp
        }
    }
}
