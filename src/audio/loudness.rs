use super::buffer::AudioBuffer;

/// Rescales the buffer so its peak reaches `target`. Silence is left alone.
///
/// Returns the gain that was applied, or `None` when the buffer was silent.
pub fn normalize_peak(buffer: &mut AudioBuffer, target: f64) -> Option<f64> {
    let peak = buffer.peak();
    if peak <= 0.0 {
        return None;
    }
    let gain = target / peak;
    for s in buffer.samples.iter_mut() {
        *s *= gain;
    }
    Some(gain)
}
