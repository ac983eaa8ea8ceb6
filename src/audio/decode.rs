use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL, CODEC_TYPE_PCM_S16LE};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::buffer::AudioBuffer;
use crate::error::PipelineError;

/// Full-scale divisor for 16-bit input: -32768 maps to exactly -1.0.
pub const I16_INPUT_SCALE: f64 = 32768.0;

/// Loads a mono 16-bit PCM WAV into an [`AudioBuffer`].
pub fn load_wav(path: &Path) -> Result<AudioBuffer, PipelineError> {
    let file = std::fs::File::open(path).map_err(|source| PipelineError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let decode_err = |source: SymphoniaError| decode_error(path, source);
    let unsupported = |reason: String| PipelineError::UnsupportedFormat {
        path: path.to_path_buf(),
        reason,
    };

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(decode_err)?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| unsupported("no audio track".into()))?;

    let params = &track.codec_params;
    if params.codec != CODEC_TYPE_PCM_S16LE {
        return Err(unsupported(format!(
            "expected 16-bit signed PCM, found {} bits",
            params.bits_per_sample.map_or("unknown".to_string(), |b| b.to_string())
        )));
    }
    let channels = params.channels.map_or(1, |c| c.count());
    if channels != 1 {
        return Err(unsupported(format!("expected mono, found {channels} channels")));
    }
    let sample_rate = params
        .sample_rate
        .ok_or_else(|| unsupported("missing sample rate".into()))?;

    let track_id = track.id;
    let mut decoder = symphonia::default::get_codecs()
        .make(params, &DecoderOptions::default())
        .map_err(decode_err)?;

    let mut samples: Vec<f64> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(decode_err(e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        // PCM has no skippable packets, a corrupt one aborts the load
        let decoded = decoder.decode(&packet).map_err(decode_err)?;

        let spec = *decoded.spec();
        let mut sample_buf = SampleBuffer::<i16>::new(decoded.frames() as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        samples.extend(sample_buf.samples().iter().map(|&s| s as f64 / I16_INPUT_SCALE));
    }

    if samples.is_empty() {
        log::warn!("{} holds no samples, treating it as one silent sample", path.display());
    }

    let buffer = AudioBuffer::new(samples, sample_rate)?;
    log::info!(
        "Decoded audio: {} samples, {}Hz, {:.2}s",
        buffer.len(),
        buffer.sample_rate,
        buffer.duration()
    );
    Ok(buffer)
}

fn decode_error(path: &Path, source: SymphoniaError) -> PipelineError {
    PipelineError::Decode {
        path: path.to_path_buf(),
        source,
    }
}
