use base64::Engine;

use super::decode::SampleBuffer;
use super::features::AnalysisResult;
use super::spectrum::{SpectrumAnalyzer, FFT_SIZE};
use super::{pitch, rhythm, spectrum, vocal};
use crate::error::{AnalysisError, Result};
use crate::score;

pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Analyze raw little-endian 16-bit mono PCM.
///
/// The bytes are reinterpreted as PCM no matter what they actually contain.
/// `filename` is only used for logging and echoed into the result.
pub fn analyze(buffer: &[u8], sample_rate: u32, filename: Option<&str>) -> Result<AnalysisResult> {
    let audio = SampleBuffer::from_pcm16(buffer, sample_rate)?;
    Ok(analyze_samples(&audio, filename))
}

/// Same as [`analyze`], for PCM that arrived base64-encoded.
///
/// ASCII whitespace anywhere in the input is skipped, so line-wrapped
/// encoder output decodes as-is.
pub fn analyze_base64(encoded: &str, sample_rate: u32, filename: Option<&str>) -> Result<AnalysisResult> {
    let compact: Vec<u8> = encoded.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&compact)
        .map_err(|e| AnalysisError::InvalidInput(format!("audio data is not valid base64: {}", e)))?;
    analyze(&bytes, sample_rate, filename)
}

pub fn analyze_samples(audio: &SampleBuffer, filename: Option<&str>) -> AnalysisResult {
    let samples = &audio.samples;
    let sr = audio.sample_rate;
    let label = filename.unwrap_or("<buffer>");

    log::info!(
        "Analyzing {}: {} samples, {}Hz, {:.2}s",
        label,
        samples.len(),
        sr,
        audio.duration_seconds()
    );

    let analyzer = SpectrumAnalyzer::new(FFT_SIZE);

    log::debug!("Pass 1: Pitch tracking...");
    let pitch = pitch::analyze_pitch(samples, sr);

    log::debug!("Pass 2: Onset detection...");
    let rhythm = rhythm::analyze_rhythm(samples, sr);

    log::debug!("Pass 3: Vocal characteristics...");
    let vocal = vocal::analyze_vocal(&analyzer, samples, sr);

    log::debug!("Pass 4: Frequency spectrum...");
    let frequency = spectrum::analyze_frequency(&analyzer, samples, sr);

    let overall_score = score::overall_score(&pitch, &rhythm, &vocal);
    let recommendations = score::recommendations(&pitch, &rhythm, &vocal);

    log::info!(
        "{}: pitch={:.1}Hz ({} frames), onsets={}, tempo={:.1} BPM, zcr={:.4}, score={}",
        label,
        pitch.average_pitch,
        pitch.total_pitch_frames,
        rhythm.onset_count,
        rhythm.tempo,
        vocal.zero_crossing_rate,
        overall_score
    );

    let result = AnalysisResult {
        filename: filename.map(str::to_string),
        duration_seconds: audio.duration_seconds(),
        sample_rate: sr,
        pitch,
        rhythm,
        vocal,
        frequency,
        overall_score,
        recommendations,
    };

    if result.is_degenerate() {
        log::warn!(
            "{}: too little usable signal; score {} is inconclusive",
            label,
            result.overall_score
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::decode::encode_pcm16;
    use crate::audio::pitch::HOP_SIZE;
    use base64::Engine;

    #[test]
    fn test_zero_sample_rate_is_invalid() {
        let err = analyze(&[0, 0, 0, 0], 0, None).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_empty_buffer_is_degenerate_not_error() {
        let result = analyze(&[], DEFAULT_SAMPLE_RATE, Some("empty.raw")).unwrap();
        assert_eq!(result.duration_seconds, 0.0);
        assert_eq!(result.pitch.total_pitch_frames, 0);
        assert_eq!(result.rhythm.onset_count, 0);
        assert_eq!(result.vocal.volume, 0.0);
        assert_eq!(result.overall_score, 12);
        assert!(result.is_degenerate());
        assert_eq!(result.filename.as_deref(), Some("empty.raw"));
    }

    #[test]
    fn test_short_buffer_under_one_hop() {
        let bytes = encode_pcm16(&vec![0.25; HOP_SIZE - 1]);
        let result = analyze(&bytes, DEFAULT_SAMPLE_RATE, None).unwrap();
        assert_eq!(result.pitch.average_pitch, 0.0);
        assert_eq!(result.frequency.spectral_flux, 0.0);
        assert!(result.frequency.dominant_frequencies.is_empty());
    }

    #[test]
    fn test_silence_scores_twelve_for_any_length() {
        for len in [HOP_SIZE, HOP_SIZE * 3 + 17, 44100] {
            let bytes = vec![0u8; len * 2];
            let result = analyze(&bytes, DEFAULT_SAMPLE_RATE, None).unwrap();
            assert_eq!(result.overall_score, 12, "length {}", len);
            assert!(!result.vocal.voice_activity);
        }
    }

    #[test]
    fn test_base64_matches_raw() {
        let bytes = encode_pcm16(&(0..8192).map(|i| ((i % 50) as f32 / 50.0) - 0.5).collect::<Vec<_>>());
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
        let from_raw = analyze(&bytes, DEFAULT_SAMPLE_RATE, None).unwrap();
        let from_b64 = analyze_base64(&encoded, DEFAULT_SAMPLE_RATE, None).unwrap();
        assert_eq!(from_raw, from_b64);
    }

    #[test]
    fn test_wrapped_base64_decodes() {
        let bytes = encode_pcm16(&(0..4096).map(|i| ((i % 64) as f32 / 64.0) - 0.5).collect::<Vec<_>>());
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
        let wrapped = encoded
            .as_bytes()
            .chunks(76)
            .map(|line| std::str::from_utf8(line).unwrap())
            .collect::<Vec<_>>()
            .join("\r\n");
        assert!(wrapped.contains('\n'));

        let from_raw = analyze(&bytes, DEFAULT_SAMPLE_RATE, None).unwrap();
        let from_wrapped = analyze_base64(&format!("{}\n", wrapped), DEFAULT_SAMPLE_RATE, None).unwrap();
        assert_eq!(from_raw, from_wrapped);
    }

    #[test]
    fn test_bad_base64_is_invalid_input() {
        let err = analyze_base64("not base64!!", DEFAULT_SAMPLE_RATE, None).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }
}
