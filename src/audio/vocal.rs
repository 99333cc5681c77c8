use super::features::VocalSummary;
use super::spectrum::{spectral_centroid, SpectrumAnalyzer};

/// Zero-crossing band treated as voiced (exclusive on both ends).
const VOICE_ZCR_MIN: f64 = 0.01;
const VOICE_ZCR_MAX: f64 = 0.3;

pub fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt()
}

/// Sign changes between consecutive samples divided by the sample count.
/// Zero counts as positive.
pub fn zero_crossing_rate(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let crossings = samples
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count();
    crossings as f64 / samples.len() as f64
}

pub fn is_voice_active(zero_crossing_rate: f64) -> bool {
    zero_crossing_rate > VOICE_ZCR_MIN && zero_crossing_rate < VOICE_ZCR_MAX
}

pub fn analyze_vocal(analyzer: &SpectrumAnalyzer, samples: &[f32], sample_rate: u32) -> VocalSummary {
    let zcr = zero_crossing_rate(samples);
    let centroid = spectral_centroid(analyzer, samples, sample_rate);

    VocalSummary {
        volume: rms(samples),
        zero_crossing_rate: zcr,
        spectral_centroid: centroid,
        voice_activity: is_voice_active(zcr),
        brightness: centroid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::spectrum::FFT_SIZE;

    #[test]
    fn test_rms() {
        assert_eq!(rms(&[]), 0.0);
        assert!((rms(&[0.5, -0.5, 0.5, -0.5]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_crossing_rate() {
        assert_eq!(zero_crossing_rate(&[]), 0.0);
        assert_eq!(zero_crossing_rate(&[0.0; 100]), 0.0);
        // 3 sign changes over 4 samples
        assert!((zero_crossing_rate(&[1.0, -1.0, 1.0, -1.0]) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_voice_gate_is_exclusive() {
        assert!(!is_voice_active(0.0));
        assert!(!is_voice_active(0.01));
        assert!(is_voice_active(0.02));
        assert!(!is_voice_active(0.3));
    }

    #[test]
    fn test_brightness_mirrors_centroid() {
        let analyzer = SpectrumAnalyzer::new(FFT_SIZE);
        let samples: Vec<f32> = (0..4096).map(|i| ((i * 7) % 13) as f32 / 13.0 - 0.5).collect();
        let summary = analyze_vocal(&analyzer, &samples, 44100);
        assert_eq!(summary.brightness, summary.spectral_centroid);
        assert!(summary.spectral_centroid > 0.0);
    }
}
