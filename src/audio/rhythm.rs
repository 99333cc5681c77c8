use super::features::RhythmSummary;

pub const WINDOW_SIZE: usize = 1024;
pub const HOP_SIZE: usize = 512;

/// Minimum frame energy for an onset.
const ENERGY_THRESHOLD: f64 = 0.1;
/// Required rise over the previous frame's energy.
const RISE_RATIO: f64 = 1.5;

/// Onset times in seconds. A frame fires when its mean-square energy clears
/// the absolute threshold and jumps past the previous frame's energy.
pub fn detect_onsets(samples: &[f32], sample_rate: u32) -> Vec<f64> {
    let mut onsets = Vec::new();
    let mut previous_energy = 0.0f64;

    let mut pos = 0;
    while pos + WINDOW_SIZE < samples.len() {
        let energy = samples[pos..pos + WINDOW_SIZE]
            .iter()
            .map(|&s| (s as f64) * (s as f64))
            .sum::<f64>()
            / WINDOW_SIZE as f64;

        if energy > ENERGY_THRESHOLD && energy > previous_energy * RISE_RATIO {
            onsets.push(pos as f64 / sample_rate as f64);
        }

        previous_energy = energy;
        pos += HOP_SIZE;
    }

    onsets
}

/// 1 - (stddev / mean) of the intervals; 0 for fewer than two intervals.
pub fn rhythm_consistency(intervals: &[f64]) -> f64 {
    if intervals.len() < 2 {
        return 0.0;
    }

    let n = intervals.len() as f64;
    let mean = intervals.iter().sum::<f64>() / n;
    let variance = intervals.iter().map(|i| (i - mean).powi(2)).sum::<f64>() / n;

    if mean > 0.0 {
        1.0 - variance.sqrt() / mean
    } else {
        0.0
    }
}

pub fn summarize(onsets: Vec<f64>) -> RhythmSummary {
    let intervals: Vec<f64> = onsets.windows(2).map(|w| w[1] - w[0]).collect();

    let average_interval = if intervals.is_empty() {
        0.0
    } else {
        intervals.iter().sum::<f64>() / intervals.len() as f64
    };

    let tempo = if average_interval > 0.0 {
        60.0 / average_interval
    } else {
        0.0
    };

    RhythmSummary {
        tempo,
        average_interval,
        onset_count: onsets.len(),
        rhythm_consistency: rhythm_consistency(&intervals),
        onsets,
    }
}

pub fn analyze_rhythm(samples: &[f32], sample_rate: u32) -> RhythmSummary {
    summarize(detect_onsets(samples, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Square-wave bursts every `period` samples, silence in between. At 0.4 a
    /// frame only half covering a burst stays under the energy threshold.
    fn click_track(period: usize, burst: usize, total: usize) -> Vec<f32> {
        (0..total)
            .map(|i| {
                if i % period < burst {
                    if i % 2 == 0 { 0.4 } else { -0.4 }
                } else {
                    0.0
                }
            })
            .collect()
    }

    #[test]
    fn test_silence_has_no_onsets() {
        let summary = analyze_rhythm(&vec![0.0; 88200], 44100);
        assert_eq!(summary.onset_count, 0);
        assert_eq!(summary.tempo, 0.0);
        assert_eq!(summary.rhythm_consistency, 0.0);
    }

    #[test]
    fn test_steady_tone_fires_once() {
        let samples: Vec<f32> = (0..44100)
            .map(|i| 0.5 * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
            .collect();
        let summary = analyze_rhythm(&samples, 44100);
        assert_eq!(summary.onsets, vec![0.0]);
        assert_eq!(summary.tempo, 0.0);
        assert_eq!(summary.average_interval, 0.0);
        assert_eq!(summary.rhythm_consistency, 0.0);
    }

    #[test]
    fn test_regular_clicks() {
        // A burst roughly every 0.5 s, aligned to the hop grid.
        let samples = click_track(22050 - 22050 % HOP_SIZE, 2048, 44100 * 3);
        let summary = analyze_rhythm(&samples, 44100);
        assert_eq!(summary.onset_count, 6, "onsets: {:?}", summary.onsets);
        assert!(summary.onsets.windows(2).all(|w| w[1] > w[0]));
        assert!(summary.rhythm_consistency > 0.99, "consistency {}", summary.rhythm_consistency);
        let expected_interval = (22050 - 22050 % HOP_SIZE) as f64 / 44100.0;
        assert!((summary.average_interval - expected_interval).abs() < 1e-9);
        assert!((summary.tempo - 60.0 / expected_interval).abs() < 1e-6);
    }

    #[test]
    fn test_consistency_formula() {
        assert_eq!(rhythm_consistency(&[0.5]), 0.0);
        assert!((rhythm_consistency(&[0.5, 0.5, 0.5]) - 1.0).abs() < 1e-12);
        let c = rhythm_consistency(&[0.4, 0.6]);
        assert!((c - (1.0 - 0.1 / 0.5)).abs() < 1e-12);
    }
}
