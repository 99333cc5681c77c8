//! Pitch tracking with the YIN estimator (de Cheveigné & Kawahara, 2002).
//!
//! Frames are non-overlapping hops of [`HOP_SIZE`] samples. Each frame gets at
//! most one estimate; estimates outside the open band
//! ([`MIN_FREQUENCY`], [`MAX_FREQUENCY`]) are dropped rather than clamped.

use super::features::{PitchRange, PitchSummary};

pub const HOP_SIZE: usize = 1024;
pub const MIN_FREQUENCY: f64 = 80.0;
pub const MAX_FREQUENCY: f64 = 4000.0;

const YIN_THRESHOLD: f32 = 0.1;

/// Single-frame YIN pitch estimator.
pub struct PitchDetector {
    sample_rate: f64,
    threshold: f32,
    difference: Vec<f32>,
    cumulative_mean: Vec<f32>,
}

impl PitchDetector {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate as f64,
            threshold: YIN_THRESHOLD,
            difference: Vec::new(),
            cumulative_mean: Vec::new(),
        }
    }

    /// Fundamental frequency of `frame` in Hz, or `None` when no lag dips below the threshold.
    ///
    /// Lags are searched over `2..frame.len() / 2` with an integration window of
    /// `frame.len() / 2` samples.
    pub fn detect(&mut self, frame: &[f32]) -> Option<f64> {
        let window = frame.len() / 2;
        if window < 4 {
            return None;
        }

        self.compute_difference(frame, window);
        self.compute_cumulative_mean(window);

        let tau = self.first_dip(window)?;
        let refined = self.parabolic_interpolation(tau, window);
        if refined <= 0.0 {
            return None;
        }
        Some(self.sample_rate / refined)
    }

    /// d(τ) = Σ (x[j] - x[j+τ])² for j in 0..window
    fn compute_difference(&mut self, frame: &[f32], window: usize) {
        self.difference.clear();
        self.difference.resize(window, 0.0);

        for tau in 1..window {
            let mut sum = 0.0f32;
            for j in 0..window {
                let delta = frame[j] - frame[j + tau];
                sum += delta * delta;
            }
            self.difference[tau] = sum;
        }
    }

    /// d'(τ) = d(τ) · τ / Σ_{j=1..τ} d(j), with d'(0) = 1
    fn compute_cumulative_mean(&mut self, window: usize) {
        self.cumulative_mean.clear();
        self.cumulative_mean.resize(window, 1.0);

        let mut running_sum = 0.0f32;
        for tau in 1..window {
            running_sum += self.difference[tau];
            self.cumulative_mean[tau] = if running_sum > 1e-10 {
                self.difference[tau] * tau as f32 / running_sum
            } else {
                1.0
            };
        }
    }

    /// First lag below the threshold, walked down to its local minimum.
    fn first_dip(&self, window: usize) -> Option<usize> {
        let mut tau = 2;
        while tau < window {
            if self.cumulative_mean[tau] < self.threshold {
                while tau + 1 < window && self.cumulative_mean[tau + 1] < self.cumulative_mean[tau] {
                    tau += 1;
                }
                return Some(tau);
            }
            tau += 1;
        }
        None
    }

    fn parabolic_interpolation(&self, tau: usize, window: usize) -> f64 {
        if tau < 1 || tau + 1 >= window {
            return tau as f64;
        }

        let s0 = self.cumulative_mean[tau - 1] as f64;
        let s1 = self.cumulative_mean[tau] as f64;
        let s2 = self.cumulative_mean[tau + 1] as f64;

        let denominator = 2.0 * (2.0 * s1 - s2 - s0);
        if denominator.abs() > 1e-10 {
            tau as f64 + (s2 - s0) / denominator
        } else {
            tau as f64
        }
    }
}

/// Accepted pitch values, one per voiced hop, in time order.
pub fn pitch_track(samples: &[f32], sample_rate: u32) -> Vec<f64> {
    let mut detector = PitchDetector::new(sample_rate);
    let mut track = Vec::new();

    let mut pos = 0;
    while pos + HOP_SIZE < samples.len() {
        if let Some(f) = detector.detect(&samples[pos..pos + HOP_SIZE]) {
            if f > MIN_FREQUENCY && f < MAX_FREQUENCY {
                track.push(f);
            }
        }
        pos += HOP_SIZE;
    }

    track
}

pub fn summarize(track: &[f64]) -> PitchSummary {
    if track.is_empty() {
        return PitchSummary::default();
    }

    let n = track.len() as f64;
    let average_pitch = track.iter().sum::<f64>() / n;
    let pitch_variance = track
        .iter()
        .map(|p| (p - average_pitch).powi(2))
        .sum::<f64>()
        / n;
    let pitch_stability = if average_pitch > 0.0 {
        pitch_variance.sqrt() / average_pitch
    } else {
        0.0
    };

    let min = track.iter().copied().fold(f64::INFINITY, f64::min);
    let max = track.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    PitchSummary {
        average_pitch,
        pitch_variance,
        pitch_stability,
        pitch_range: PitchRange { min, max },
        pitch_consistency: 1.0 - pitch_stability,
        total_pitch_frames: track.len(),
    }
}

pub fn analyze_pitch(samples: &[f32], sample_rate: u32) -> PitchSummary {
    summarize(&pitch_track(samples, sample_rate))
}
