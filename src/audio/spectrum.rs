//! FFT magnitude spectra and the statistics derived from them.
//!
//! Frames are not windowed before the transform.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use super::features::{DominantFrequency, FrequencySummary};

pub const FFT_SIZE: usize = 2048;
pub const HOP_SIZE: usize = 1024;

const PEAK_THRESHOLD: f32 = 0.1;
const MAX_DOMINANT: usize = 10;
const ROLLOFF_FRACTION: f64 = 0.85;

/// Forward FFT of a fixed size returning the non-redundant half of the magnitude spectrum.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    size: usize,
}

impl SpectrumAnalyzer {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(size);
        Self { fft, size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Magnitudes of bins `0..size/2`. Short frames are zero-padded.
    pub fn magnitudes(&self, frame: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = vec![Complex::new(0.0, 0.0); self.size];
        for (slot, &s) in buffer.iter_mut().zip(frame.iter()) {
            *slot = Complex::new(s, 0.0);
        }
        self.fft.process(&mut buffer);

        buffer[..self.size / 2].iter().map(|c| c.norm()).collect()
    }
}

/// Magnitude-weighted mean frequency of the first `analyzer.size()` samples.
///
/// Bin `i` maps to `i * sample_rate / fft_len`.
pub fn spectral_centroid(analyzer: &SpectrumAnalyzer, samples: &[f32], sample_rate: u32) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let head = &samples[..samples.len().min(analyzer.size())];
    let magnitudes = analyzer.magnitudes(head);
    let fft_len = analyzer.size() as f64;

    let mut weighted_sum = 0.0f64;
    let mut magnitude_sum = 0.0f64;
    for (i, &mag) in magnitudes.iter().enumerate() {
        let frequency = i as f64 * sample_rate as f64 / fft_len;
        weighted_sum += frequency * mag as f64;
        magnitude_sum += mag as f64;
    }

    if magnitude_sum > 0.0 {
        weighted_sum / magnitude_sum
    } else {
        0.0
    }
}

/// Half-spectrum magnitudes for each 50%-overlapped window, in time order.
pub fn spectrogram(analyzer: &SpectrumAnalyzer, samples: &[f32]) -> Vec<Vec<f32>> {
    let size = analyzer.size();
    let mut frames = Vec::new();

    let mut pos = 0;
    while pos + size < samples.len() {
        frames.push(analyzer.magnitudes(&samples[pos..pos + size]));
        pos += HOP_SIZE;
    }

    frames
}

/// Elementwise mean across frames. All zeros when there are no frames.
pub fn average_spectrum(frames: &[Vec<f32>], bins: usize) -> Vec<f32> {
    if frames.is_empty() {
        return vec![0.0; bins];
    }

    let mut sums = vec![0.0f64; bins];
    for frame in frames {
        for (sum, &mag) in sums.iter_mut().zip(frame.iter()) {
            *sum += mag as f64;
        }
    }

    let n = frames.len() as f64;
    sums.into_iter().map(|s| (s / n) as f32).collect()
}

/// Strict local maxima above 10% of the global maximum, loudest first, at most ten.
///
/// Bin `i` maps to `i * sample_rate / (spectrum.len() * 2)`. For the half
/// spectrum of an `FFT_SIZE` transform this equals the centroid's mapping.
pub fn dominant_frequencies(spectrum: &[f32], sample_rate: u32) -> Vec<DominantFrequency> {
    if spectrum.len() < 3 {
        return Vec::new();
    }

    let global_max = spectrum.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let threshold = global_max * PEAK_THRESHOLD;
    let denominator = (spectrum.len() * 2) as f64;

    let mut peaks: Vec<DominantFrequency> = (1..spectrum.len() - 1)
        .filter(|&i| {
            spectrum[i] > threshold && spectrum[i] > spectrum[i - 1] && spectrum[i] > spectrum[i + 1]
        })
        .map(|i| DominantFrequency {
            frequency: i as f64 * sample_rate as f64 / denominator,
            magnitude: spectrum[i] as f64,
        })
        .collect();

    peaks.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));
    peaks.truncate(MAX_DOMINANT);
    peaks
}

/// Smallest bin index whose cumulative magnitude reaches 85% of the total.
pub fn spectral_rolloff(spectrum: &[f32]) -> usize {
    let total: f64 = spectrum.iter().map(|&m| m as f64).sum();
    let threshold = total * ROLLOFF_FRACTION;

    let mut cumulative = 0.0f64;
    for (i, &mag) in spectrum.iter().enumerate() {
        cumulative += mag as f64;
        if cumulative >= threshold {
            return i;
        }
    }
    spectrum.len().saturating_sub(1)
}

/// Mean positive magnitude change between consecutive frames. 0 with fewer than two frames.
pub fn spectral_flux(frames: &[Vec<f32>]) -> f64 {
    if frames.len() < 2 {
        return 0.0;
    }

    let total: f64 = frames
        .windows(2)
        .map(|pair| {
            pair[1]
                .iter()
                .zip(pair[0].iter())
                .map(|(&cur, &prev)| (cur - prev).max(0.0) as f64)
                .sum::<f64>()
        })
        .sum();

    total / (frames.len() - 1) as f64
}

pub fn analyze_frequency(analyzer: &SpectrumAnalyzer, samples: &[f32], sample_rate: u32) -> FrequencySummary {
    let frames = spectrogram(analyzer, samples);
    let spectrum = average_spectrum(&frames, analyzer.size() / 2);

    log::debug!("Spectrogram: {} frames of {} bins", frames.len(), spectrum.len());

    FrequencySummary {
        dominant_frequencies: dominant_frequencies(&spectrum, sample_rate),
        spectral_rolloff: spectral_rolloff(&spectrum),
        spectral_flux: spectral_flux(&frames),
        spectrum,
    }
}
