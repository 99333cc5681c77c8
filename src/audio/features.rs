//! Result records produced by one analysis call.
//!
//! Field names serialize in camelCase because report generators and the web
//! UI pattern-match on this exact JSON shape.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PitchRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchSummary {
    /// Mean of accepted pitch values in Hz (0 when nothing was voiced)
    pub average_pitch: f64,
    /// Population variance around `average_pitch` (Hz²)
    pub pitch_variance: f64,
    /// Coefficient of variation
    pub pitch_stability: f64,
    pub pitch_range: PitchRange,
    /// `1 - pitch_stability`; not clamped, so it goes negative for wild pitch
    pub pitch_consistency: f64,
    pub total_pitch_frames: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RhythmSummary {
    /// Onsets per minute, assuming one onset per beat
    pub tempo: f64,
    pub average_interval: f64,
    pub onset_count: usize,
    pub rhythm_consistency: f64,
    /// Onset times in seconds, strictly increasing
    pub onsets: Vec<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocalSummary {
    /// RMS of the whole buffer
    pub volume: f64,
    pub zero_crossing_rate: f64,
    /// Centroid of the first 2048 samples, in Hz
    pub spectral_centroid: f64,
    pub voice_activity: bool,
    pub brightness: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DominantFrequency {
    pub frequency: f64,
    pub magnitude: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencySummary {
    /// Average magnitude spectrum across all analysis windows
    pub spectrum: Vec<f32>,
    pub dominant_frequencies: Vec<DominantFrequency>,
    /// Bin index, not Hz
    pub spectral_rolloff: usize,
    pub spectral_flux: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Pitch,
    Rhythm,
    Volume,
    #[serde(rename = "Voice Quality")]
    VoiceQuality,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: Category,
    pub priority: Priority,
    pub message: String,
    pub exercises: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub pitch: PitchSummary,
    pub rhythm: RhythmSummary,
    pub vocal: VocalSummary,
    pub frequency: FrequencySummary,
    /// 0-100. A score from a degenerate result means "inconclusive", not "worst".
    pub overall_score: u8,
    pub recommendations: Vec<Recommendation>,
}

impl AnalysisResult {
    /// True when the input carried too little signal for pitch or rhythm to say anything
    /// (too short, silent, or noise from non-PCM bytes).
    pub fn is_degenerate(&self) -> bool {
        self.pitch.total_pitch_frames == 0 && self.rhythm.onset_count < 2
    }
}
