//! Scores and coaching recommendations derived from the analysis summaries.
//!
//! Everything here is a pure function of the summaries; the rule table is fixed.

use serde::{Deserialize, Serialize};

use crate::audio::features::{
    AnalysisResult, Category, PitchSummary, Priority, Recommendation, RhythmSummary, VocalSummary,
};

const PITCH_WEIGHT: f64 = 0.4;
const RHYTHM_WEIGHT: f64 = 0.3;
const VOCAL_WEIGHT: f64 = 0.3;

const VOICED_SCORE: f64 = 80.0;
const UNVOICED_SCORE: f64 = 40.0;

pub fn pitch_score(pitch: &PitchSummary) -> f64 {
    (pitch.pitch_consistency * 100.0).clamp(0.0, 100.0)
}

pub fn rhythm_score(rhythm: &RhythmSummary) -> f64 {
    (rhythm.rhythm_consistency * 100.0).clamp(0.0, 100.0)
}

pub fn vocal_score(vocal: &VocalSummary) -> f64 {
    if vocal.voice_activity {
        VOICED_SCORE
    } else {
        UNVOICED_SCORE
    }
}

/// Weighted 0-100 score, rounded to the nearest integer.
pub fn overall_score(pitch: &PitchSummary, rhythm: &RhythmSummary, vocal: &VocalSummary) -> u8 {
    let score = pitch_score(pitch) * PITCH_WEIGHT
        + rhythm_score(rhythm) * RHYTHM_WEIGHT
        + vocal_score(vocal) * VOCAL_WEIGHT;
    score.round() as u8
}

/// Per-component scores as whole numbers, the way history and comparison views show them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub overall_score: u8,
    pub pitch_score: u8,
    pub rhythm_score: u8,
    pub vocal_score: u8,
}

impl ScoreBreakdown {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            overall_score: result.overall_score,
            pitch_score: pitch_score(&result.pitch).round() as u8,
            rhythm_score: rhythm_score(&result.rhythm).round() as u8,
            vocal_score: vocal_score(&result.vocal).round() as u8,
        }
    }
}

struct Rule {
    category: Category,
    priority: Priority,
    message: &'static str,
    exercises: [&'static str; 3],
    applies: fn(&PitchSummary, &RhythmSummary, &VocalSummary) -> bool,
}

const RULES: &[Rule] = &[
    Rule {
        category: Category::Pitch,
        priority: Priority::High,
        message: "Work on pitch stability. Practice sustained notes with a metronome.",
        exercises: ["Long tone exercises", "Pitch matching drills", "Scale practice"],
        applies: |p, _, _| p.pitch_consistency < 0.7,
    },
    Rule {
        category: Category::Pitch,
        priority: Priority::Medium,
        message: "Reduce pitch variation. Focus on maintaining consistent pitch.",
        exercises: ["Pitch slides", "Interval training", "Vocal sirens"],
        applies: |p, _, _| p.pitch_variance > 100.0,
    },
    Rule {
        category: Category::Rhythm,
        priority: Priority::High,
        message: "Improve rhythmic accuracy. Practice with a metronome.",
        exercises: ["Rhythm clapping", "Metronome practice", "Subdivision exercises"],
        applies: |_, r, _| r.rhythm_consistency < 0.6,
    },
    Rule {
        category: Category::Volume,
        priority: Priority::Medium,
        message: "Increase vocal projection. Practice breathing exercises.",
        exercises: ["Breathing exercises", "Volume control drills", "Projection practice"],
        applies: |_, _, v| v.volume < 0.1,
    },
    Rule {
        category: Category::VoiceQuality,
        priority: Priority::Medium,
        message: "Reduce breathiness. Focus on vocal cord closure.",
        exercises: ["Vocal cord strengthening", "Breath control", "Tone quality exercises"],
        applies: |_, _, v| v.zero_crossing_rate > 0.3,
    },
];

pub fn recommendations(
    pitch: &PitchSummary,
    rhythm: &RhythmSummary,
    vocal: &VocalSummary,
) -> Vec<Recommendation> {
    RULES
        .iter()
        .filter(|rule| (rule.applies)(pitch, rhythm, vocal))
        .map(|rule| Recommendation {
            category: rule.category,
            priority: rule.priority,
            message: rule.message.to_string(),
            exercises: rule.exercises.iter().map(|e| e.to_string()).collect(),
        })
        .collect()
}
