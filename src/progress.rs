//! Progress tracking across sessions: comparing two analyses and summarizing
//! score trends over a history. Insight strings come from a fixed table.

use serde::{Deserialize, Serialize};

use crate::audio::features::AnalysisResult;
use crate::score::ScoreBreakdown;

/// Score changes smaller than this (in points) count as stable.
const TREND_TOLERANCE: i16 = 3;
/// Per-skill gain treated as a significant improvement.
const SIGNIFICANT_GAIN: i16 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDelta {
    pub overall_score: i16,
    pub pitch_score: i16,
    pub rhythm_score: i16,
    pub vocal_score: i16,
}

impl ScoreDelta {
    pub fn between(before: &ScoreBreakdown, after: &ScoreBreakdown) -> Self {
        let diff = |a: u8, b: u8| b as i16 - a as i16;
        Self {
            overall_score: diff(before.overall_score, after.overall_score),
            pitch_score: diff(before.pitch_score, after.pitch_score),
            rhythm_score: diff(before.rhythm_score, after.rhythm_score),
            vocal_score: diff(before.vocal_score, after.vocal_score),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub before: ScoreBreakdown,
    pub after: ScoreBreakdown,
    pub improvements: ScoreDelta,
    pub insights: Vec<String>,
}

struct SkillPhrases {
    significant: &'static str,
    improved: &'static str,
    steady: &'static str,
    declined: &'static str,
}

const PITCH_PHRASES: SkillPhrases = SkillPhrases {
    significant: "Significant improvement in pitch accuracy",
    improved: "Pitch accuracy improved",
    steady: "Pitch accuracy held steady",
    declined: "Pitch accuracy slipped; revisit sustained-note drills",
};

const RHYTHM_PHRASES: SkillPhrases = SkillPhrases {
    significant: "Significant improvement in rhythmic timing",
    improved: "Rhythmic timing improved",
    steady: "Maintained consistent rhythm throughout",
    declined: "Rhythm became less steady; practice with a metronome",
};


fn insight(phrases: &SkillPhrases, delta: i16) -> &'static str {
    if delta >= SIGNIFICANT_GAIN {
        phrases.significant
    } else if delta > 0 {
        phrases.improved
    } else if delta == 0 {
        phrases.steady
    } else {
        phrases.declined
    }
}

/// The vocal score only moves when the voice-activity gate flips.
fn vocal_insight(before: bool, after: bool) -> &'static str {
    match (before, after) {
        (false, true) => "Much clearer voice activity in the second recording",
        (true, false) => "Voice activity dropped in the second recording",
        _ => "Vocal projection unchanged",
    }
}

pub fn compare(before: &AnalysisResult, after: &AnalysisResult) -> Comparison {
    let before_scores = ScoreBreakdown::from_result(before);
    let after_scores = ScoreBreakdown::from_result(after);
    let improvements = ScoreDelta::between(&before_scores, &after_scores);

    let mut insights: Vec<String> = [
        insight(&PITCH_PHRASES, improvements.pitch_score),
        insight(&RHYTHM_PHRASES, improvements.rhythm_score),
        vocal_insight(before.vocal.voice_activity, after.vocal.voice_activity),
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    if before.is_degenerate() || after.is_degenerate() {
        insights.push(
            "At least one recording is inconclusive; these changes may not reflect real progress"
                .to_string(),
        );
    }

    Comparison {
        before: before_scores,
        after: after_scores,
        improvements,
        insights,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

impl TrendDirection {
    fn from_change(change: i16) -> Self {
        if change > TREND_TOLERANCE {
            TrendDirection::Improving
        } else if change < -TREND_TOLERANCE {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        }
    }
}

struct TrendAdvice {
    improving: &'static str,
    stable: &'static str,
    declining: &'static str,
}

impl TrendAdvice {
    fn pick(&self, direction: TrendDirection) -> &'static str {
        match direction {
            TrendDirection::Improving => self.improving,
            TrendDirection::Stable => self.stable,
            TrendDirection::Declining => self.declining,
        }
    }
}

const PITCH_ADVICE: TrendAdvice = TrendAdvice {
    improving: "Continue focusing on pitch accuracy, great progress!",
    stable: "Keep sustained-note drills in your routine to push pitch accuracy further",
    declining: "Return to pitch-matching exercises against a reference tone",
};

const RHYTHM_ADVICE: TrendAdvice = TrendAdvice {
    improving: "Timing is tightening up; keep practicing with a metronome",
    stable: "Work on maintaining consistent rhythm",
    declining: "Slow the metronome down and rebuild consistent rhythm",
};

const VOCAL_ADVICE: TrendAdvice = TrendAdvice {
    improving: "Clearer voice activity; keep up the vocal exercises",
    stable: "Keep practicing vocal exercises for tone quality",
    declining: "Warm up before recording and project your voice more clearly",
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTrend {
    pub trend: TrendDirection,
    pub change: i16,
}

impl SkillTrend {
    fn between(first: u8, last: u8) -> Self {
        let change = last as i16 - first as i16;
        Self {
            trend: TrendDirection::from_change(change),
            change,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTrends {
    pub pitch: SkillTrend,
    pub rhythm: SkillTrend,
    pub vocal: SkillTrend,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub sessions: usize,
    pub overall_trend: TrendDirection,
    pub average_score: f64,
    pub score_history: Vec<u8>,
    pub skill_trends: SkillTrends,
    /// One coaching line per skill, pitch then rhythm then vocal.
    pub recommendations: Vec<String>,
}

/// Trend over sessions in chronological order, comparing the first and last.
/// `None` for an empty history.
pub fn trend(history: &[ScoreBreakdown]) -> Option<TrendReport> {
    let first = history.first()?;
    let last = history.last()?;

    let score_history: Vec<u8> = history.iter().map(|s| s.overall_score).collect();
    let average_score =
        score_history.iter().map(|&s| s as f64).sum::<f64>() / score_history.len() as f64;

    let skill_trends = SkillTrends {
        pitch: SkillTrend::between(first.pitch_score, last.pitch_score),
        rhythm: SkillTrend::between(first.rhythm_score, last.rhythm_score),
        vocal: SkillTrend::between(first.vocal_score, last.vocal_score),
    };
    let recommendations = vec![
        PITCH_ADVICE.pick(skill_trends.pitch.trend).to_string(),
        RHYTHM_ADVICE.pick(skill_trends.rhythm.trend).to_string(),
        VOCAL_ADVICE.pick(skill_trends.vocal.trend).to_string(),
    ];

    Some(TrendReport {
        sessions: history.len(),
        overall_trend: TrendDirection::from_change(last.overall_score as i16 - first.overall_score as i16),
        average_score,
        score_history,
        skill_trends,
        recommendations,
    })
}
