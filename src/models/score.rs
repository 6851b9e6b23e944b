use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;
/// Scale of the NUMERIC score columns.
pub const SCORE_DECIMALS: u32 = 2;

/// Rounds a score to the precision the store keeps, so a breakdown reads back
/// exactly as it was aggregated.
pub fn round_to_stored(value: f64) -> f64 {
    let factor = 10f64.powi(SCORE_DECIMALS as i32);
    (value * factor).round() / factor
}

/// Reads a NUMERIC score column back onto the same grid `round_to_stored`
/// produces.
pub fn score_from_column(value: Decimal) -> Option<f64> {
    value.to_f64().map(round_to_stored)
}

/// Relative weights of the AI and interviewer scores. Always normalized so the
/// two add up to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct ScoreWeights {
    ai: f64,
    manual: f64,
}

impl ScoreWeights {
    /// Negative or non-finite weights count as zero. When nothing usable is
    /// left the equal split is used.
    pub fn new(ai: f64, manual: f64) -> Self {
        let ai = sanitize_weight(ai);
        let manual = sanitize_weight(manual);
        let total = ai + manual;
        if total <= f64::EPSILON {
            return Self::default();
        }
        Self {
            ai: ai / total,
            manual: manual / total,
        }
    }

    pub fn ai(&self) -> f64 {
        self.ai
    }

    pub fn manual(&self) -> f64 {
        self.manual
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            ai: 0.5,
            manual: 0.5,
        }
    }
}

fn sanitize_weight(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// The two inputs behind a ranking score, kept for display and audit.
/// `None` means the input has not been produced yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScoreBreakdown {
    pub ai_score: Option<f64>,
    pub manual_score: Option<f64>,
}

/// A ranking score together with the breakdown it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct AggregatedScore {
    pub ranking_score: i32,
    pub breakdown: ScoreBreakdown,
}
