//! The score record submitted by one judge for one match.

use serde::{Deserialize, Serialize};

use crate::round::round3;

/// One judge's scores for a match: accuracy and presentation subscores for
/// up to two competitors, with derived totals.
///
/// Totals are always recomputed from the subscores of the same record;
/// totals arriving over the wire are never trusted verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Free-text judge identity; the dedup key, matched case-insensitively.
    pub judge_id: String,
    /// Deduction-adjusted accuracy subscore for competitor A, typically 0.0–4.0.
    pub a_accuracy: f64,
    /// Accuracy subscore for competitor B; 0.0 in single-competitor modes.
    pub b_accuracy: f64,
    /// Presentation subscore for competitor A, typically 0.0–10.0.
    pub a_presentation: f64,
    /// Presentation subscore for competitor B; 0.0 in single-competitor modes.
    pub b_presentation: f64,
    /// `round3(a_accuracy + a_presentation)`, derived at construction.
    pub a_total: f64,
    /// `round3(b_accuracy + b_presentation)`, derived at construction.
    pub b_total: f64,
}

impl ScoreRecord {
    /// Build a record from raw subscores, deriving both totals.
    pub fn new(
        judge_id: impl Into<String>,
        a_accuracy: f64,
        b_accuracy: f64,
        a_presentation: f64,
        b_presentation: f64,
    ) -> Self {
        Self {
            judge_id: judge_id.into(),
            a_accuracy,
            b_accuracy,
            a_presentation,
            b_presentation,
            a_total: round3(a_accuracy + a_presentation),
            b_total: round3(b_accuracy + b_presentation),
        }
    }

    /// Lowercased judge id, the case-insensitive dedup key.
    pub fn dedup_key(&self) -> String {
        self.judge_id.to_lowercase()
    }

    /// Whether this record and `other` come from the same judge,
    /// ignoring case.
    pub fn same_judge(&self, other_judge_id: &str) -> bool {
        self.judge_id.to_lowercase() == other_judge_id.to_lowercase()
    }
}
