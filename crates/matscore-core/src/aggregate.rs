//! Regulation trimmed-mean aggregation over a scoreboard snapshot.
//!
//! Panels of five or more judges drop the single highest and single lowest
//! total before averaging, but only once five actual scores have arrived:
//! the *expected* panel size gates the rule, not the received count alone.
//! A 7-judge panel with four scores in hand does not trim yet.

use serde::Serialize;

use crate::panel::PanelSize;
use crate::record::ScoreRecord;
use crate::round::round3;

/// Point-in-time judging metrics derived from a snapshot.
///
/// Derived on demand, never stored or mutated. All averages are rounded to
/// three decimals as the final step; extremes are raw subscore values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    /// Number of judges that have reported.
    pub received: usize,
    /// Configured panel size. `received` may legitimately exceed this.
    pub expected: usize,
    /// Trimmed (or plain) mean of competitor A's totals.
    pub competitor_a_average: f64,
    /// Trimmed (or plain) mean of competitor B's totals.
    pub competitor_b_average: f64,
    /// Plain mean of every total from both competitors, untrimmed.
    pub raw_average: f64,
    /// Trimmed (or plain) mean over the pooled totals of both competitors.
    pub final_score: f64,
    /// Whether the trimming rule was applied.
    pub dropped_extremes: bool,
    /// Extrema across all reported subscores, both competitors pooled.
    /// Display/audit only; they never feed back into the averages.
    pub max_accuracy: f64,
    pub min_accuracy: f64,
    pub max_presentation: f64,
    pub min_presentation: f64,
}

impl AggregationResult {
    fn empty(expected: PanelSize) -> Self {
        Self {
            received: 0,
            expected: expected.count(),
            competitor_a_average: 0.0,
            competitor_b_average: 0.0,
            raw_average: 0.0,
            final_score: 0.0,
            dropped_extremes: false,
            max_accuracy: 0.0,
            min_accuracy: 0.0,
            max_presentation: 0.0,
            min_presentation: 0.0,
        }
    }
}

/// Compute judging metrics for a snapshot against the configured panel size.
///
/// Never fails: an empty snapshot yields zeroed metrics with `received = 0`.
pub fn aggregate(records: &[ScoreRecord], expected: PanelSize) -> AggregationResult {
    if records.is_empty() {
        return AggregationResult::empty(expected);
    }

    let received = records.len();
    let will_drop = expected.trims() && received >= 5;

    let a_totals: Vec<f64> = records.iter().map(|r| r.a_total).collect();
    let b_totals: Vec<f64> = records.iter().map(|r| r.b_total).collect();
    let pooled_totals: Vec<f64> = records
        .iter()
        .flat_map(|r| [r.a_total, r.b_total])
        .collect();

    let accuracies: Vec<f64> = records
        .iter()
        .flat_map(|r| [r.a_accuracy, r.b_accuracy])
        .collect();
    let presentations: Vec<f64> = records
        .iter()
        .flat_map(|r| [r.a_presentation, r.b_presentation])
        .collect();

    AggregationResult {
        received,
        expected: expected.count(),
        competitor_a_average: trimmed_mean(&a_totals, will_drop),
        competitor_b_average: trimmed_mean(&b_totals, will_drop),
        raw_average: round3(pooled_totals.iter().sum::<f64>() / pooled_totals.len() as f64),
        final_score: trimmed_mean(&pooled_totals, will_drop),
        dropped_extremes: will_drop,
        max_accuracy: fold_max(&accuracies),
        min_accuracy: fold_min(&accuracies),
        max_presentation: fold_max(&presentations),
        min_presentation: fold_min(&presentations),
    }
}

/// Average a list of totals, dropping one highest and one lowest value when
/// `will_drop` holds and the list is long enough.
///
/// With two or fewer values trimming would be degenerate (it could empty the
/// list), so the plain mean is the fallback even when trimming was requested.
fn trimmed_mean(values: &[f64], will_drop: bool) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    if !will_drop || values.len() <= 2 {
        return round3(values.iter().sum::<f64>() / values.len() as f64);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    // Drop a single occurrence at each end, even among duplicate values.
    let trimmed = &sorted[1..sorted.len() - 1];
    round3(trimmed.iter().sum::<f64>() / trimmed.len() as f64)
}

fn fold_max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::MIN, f64::max)
}

fn fold_min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::MAX, f64::min)
}
