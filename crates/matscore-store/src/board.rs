//! Latest-per-judge scoreboard shared between the ingestion server and the
//! host surface.

use std::sync::{Arc, RwLock};

use tracing::debug;

use matscore_core::ScoreRecord;

/// Thread-safe map of judge identity to that judge's most recent record.
///
/// Entries keep arrival order so the host can list judges as they report; a
/// resubmission replaces the judge's entry in place rather than moving it.
/// Judge identities match case-insensitively, so at most one entry exists
/// per distinct judge.
///
/// The handle is cheap to clone and every clone observes the same board.
/// All access goes through [`upsert`](Self::upsert),
/// [`snapshot`](Self::snapshot), and [`reset`](Self::reset); lock sections
/// are short and never held across an await, so callers need no locking of
/// their own.
#[derive(Debug, Clone, Default)]
pub struct ScoreBoard {
    entries: Arc<RwLock<Vec<ScoreRecord>>>,
}

impl ScoreBoard {
    /// Create an empty board for a new host session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `record`'s judge.
    ///
    /// The replacement is all-or-nothing with respect to concurrent
    /// snapshots: no reader ever observes a partially-written record.
    pub fn upsert(&self, record: ScoreRecord) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        match entries.iter_mut().find(|e| e.same_judge(&record.judge_id)) {
            Some(existing) => {
                debug!(judge = %record.judge_id, "replacing judge entry");
                *existing = record;
            }
            None => {
                debug!(judge = %record.judge_id, "new judge entry");
                entries.push(record);
            }
        }
    }

    /// Independent copy of all current entries, safe to iterate while
    /// concurrent upserts proceed elsewhere.
    ///
    /// A snapshot taken at time T reflects exactly the upserts completed
    /// before T.
    pub fn snapshot(&self) -> Vec<ScoreRecord> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Atomically clear all entries for a new match.
    pub fn reset(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        debug!(cleared = entries.len(), "scoreboard reset");
        entries.clear();
    }

    /// Number of judges currently on the board.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(judge: &str, a_accuracy: f64) -> ScoreRecord {
        ScoreRecord::new(judge, a_accuracy, 0.0, 5.0, 0.0)
    }

    #[test]
    fn starts_empty() {
        let board = ScoreBoard::new();
        assert!(board.is_empty());
        assert!(board.snapshot().is_empty());
    }

    #[test]
    fn upsert_inserts_then_replaces() {
        let board = ScoreBoard::new();
        board.upsert(record("A", 3.0));
        board.upsert(record("B", 3.5));
        board.upsert(record("A", 4.0));

        let snapshot = board.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].judge_id, "A");
        assert_eq!(snapshot[0].a_accuracy, 4.0);
        assert_eq!(snapshot[1].judge_id, "B");
    }

    #[test]
    fn judge_match_ignores_case() {
        let board = ScoreBoard::new();
        board.upsert(record("Judge One", 3.0));
        board.upsert(record("JUDGE ONE", 3.8));

        let snapshot = board.snapshot();
        assert_eq!(snapshot.len(), 1);
        // The replacement carries the resubmitted spelling.
        assert_eq!(snapshot[0].judge_id, "JUDGE ONE");
        assert_eq!(snapshot[0].a_accuracy, 3.8);
    }

    #[test]
    fn identical_resubmission_keeps_size() {
        let board = ScoreBoard::new();
        board.upsert(record("A", 3.0));
        board.upsert(record("A", 3.0));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn replacement_preserves_arrival_position() {
        let board = ScoreBoard::new();
        board.upsert(record("A", 3.0));
        board.upsert(record("B", 3.1));
        board.upsert(record("C", 3.2));
        board.upsert(record("b", 4.0));

        let snapshot = board.snapshot();
        let order: Vec<&str> = snapshot.iter().map(|r| r.judge_id.as_str()).collect();
        assert_eq!(order, ["A", "b", "C"]);
    }

    #[test]
    fn reset_clears_everything() {
        let board = ScoreBoard::new();
        board.upsert(record("A", 3.0));
        board.upsert(record("B", 3.5));
        board.reset();
        assert!(board.is_empty());
    }

    #[test]
    fn clones_share_the_same_board() {
        let board = ScoreBoard::new();
        let clone = board.clone();
        clone.upsert(record("A", 3.0));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn concurrent_distinct_upserts_all_land() {
        let board = ScoreBoard::new();
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let board = board.clone();
                std::thread::spawn(move || {
                    board.upsert(record(&format!("judge-{i}"), i as f64 / 10.0));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(board.len(), 16);
    }

    #[test]
    fn concurrent_same_judge_resolves_to_one_entry() {
        let board = ScoreBoard::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let board = board.clone();
                std::thread::spawn(move || {
                    board.upsert(record("shared", i as f64));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        // Last writer wins by completion order; either way, one entry.
        assert_eq!(board.len(), 1);
    }
}
