pub mod aggregate;
pub mod panel;
pub mod record;
pub mod round;

pub use aggregate::{AggregationResult, aggregate};
pub use panel::PanelSize;
pub use record::ScoreRecord;
pub use round::{format_score3, round3};
