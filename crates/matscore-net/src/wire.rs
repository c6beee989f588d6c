//! One-line JSON wire format for judge submissions.
//!
//! Judge apps in the field send slightly different shapes: some modes carry
//! both competitors, some only `player1*`, and one sends the second
//! competitor's fields as empty strings. The decoder is therefore lenient
//! about the *values* (anything that is not a finite number counts as 0.0)
//! while staying strict about the envelope (the line must be a JSON object).
//! Client-computed totals on the wire are ignored; totals are rederived from
//! the subscores of the same record at ingestion.

use serde_json::Value;

use matscore_core::ScoreRecord;

use crate::error::ProtocolError;

/// Port the host listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 5555;

/// Judge identity used when a submission carries no usable `refereeName`.
const UNKNOWN_JUDGE: &str = "Unknown";

/// A decoded submission payload, before total derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub referee_name: String,
    pub player1_accuracy: f64,
    pub player2_accuracy: f64,
    pub player1_presentation: f64,
    pub player2_presentation: f64,
}

impl Submission {
    /// Wire payload for an already-built record (the judge side).
    pub fn from_record(record: &ScoreRecord) -> Self {
        Self {
            referee_name: record.judge_id.clone(),
            player1_accuracy: record.a_accuracy,
            player2_accuracy: record.b_accuracy,
            player1_presentation: record.a_presentation,
            player2_presentation: record.b_presentation,
        }
    }

    /// Derive the score record, recomputing both totals.
    pub fn into_record(self) -> ScoreRecord {
        ScoreRecord::new(
            self.referee_name,
            self.player1_accuracy,
            self.player2_accuracy,
            self.player1_presentation,
            self.player2_presentation,
        )
    }

    /// Single-line JSON rendering with the field names judges send.
    pub fn to_json_line(&self) -> String {
        serde_json::json!({
            "refereeName": self.referee_name,
            "player1Accuracy": self.player1_accuracy,
            "player2Accuracy": self.player2_accuracy,
            "player1Presentation": self.player1_presentation,
            "player2Presentation": self.player2_presentation,
        })
        .to_string()
    }
}

/// Decode one request line into a [`Submission`].
///
/// Unrecognized fields are ignored. Recognized numeric fields may arrive as
/// numbers, numeric strings, empty strings, or not at all; everything that is
/// not a finite number decodes to 0.0.
pub fn parse_line(line: &str) -> Result<Submission, ProtocolError> {
    let value: Value = serde_json::from_str(line.trim())?;
    let object = value.as_object().ok_or(ProtocolError::NotAnObject)?;

    let referee_name = match object.get("refereeName").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => UNKNOWN_JUDGE.to_string(),
    };

    Ok(Submission {
        referee_name,
        player1_accuracy: lenient_f64(object.get("player1Accuracy")),
        player2_accuracy: lenient_f64(object.get("player2Accuracy")),
        player1_presentation: lenient_f64(object.get("player1Presentation")),
        player2_presentation: lenient_f64(object.get("player2Presentation")),
    })
}

/// Coerce an optional JSON value to a finite f64, defaulting to 0.0.
fn lenient_f64(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}
