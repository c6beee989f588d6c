//! Judge-side submission client: one connection, one line, one ack.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::info;

use matscore_core::ScoreRecord;

use crate::error::SubmitError;
use crate::wire::Submission;

/// Connect and acknowledgment deadlines the judge apps ship with.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(3);

/// Client for submitting one score record to a running host.
///
/// Failures leave nothing behind on the host, so the judge can retry the
/// same submission without re-entering scores; a retry for the same judge
/// identity replaces rather than duplicates.
pub struct SubmissionClient {
    addr: String,
    timeout: Duration,
}

impl SubmissionClient {
    /// Client for the host at `host:port`.
    pub fn new(host: impl AsRef<str>, port: u16) -> Self {
        Self {
            addr: format!("{}:{}", host.as_ref(), port),
            timeout: SUBMIT_TIMEOUT,
        }
    }

    /// Override the connect/ack deadline (tests use a short one).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Submit one record and wait for the host's `OK` line.
    pub async fn submit(&self, record: &ScoreRecord) -> Result<(), SubmitError> {
        let stream = tokio::time::timeout(self.timeout, TcpStream::connect(&self.addr))
            .await
            .map_err(|_| SubmitError::Timeout("connect"))?
            .map_err(|source| SubmitError::Connect {
                addr: self.addr.clone(),
                source,
            })?;

        let mut stream = stream;
        let line = Submission::from_record(record).to_json_line();
        stream.write_all(line.as_bytes()).await?;
        stream.write_all(b"\n").await?;

        let mut reader = BufReader::new(stream);
        let mut ack = String::new();
        let read = tokio::time::timeout(self.timeout, reader.read_line(&mut ack))
            .await
            .map_err(|_| SubmitError::Timeout("acknowledgment"))??;
        if read == 0 || ack.trim() != "OK" {
            return Err(SubmitError::Rejected(ack.trim().to_string()));
        }

        info!(judge = %record.judge_id, addr = %self.addr, "score submitted");
        Ok(())
    }
}
