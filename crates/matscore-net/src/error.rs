use std::time::Duration;

use thiserror::Error;

/// The request line could not be understood as a submission payload.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload is not a JSON object")]
    NotAnObject,
}

/// Starting the ingestion server failed; the server remains stopped.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to bind port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single submission connection was dropped without an acknowledgment.
///
/// These are logged by the server and never propagate to the accept loop or
/// to other connections; the scoreboard is untouched in every case.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed request: {0}")]
    Malformed(#[from] ProtocolError),

    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    #[error("peer idle past the {0:?} i/o deadline")]
    Timeout(Duration),

    #[error("peer closed the connection before sending a line")]
    Disconnected,
}

/// A judge-side submission attempt failed; the judge may retry.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("could not connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("i/o error during submission: {0}")]
    Io(#[from] std::io::Error),

    #[error("timed out waiting for {0}")]
    Timeout(&'static str),

    #[error("no acknowledgment from host (got {0:?})")]
    Rejected(String),
}
