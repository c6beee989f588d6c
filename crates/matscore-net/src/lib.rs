//! Judge submission protocol: one short-lived TCP connection per score.
//!
//! A judge device opens a connection to the host, writes one JSON line, and
//! reads one `OK` line back. The host side ([`ScoreServer`]) parses the line
//! leniently, recomputes the derived totals, and upserts the record into the
//! shared scoreboard; the judge side ([`SubmissionClient`]) is the matching
//! protocol peer.

mod client;
mod error;
mod server;
mod wire;

pub use client::SubmissionClient;
pub use error::{IngestError, ProtocolError, ServeError, SubmitError};
pub use server::ScoreServer;
pub use wire::{DEFAULT_PORT, Submission, parse_line};
