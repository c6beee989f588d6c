//! The host-side ingestion server.
//!
//! One accept loop on its own task; every accepted connection is served on an
//! independent task so a stalled judge device cannot block the rest of the
//! panel. The scoreboard upsert is the only externally observable effect
//! besides the `OK` acknowledgment line.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use matscore_store::ScoreBoard;

use crate::error::{IngestError, ServeError};
use crate::wire;

/// Bound on each read and each write of the per-connection exchange, so a
/// peer that connects and goes silent is abandoned instead of leaking a task.
const IO_TIMEOUT: Duration = Duration::from_secs(3);

/// Lifecycle owner of the listening socket.
///
/// `start` and `stop` are both idempotent and safe to call from any task;
/// stopping closes the listener immediately (no new connections) while
/// in-flight connection handlers finish naturally on their own I/O deadlines.
pub struct ScoreServer {
    board: ScoreBoard,
    running: Mutex<Option<Running>>,
}

struct Running {
    local_addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ScoreServer {
    /// A stopped server that will ingest into `board` once started.
    pub fn new(board: ScoreBoard) -> Self {
        Self {
            board,
            running: Mutex::new(None),
        }
    }

    /// The board this server ingests into.
    pub fn board(&self) -> &ScoreBoard {
        &self.board
    }

    /// Bind `port` and begin accepting submissions.
    ///
    /// Returns the bound address (useful with port 0 in tests). If the
    /// server is already running this is a no-op that returns the current
    /// address; if the bind fails the server remains stopped and the
    /// operator may retry.
    pub async fn start(&self, port: u16) -> Result<SocketAddr, ServeError> {
        let mut running = self.running.lock().await;
        if let Some(current) = running.as_ref() {
            if !current.task.is_finished() {
                info!(addr = %current.local_addr, "server already running, skipping start");
                return Ok(current.local_addr);
            }
        }

        let listener = TcpListener::bind(("0.0.0.0", port))
            .await
            .map_err(|source| ServeError::Bind { port, source })?;
        let local_addr = listener.local_addr()?;

        let (shutdown, shutdown_rx) = watch::channel(false);
        let board = self.board.clone();
        let task = tokio::spawn(accept_loop(listener, board, shutdown_rx));

        info!(addr = %local_addr, "score server listening");
        *running = Some(Running {
            local_addr,
            shutdown,
            task,
        });
        Ok(local_addr)
    }

    /// Stop accepting connections and release the port.
    ///
    /// Idempotent; safe while submissions are in flight.
    pub async fn stop(&self) {
        let Some(current) = self.running.lock().await.take() else {
            return;
        };
        let _ = current.shutdown.send(true);
        // The accept loop drops the listener as soon as it sees the signal;
        // connection tasks already spawned complete on their own deadlines.
        let _ = current.task.await;
        info!("score server stopped");
    }

    /// Address the server is currently bound to, if running.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.running
            .lock()
            .await
            .as_ref()
            .filter(|r| !r.task.is_finished())
            .map(|r| r.local_addr)
    }

    pub async fn is_running(&self) -> bool {
        self.local_addr().await.is_some()
    }
}

async fn accept_loop(
    listener: TcpListener,
    board: ScoreBoard,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let board = board.clone();
                    tokio::spawn(async move {
                        if let Err(err) = handle_submission(stream, board).await {
                            // Per-connection failures stay here; the loop and
                            // the other connections never see them.
                            warn!(%peer, error = %err, "submission dropped");
                        }
                    });
                }
                Err(err) => warn!(error = %err, "accept failed"),
            },
        }
    }
}

/// Serve one submission exchange: read a line, parse, upsert, acknowledge.
///
/// Any failure closes the connection without an acknowledgment and leaves
/// the board untouched; the judge client reports the missing `OK` locally.
async fn handle_submission(stream: TcpStream, board: ScoreBoard) -> Result<(), IngestError> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    let read = tokio::time::timeout(IO_TIMEOUT, reader.read_line(&mut line))
        .await
        .map_err(|_| IngestError::Timeout(IO_TIMEOUT))??;
    if read == 0 {
        return Err(IngestError::Disconnected);
    }

    let record = wire::parse_line(&line)?.into_record();
    info!(
        judge = %record.judge_id,
        a_total = record.a_total,
        b_total = record.b_total,
        "score ingested"
    );
    board.upsert(record);

    let stream = reader.get_mut();
    tokio::time::timeout(IO_TIMEOUT, stream.write_all(b"OK\n"))
        .await
        .map_err(|_| IngestError::Timeout(IO_TIMEOUT))??;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::io::AsyncReadExt;

    async fn started_server() -> (ScoreServer, SocketAddr) {
        let server = ScoreServer::new(ScoreBoard::new());
        let addr = server.start(0).await.unwrap();
        (server, addr)
    }

    async fn raw_exchange(addr: SocketAddr, line: &str) -> String {
        let mut stream = TcpStream::connect(("127.0.0.1", addr.port())).await.unwrap();
        stream.write_all(line.as_bytes()).await.unwrap();
        stream.write_all(b"\n").await.unwrap();
        let mut ack = String::new();
        stream.read_to_string(&mut ack).await.unwrap();
        ack
    }

    #[tokio::test]
    async fn valid_submission_is_acked_and_stored() {
        let (server, addr) = started_server().await;
        let ack = raw_exchange(
            addr,
            r#"{"refereeName":"A","player1Accuracy":3.7,"player2Accuracy":3.9,"player1Presentation":8.2,"player2Presentation":8.5}"#,
        )
        .await;
        assert_eq!(ack, "OK\n");

        let snapshot = server.board().snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].judge_id, "A");
        assert_eq!(snapshot[0].a_total, 11.9);
        assert_eq!(snapshot[0].b_total, 12.4);
        server.stop().await;
    }

    #[tokio::test]
    async fn malformed_line_is_dropped_without_ack() {
        let (server, addr) = started_server().await;
        let ack = raw_exchange(addr, "this is not json").await;
        assert_eq!(ack, "");
        assert!(server.board().is_empty());

        // The server keeps running and serves the next judge.
        let ack = raw_exchange(addr, r#"{"refereeName":"B","player1Accuracy":4.0}"#).await;
        assert_eq!(ack, "OK\n");
        assert_eq!(server.board().len(), 1);
        server.stop().await;
    }

    #[tokio::test]
    async fn resubmission_replaces_not_duplicates() {
        let (server, addr) = started_server().await;
        raw_exchange(addr, r#"{"refereeName":"Judge","player1Accuracy":3.0}"#).await;
        raw_exchange(addr, r#"{"refereeName":"JUDGE","player1Accuracy":3.6}"#).await;

        let snapshot = server.board().snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].a_accuracy, 3.6);
        server.stop().await;
    }

    #[tokio::test]
    async fn idle_connection_does_not_block_others() {
        let (server, addr) = started_server().await;
        // Connect and send nothing; the handler waits on its own deadline.
        let _idle = TcpStream::connect(("127.0.0.1", addr.port())).await.unwrap();

        let ack = raw_exchange(addr, r#"{"refereeName":"C","player1Accuracy":2.0}"#).await;
        assert_eq!(ack, "OK\n");
        server.stop().await;
    }

    #[tokio::test]
    async fn concurrent_distinct_judges_all_land() {
        let (server, addr) = started_server().await;
        let tasks: Vec<_> = (0..10)
            .map(|i| {
                tokio::spawn(async move {
                    raw_exchange(
                        addr,
                        &format!(r#"{{"refereeName":"judge-{i}","player1Accuracy":3.0}}"#),
                    )
                    .await
                })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap(), "OK\n");
        }
        assert_eq!(server.board().len(), 10);
        server.stop().await;
    }

    #[tokio::test]
    async fn bind_conflict_reports_and_leaves_first_running() {
        let (server, addr) = started_server().await;

        let second = ScoreServer::new(ScoreBoard::new());
        let err = second.start(addr.port()).await.unwrap_err();
        assert!(matches!(err, ServeError::Bind { port, .. } if port == addr.port()));
        assert!(!second.is_running().await);

        // The first server is unaffected.
        let ack = raw_exchange(addr, r#"{"refereeName":"D","player1Accuracy":1.0}"#).await;
        assert_eq!(ack, "OK\n");
        server.stop().await;
    }

    #[tokio::test]
    async fn start_is_idempotent() {
        let (server, addr) = started_server().await;
        let again = server.start(0).await.unwrap();
        assert_eq!(again, addr);
        server.stop().await;
    }

    #[tokio::test]
    async fn stop_is_idempotent_and_releases_the_port() {
        let (server, addr) = started_server().await;
        server.stop().await;
        server.stop().await;
        assert!(!server.is_running().await);

        // The port is free for a fresh bind.
        let listener = TcpListener::bind(addr).await.unwrap();
        drop(listener);
    }

    #[tokio::test]
    async fn restart_after_stop_serves_again() {
        let (server, _addr) = started_server().await;
        server.stop().await;

        let addr = server.start(0).await.unwrap();
        let ack = raw_exchange(addr, r#"{"refereeName":"E","player1Accuracy":2.5}"#).await;
        assert_eq!(ack, "OK\n");
        server.stop().await;
    }
}
