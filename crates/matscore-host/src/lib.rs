//! Host session runtime: the control surface a presentation layer drives.
//!
//! A [`HostSession`] owns one scoreboard and one ingestion server for the
//! duration of a hosting session. Presentation layers (a UI, a CLI loop)
//! call `snapshot`/`aggregate` on refresh, `reset` between matches, and
//! `start`/`stop` around the session; nothing here survives the process.

use std::net::SocketAddr;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tracing::info;

use matscore_core::{AggregationResult, PanelSize, ScoreRecord, aggregate};
use matscore_net::{ScoreServer, ServeError};
use matscore_store::ScoreBoard;

/// One hosting session: an empty board, a stopped server, and the
/// configured judge-panel size.
pub struct HostSession {
    board: ScoreBoard,
    server: ScoreServer,
    panel: RwLock<PanelSize>,
    started_at: DateTime<Utc>,
}

impl HostSession {
    /// New session expecting a panel of `panel` judges.
    pub fn new(panel: PanelSize) -> Self {
        let board = ScoreBoard::new();
        let server = ScoreServer::new(board.clone());
        let session = Self {
            board,
            server,
            panel: RwLock::new(panel),
            started_at: Utc::now(),
        };
        info!(panel = %panel, started_at = %session.started_at, "host session created");
        session
    }

    /// Begin accepting judge submissions on `port`.
    ///
    /// Idempotent; a bind failure leaves the session stopped and retryable.
    pub async fn start(&self, port: u16) -> Result<SocketAddr, ServeError> {
        self.server.start(port).await
    }

    /// Stop accepting submissions. Idempotent; already-accepted
    /// connections finish on their own.
    pub async fn stop(&self) {
        self.server.stop().await;
    }

    pub async fn is_running(&self) -> bool {
        self.server.is_running().await
    }

    /// Current entries, one per reporting judge, in arrival order.
    pub fn snapshot(&self) -> Vec<ScoreRecord> {
        self.board.snapshot()
    }

    /// Judging metrics for the session's configured panel size.
    pub fn aggregate(&self) -> AggregationResult {
        self.aggregate_for(self.panel())
    }

    /// Judging metrics against an ad-hoc panel size.
    pub fn aggregate_for(&self, panel: PanelSize) -> AggregationResult {
        aggregate(&self.board.snapshot(), panel)
    }

    /// Clear all judge entries for a new match.
    pub fn reset(&self) {
        info!("match reset");
        self.board.reset();
    }

    pub fn panel(&self) -> PanelSize {
        *self.panel.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Reconfigure the expected panel size mid-session (3, 5, or 7).
    pub fn set_panel(&self, panel: PanelSize) {
        info!(panel = %panel, "panel size changed");
        *self.panel.write().unwrap_or_else(|e| e.into_inner()) = panel;
    }

    /// When this session was created, for display and logs.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Direct access to the shared board (for embedding hosts that wire
    /// their own server or tests that bypass the network).
    pub fn board(&self) -> &ScoreBoard {
        &self.board
    }
}

impl Default for HostSession {
    fn default() -> Self {
        Self::new(PanelSize::default())
    }
}
