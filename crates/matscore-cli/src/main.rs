use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;

use matscore_core::{PanelSize, ScoreRecord, format_score3};
use matscore_host::HostSession;
use matscore_net::{DEFAULT_PORT, SubmissionClient};

#[derive(Parser)]
#[command(name = "matscore", version, about = "LAN score ingestion and aggregation host")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the host: accept judge submissions and log the live scoreboard.
    Host {
        /// Port to listen on.
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Expected judge-panel size (3, 5, or 7).
        #[arg(long, default_value = "3")]
        panel: PanelSize,
    },

    /// Submit one score to a running host (the judge side).
    Submit {
        /// Host IP or name to submit to.
        #[arg(long)]
        host: String,

        /// Host port.
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Judge identity; resubmitting under the same name replaces.
        #[arg(long)]
        judge: String,

        /// Competitor A accuracy subscore.
        #[arg(long, default_value_t = 0.0)]
        a_accuracy: f64,

        /// Competitor B accuracy subscore.
        #[arg(long, default_value_t = 0.0)]
        b_accuracy: f64,

        /// Competitor A presentation subscore.
        #[arg(long, default_value_t = 0.0)]
        a_presentation: f64,

        /// Competitor B presentation subscore.
        #[arg(long, default_value_t = 0.0)]
        b_presentation: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("matscore v{}", env!("CARGO_PKG_VERSION"));

    match Cli::parse().command {
        Command::Host { port, panel } => run_host(port, panel).await,
        Command::Submit {
            host,
            port,
            judge,
            a_accuracy,
            b_accuracy,
            a_presentation,
            b_presentation,
        } => {
            let record =
                ScoreRecord::new(judge, a_accuracy, b_accuracy, a_presentation, b_presentation);
            let client = SubmissionClient::new(host, port);
            client.submit(&record).await?;
            info!(
                a_total = %format_score3(record.a_total),
                b_total = %format_score3(record.b_total),
                "score submitted"
            );
            Ok(())
        }
    }
}

async fn run_host(port: u16, panel: PanelSize) -> anyhow::Result<()> {
    let session = HostSession::new(panel);
    let addr = session.start(port).await?;
    info!(%addr, panel = %session.panel(), "host ready, Ctrl-C to stop");

    let mut last_received = 0;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = tokio::time::sleep(Duration::from_secs(1)) => {
                let result = session.aggregate();
                if result.received != last_received {
                    last_received = result.received;
                    info!(
                        received = result.received,
                        expected = result.expected,
                        competitor_a = %format_score3(result.competitor_a_average),
                        competitor_b = %format_score3(result.competitor_b_average),
                        final_score = %format_score3(result.final_score),
                        dropped_extremes = result.dropped_extremes,
                        "scoreboard"
                    );
                }
            }
        }
    }

    session.stop().await;
    Ok(())
}
