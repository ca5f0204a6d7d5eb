//! Console input forwarder.
//!
//! Reads stdin on a blocking thread and forwards each line to the app over an
//! async channel. The same channel also answers confirmation prompts.

use crate::{AppError, AppResult};

use std::{io::BufRead, panic::Location, time::Duration};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Forwards console lines to the application.
pub struct InputHandler {
    line_tx: mpsc::Sender<String>,
}

impl InputHandler {
    /// Handler sending lines to `line_tx`.
    pub fn new(line_tx: mpsc::Sender<String>) -> Self {
        Self { line_tx }
    }

    /// Run until shutdown is signalled or stdin closes.
    ///
    /// Consumes the handler so the line sender is dropped on return, which
    /// tells the app that no more input will arrive.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let (event_tx, mut event_rx) = mpsc::channel::<String>(32);

        // Single persistent blocking task reading stdin.
        //
        // Shutdown: when event_rx is dropped (loop breaks), the next
        // event_tx.blocking_send() fails, breaking the blocking loop.
        let handle = tokio::task::spawn_blocking(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if event_tx.blocking_send(line).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Input handler shutting down");
                    break;
                }
                line = event_rx.recv() => match line {
                    Some(line) => self.forward(line).await?,
                    None => {
                        info!("Console input closed");
                        break;
                    }
                }
            }
        }

        drop(event_rx);

        // Best-effort join: the blocking task may be stuck in a read if no
        // line arrives after shutdown. The runtime cleans it up on exit.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Console reader stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Console reader task panicked"),
            Err(_) => debug!(
                "Console reader did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    async fn forward(&self, line: String) -> AppResult<()> {
        self.line_tx
            .send(line)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to forward console line: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
