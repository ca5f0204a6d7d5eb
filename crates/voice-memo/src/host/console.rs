use voice_memo_core::capability::ConfirmDialog;

use std::{io::Write, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, instrument};

/// Shared console line receiver.
pub(crate) type ConsoleLines = Arc<Mutex<mpsc::Receiver<String>>>;

/// Yes/no prompt answered on the console.
///
/// Reads from the same line channel as the command loop, so it must only be
/// awaited while the loop is not itself waiting for input.
pub struct ConsoleConfirm {
    lines: ConsoleLines,
}

impl ConsoleConfirm {
    /// Prompt reading answers from `lines`.
    pub(crate) fn new(lines: ConsoleLines) -> Self {
        Self { lines }
    }
}

/// Whether `answer` accepts the prompt.
pub(crate) fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl ConfirmDialog for ConsoleConfirm {
    #[instrument(skip(self))]
    async fn confirm(&self, title: &str, message: &str) -> bool {
        print!("{}: {} [y/N] ", title, message);
        let _ = std::io::stdout().flush();

        let answer = self.lines.lock().await.recv().await;
        let accepted = answer.as_deref().is_some_and(is_yes);

        debug!(accepted, "Confirmation answered");
        accepted
    }
}
