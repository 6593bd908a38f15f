//! Debounced prompt auto-save.
//!
//! Prompt edits arrive keystroke by keystroke; writing the store on each
//! one would thrash a file-backed store. [`PromptAutosave`] coalesces
//! edits per row and flushes after a quiet period. Failed saves are
//! logged and dropped, never surfaced to the editing flow.

use crate::service::ContentService;
use crate::types::{PromptPair, RowId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handle to a background task that persists queued prompt edits after
/// the configured debounce.
#[derive(Debug)]
pub struct PromptAutosave {
    tx: mpsc::UnboundedSender<(RowId, PromptPair)>,
    worker: JoinHandle<()>,
}

impl PromptAutosave {
    /// Spawn the auto-save worker for `service`, using its configured
    /// debounce.
    #[must_use]
    pub fn spawn(service: Arc<ContentService>) -> Self {
        let debounce = service.config().autosave_debounce;
        Self::spawn_with_debounce(service, debounce)
    }

    /// Spawn with an explicit debounce.
    #[must_use]
    pub fn spawn_with_debounce(service: Arc<ContentService>, debounce: Duration) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<(RowId, PromptPair)>();
        let worker = tokio::spawn(async move {
            let mut pending: HashMap<RowId, PromptPair> = HashMap::new();
            loop {
                tokio::select! {
                    message = rx.recv() => match message {
                        Some((id, pair)) => {
                            pending.insert(id, pair);
                        }
                        None => {
                            flush(&service, &mut pending);
                            break;
                        }
                    },
                    () = tokio::time::sleep(debounce), if !pending.is_empty() => {
                        flush(&service, &mut pending);
                    }
                }
            }
        });
        Self { tx, worker }
    }

    /// Queue an edited pair for `id`. The latest edit per row wins; the
    /// write happens after the debounce elapses without further edits.
    pub fn queue(&self, id: RowId, pair: PromptPair) {
        // A closed worker means shutdown is underway; the edit is lost
        // by design of last-write-wins storage.
        let _ = self.tx.send((id, pair));
    }

    /// Flush anything pending and wait for the worker to exit.
    pub async fn shutdown(self) {
        drop(self.tx);
        let _ = self.worker.await;
    }
}

fn flush(service: &ContentService, pending: &mut HashMap<RowId, PromptPair>) {
    for (id, pair) in pending.drain() {
        if let Err(error) = service.save_prompts(id, &pair) {
            tracing::warn!(%id, %error, "prompt auto-save failed");
        }
    }
}
