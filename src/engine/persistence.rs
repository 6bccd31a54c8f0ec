// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Ordered background persistence for an engine.
//!
//! Saves go through one writer task per engine, so the store sees placements
//! in the order they happened. The writer is spawned on the first save made
//! inside a tokio runtime; outside a runtime saves are skipped and logged.

use std::sync::{Arc, OnceLock};

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

use crate::observability::messages::store::{PersistenceFailed, PersistenceSkipped};
use crate::observability::messages::StructuredLog;
use crate::token::Token;
use crate::traits::TokenStore;

enum Command {
    Save(Token),
    Flush(oneshot::Sender<()>),
}

pub(crate) struct Persister {
    store: Arc<dyn TokenStore>,
    writer: OnceLock<mpsc::UnboundedSender<Command>>,
}

impl Persister {
    pub(crate) fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            writer: OnceLock::new(),
        }
    }

    fn writer(&self) -> Option<&mpsc::UnboundedSender<Command>> {
        if let Some(tx) = self.writer.get() {
            return Some(tx);
        }
        let handle = Handle::try_current().ok()?;
        Some(self.writer.get_or_init(|| {
            let (tx, rx) = mpsc::unbounded_channel();
            handle.spawn(write_in_order(self.store.clone(), rx));
            tx
        }))
    }

    /// Queues a snapshot of `token`. Never waits on the store.
    pub(crate) fn save(&self, token: &Token) {
        let queued = self
            .writer()
            .map_or(false, |tx| tx.send(Command::Save(token.clone())).is_ok());
        if !queued {
            PersistenceSkipped { token_id: token.id() }.log();
        }
    }

    /// Resolves once every save queued before the call has been attempted.
    pub(crate) async fn flush(&self) {
        let Some(tx) = self.writer.get() else {
            return;
        };
        let (done, finished) = oneshot::channel();
        if tx.send(Command::Flush(done)).is_ok() {
            let _ = finished.await;
        }
    }
}

// Store errors are logged, never returned or retried.
async fn write_in_order(store: Arc<dyn TokenStore>, mut rx: mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Save(token) => {
                if let Err(e) = store.save(&token).await {
                    PersistenceFailed {
                        token_id: token.id(),
                        error: &e,
                    }
                    .log();
                }
            }
            Command::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::local::InMemoryTokenStore;
    use crate::token::TokenColor;
    use serde_json::json;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_latest_snapshot_wins() {
        let store = Arc::new(InMemoryTokenStore::new());
        let persister = Persister::new(store.clone());
        let mut token = Token::new(json!({}), TokenColor::Pending);

        for step in 0..200 {
            token.move_to(&format!("p{}", step));
            persister.save(&token);
        }
        persister.flush().await;

        let saved = store.get(token.id()).await.unwrap().unwrap();
        assert_eq!(saved.metadata.current_place.as_deref(), Some("p199"));
    }

    #[test]
    fn test_no_runtime_skips_and_flush_returns() {
        let persister = Persister::new(Arc::new(InMemoryTokenStore::new()));
        persister.save(&Token::new(json!({}), TokenColor::Pending));
        assert!(persister.writer.get().is_none());

        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(persister.flush());
    }
}
