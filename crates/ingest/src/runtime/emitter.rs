use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::IngestError;

/// Sending half handed to a producer.
///
/// Every emission is a cancellation point: a producer blocked on a full
/// channel wakes up as soon as the token fires.
pub struct Emitter<T> {
    name: &'static str,
    tx: mpsc::Sender<T>,
    cancel_token: CancellationToken,
    emitted: Arc<AtomicUsize>,
}

impl<T: Send> Emitter<T> {
    pub(crate) fn new(
        name: &'static str,
        tx: mpsc::Sender<T>,
        cancel_token: CancellationToken,
        emitted: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            name,
            tx,
            cancel_token,
            emitted,
        }
    }

    pub async fn emit(&self, item: T) -> Result<(), IngestError> {
        let sent = tokio::select! {
            biased;
            _ = self.cancel_token.cancelled() => return Err(IngestError::Cancelled),
            sent = self.tx.send(item) => sent,
        };

        sent.map_err(|_| IngestError::Closed(self.name.to_string()))?;
        self.emitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
