use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::emitter::Emitter;
use super::flow_control::FlowControlConfig;
use super::ItemStream;
use crate::error::IngestError;
use crate::types::{ProducerOutcome, ProducerReport};

/// Spawns `produce` on the current tokio runtime and returns the stream it
/// feeds. The stream ends when the producer returns, is cancelled, or fails.
pub fn spawn_producer<T, F, Fut>(
    name: &'static str,
    config: &FlowControlConfig,
    cancel_token: CancellationToken,
    produce: F,
) -> ItemStream<T>
where
    T: Send + 'static,
    F: FnOnce(Emitter<T>) -> Fut,
    Fut: Future<Output = Result<(), IngestError>> + Send + 'static,
{
    let (tx, rx) = config.open_channel();
    let emitted = Arc::new(AtomicUsize::new(0));
    let fut = produce(Emitter::new(name, tx, cancel_token, Arc::clone(&emitted)));

    let task = tokio::spawn(async move {
        let outcome = match fut.await {
            Ok(()) => ProducerOutcome::Completed,
            Err(IngestError::Cancelled) => ProducerOutcome::Cancelled,
            Err(IngestError::Closed(_)) => ProducerOutcome::Detached,
            Err(err) => {
                warn!("producer {name} failed: {err}");
                ProducerOutcome::Failed(err.to_string())
            }
        };

        let report = ProducerReport {
            name,
            emitted: emitted.load(Ordering::Relaxed),
            outcome,
        };
        debug!(
            producer = report.name,
            emitted = report.emitted,
            outcome = ?report.outcome,
            "producer finished"
        );
        report
    });

    ItemStream::new(name, rx, task)
}

/// Streams the items of an already materialized collection.
pub fn spawn_iter<I>(
    name: &'static str,
    config: &FlowControlConfig,
    cancel_token: CancellationToken,
    items: I,
) -> ItemStream<I::Item>
where
    I: IntoIterator + Send + 'static,
    I::IntoIter: Send,
    I::Item: Send + 'static,
{
    spawn_producer(name, config, cancel_token, move |emitter| async move {
        for item in items {
            emitter.emit(item).await?;
        }
        Ok(())
    })
}
