use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::IngestError;
use crate::types::ProducerReport;

pub mod emitter;
pub mod flow_control;
pub mod kernel;

pub use emitter::Emitter;
pub use flow_control::FlowControlConfig;
pub use kernel::{spawn_iter, spawn_producer};

/// Single-pass sequence of items fed by one producer task.
pub struct ItemStream<T> {
    name: &'static str,
    rx: mpsc::Receiver<T>,
    task: JoinHandle<ProducerReport>,
}

impl<T> ItemStream<T> {
    pub(crate) fn new(
        name: &'static str,
        rx: mpsc::Receiver<T>,
        task: JoinHandle<ProducerReport>,
    ) -> Self {
        Self { name, rx, task }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Next item, or `None` once the producer has stopped.
    pub async fn next(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Drains the stream into any collection.
    pub async fn collect<C>(mut self) -> C
    where
        C: Default + Extend<T>,
    {
        let mut out = C::default();
        while let Some(item) = self.rx.recv().await {
            out.extend(std::iter::once(item));
        }
        out
    }

    /// Stops accepting items and waits for the producer to exit.
    ///
    /// Items still buffered in the channel are discarded.
    pub async fn join(mut self) -> Result<ProducerReport, IngestError> {
        self.rx.close();
        self.task
            .await
            .map_err(|e| IngestError::Join(format!("{} producer: {e}", self.name)))
    }
}
