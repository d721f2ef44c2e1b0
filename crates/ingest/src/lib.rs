pub mod error;
pub mod runtime;
pub mod types;

pub use error::IngestError;
pub use runtime::{Emitter, FlowControlConfig, ItemStream, spawn_iter, spawn_producer};
pub use tokio_util::sync::CancellationToken;
pub use types::{ProducerOutcome, ProducerReport};
