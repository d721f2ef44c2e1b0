//! Turns a correlated [`State`] into the sharded tables of a bundle.
//!
//! Each table is produced by its own task; tables arrive as streams in
//! [`GroupedBundleDataChans`] and can be materialized into
//! [`GroupedBundleDataMaps`] (and back) for local inspection or patching.

pub mod codec;
pub mod convert;
pub mod documents;
pub mod monikers;
pub mod packages;
pub mod result_chunks;

use std::collections::HashMap;
use std::sync::Arc;

use lsif_bundle_api::{
    DocumentData, IndexedResultChunkData, KeyedDocumentData, LocationData, MetaData,
    MonikerLocations, Package, PackageReference, ResultChunkData, num_result_chunks,
};
use lsif_bundle_ingest::{CancellationToken, ItemStream, ProducerOutcome};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::BundleConfig;
use crate::error::{BundleError, Result};
use crate::state::State;

pub use convert::{chans_to_maps, maps_to_chans};
pub use documents::{serialize_bundle_documents, serialize_document};
pub use monikers::{ResultKind, gather_monikers_locations};
pub use packages::{gather_package_references, gather_packages};
pub use result_chunks::serialize_result_chunks;

/// Paths starting with this marker point outside the indexed root.
pub const OUT_OF_ROOT_PREFIX: &str = "..";

pub fn is_out_of_root(path: &str) -> bool {
    path.starts_with(OUT_OF_ROOT_PREFIX)
}

/// scheme -> identifier -> locations
pub type MonikerLocationTable = HashMap<String, HashMap<String, Vec<LocationData>>>;

/// Streaming shape of a bundle. Every stream is single-pass.
pub struct GroupedBundleDataChans {
    pub meta: MetaData,
    pub documents: ItemStream<KeyedDocumentData>,
    pub result_chunks: ItemStream<IndexedResultChunkData>,
    pub definitions: ItemStream<MonikerLocations>,
    pub references: ItemStream<MonikerLocations>,
    pub packages: Vec<Package>,
    pub package_references: Vec<PackageReference>,
}

/// Fully resident shape of a bundle.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct GroupedBundleDataMaps {
    pub meta: MetaData,
    pub documents: HashMap<String, DocumentData>,
    pub result_chunks: HashMap<usize, ResultChunkData>,
    pub definitions: MonikerLocationTable,
    pub references: MonikerLocationTable,
    pub packages: Vec<Package>,
    pub package_references: Vec<PackageReference>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BundleSummary {
    pub documents: usize,
    pub result_chunks: usize,
    pub num_result_chunks: usize,
    pub definitions: usize,
    pub references: usize,
    pub packages: usize,
    pub package_references: usize,
}

impl GroupedBundleDataMaps {
    pub fn summary(&self) -> BundleSummary {
        let count = |table: &MonikerLocationTable| table.values().map(HashMap::len).sum();
        BundleSummary {
            documents: self.documents.len(),
            result_chunks: self.result_chunks.len(),
            num_result_chunks: self.meta.num_result_chunks,
            definitions: count(&self.definitions),
            references: count(&self.references),
            packages: self.packages.len(),
            package_references: self.package_references.len(),
        }
    }
}

/// Groups `state` into a bundle.
///
/// The four table producers start immediately and keep running after this
/// returns; they stop when their streams are drained or dropped, or when
/// `cancel_token` fires. Packages and package references are computed before
/// returning, and a failure there cancels the producers and fails the build.
pub async fn group_bundle_data(
    state: Arc<State>,
    config: &BundleConfig,
    cancel_token: CancellationToken,
) -> Result<GroupedBundleDataChans> {
    let num_results = state.definition_data.len() + state.reference_data.len();
    let meta = MetaData {
        num_result_chunks: num_result_chunks(num_results),
    };
    info!(
        "Grouping {} documents and {} results into {} result chunks",
        state.document_data.len(),
        num_results,
        meta.num_result_chunks
    );

    let producer_token = cancel_token.child_token();
    let flow_control = &config.flow_control;

    let documents =
        serialize_bundle_documents(Arc::clone(&state), flow_control, producer_token.clone());
    let result_chunks = serialize_result_chunks(
        Arc::clone(&state),
        meta.num_result_chunks,
        flow_control,
        producer_token.clone(),
    );
    let definitions = gather_monikers_locations(
        Arc::clone(&state),
        ResultKind::Definition,
        flow_control,
        producer_token.clone(),
    );
    let references = gather_monikers_locations(
        Arc::clone(&state),
        ResultKind::Reference,
        flow_control,
        producer_token.clone(),
    );

    let dump_id = config.dump_id;
    let packages_task = {
        let state = Arc::clone(&state);
        tokio::task::spawn_blocking(move || gather_packages(&state, dump_id))
    };
    let package_references_task = {
        let state = Arc::clone(&state);
        let max_filter_bits = config.max_filter_bits;
        tokio::task::spawn_blocking(move || {
            gather_package_references(&state, dump_id, max_filter_bits)
        })
    };

    let extracted: Result<_> = async {
        let packages = packages_task.await?;
        let package_references = package_references_task.await??;
        Ok((packages, package_references))
    }
    .await;

    let (packages, package_references) = match extracted {
        Ok(extracted) => extracted,
        Err(err) => {
            error!("Bundle build aborted: {err}");
            let outcomes = stop_producers(
                &producer_token,
                documents,
                result_chunks,
                definitions,
                references,
            )
            .await;
            debug!(?outcomes, "producers of aborted build stopped");
            return Err(err);
        }
    };

    if cancel_token.is_cancelled() {
        return Err(BundleError::Cancelled);
    }

    Ok(GroupedBundleDataChans {
        meta,
        documents,
        result_chunks,
        definitions,
        references,
        packages,
        package_references,
    })
}

/// Cancels the producers of an abandoned build and waits for each to exit.
async fn stop_producers(
    producer_token: &CancellationToken,
    documents: ItemStream<KeyedDocumentData>,
    result_chunks: ItemStream<IndexedResultChunkData>,
    definitions: ItemStream<MonikerLocations>,
    references: ItemStream<MonikerLocations>,
) -> [ProducerOutcome; 4] {
    producer_token.cancel();
    let (documents, result_chunks, definitions, references) = tokio::join!(
        producer_outcome(documents),
        producer_outcome(result_chunks),
        producer_outcome(definitions),
        producer_outcome(references),
    );
    [documents, result_chunks, definitions, references]
}

async fn producer_outcome<T>(stream: ItemStream<T>) -> ProducerOutcome {
    match stream.join().await {
        Ok(report) => report.outcome,
        Err(err) => ProducerOutcome::Failed(err.to_string()),
    }
}
