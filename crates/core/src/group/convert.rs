//! Lossless reshaping between the streaming and resident bundle shapes.
//!
//! Records are moved, not cloned; the source shape is consumed.

use std::collections::HashMap;

use lsif_bundle_api::{
    DocumentData, IndexedResultChunkData, KeyedDocumentData, MonikerLocations, ResultChunkData,
};
use lsif_bundle_ingest::{
    CancellationToken, FlowControlConfig, ItemStream, ProducerOutcome, spawn_iter,
};

use super::{GroupedBundleDataChans, GroupedBundleDataMaps, MonikerLocationTable};
use crate::error::{BundleError, Result};

pub fn maps_to_chans(
    maps: GroupedBundleDataMaps,
    flow_control: &FlowControlConfig,
    cancel_token: CancellationToken,
) -> GroupedBundleDataChans {
    let GroupedBundleDataMaps {
        meta,
        documents,
        result_chunks,
        definitions,
        references,
        packages,
        package_references,
    } = maps;

    let documents = spawn_iter(
        "documents",
        flow_control,
        cancel_token.clone(),
        documents
            .into_iter()
            .map(|(path, document)| KeyedDocumentData { path, document }),
    );
    let result_chunks = spawn_iter(
        "result_chunks",
        flow_control,
        cancel_token.clone(),
        result_chunks
            .into_iter()
            .map(|(index, result_chunk)| IndexedResultChunkData { index, result_chunk }),
    );
    let definitions = spawn_iter(
        "definitions",
        flow_control,
        cancel_token.clone(),
        flatten_moniker_locations(definitions),
    );
    let references = spawn_iter(
        "references",
        flow_control,
        cancel_token,
        flatten_moniker_locations(references),
    );

    GroupedBundleDataChans {
        meta,
        documents,
        result_chunks,
        definitions,
        references,
        packages,
        package_references,
    }
}

/// Drains every stream. Streams are consumed concurrently so no producer
/// waits on another table's consumer.
///
/// Fails unless every producer ran to completion; a stream cut short by
/// cancellation or a producer failure never yields a bundle.
pub async fn chans_to_maps(chans: GroupedBundleDataChans) -> Result<GroupedBundleDataMaps> {
    let GroupedBundleDataChans {
        meta,
        documents,
        result_chunks,
        definitions,
        references,
        packages,
        package_references,
    } = chans;

    let (documents, result_chunks, definitions, references) = tokio::join!(
        collect_documents(documents),
        collect_result_chunks(result_chunks),
        collect_moniker_locations(definitions),
        collect_moniker_locations(references),
    );

    Ok(GroupedBundleDataMaps {
        meta,
        documents: documents?,
        result_chunks: result_chunks?,
        definitions: definitions?,
        references: references?,
        packages,
        package_references,
    })
}

impl GroupedBundleDataMaps {
    pub fn into_chans(
        self,
        flow_control: &FlowControlConfig,
        cancel_token: CancellationToken,
    ) -> GroupedBundleDataChans {
        maps_to_chans(self, flow_control, cancel_token)
    }
}

impl GroupedBundleDataChans {
    pub async fn into_maps(self) -> Result<GroupedBundleDataMaps> {
        chans_to_maps(self).await
    }
}

fn flatten_moniker_locations(
    table: MonikerLocationTable,
) -> impl Iterator<Item = MonikerLocations> + Send + 'static {
    table.into_iter().flat_map(|(scheme, identifiers)| {
        identifiers
            .into_iter()
            .map(move |(identifier, locations)| MonikerLocations {
                scheme: scheme.clone(),
                identifier,
                locations,
            })
    })
}

async fn collect_documents(
    mut stream: ItemStream<KeyedDocumentData>,
) -> Result<HashMap<String, DocumentData>> {
    let mut documents = HashMap::new();
    while let Some(KeyedDocumentData { path, document }) = stream.next().await {
        documents.insert(path, document);
    }
    finish(stream).await?;
    Ok(documents)
}

async fn collect_result_chunks(
    mut stream: ItemStream<IndexedResultChunkData>,
) -> Result<HashMap<usize, ResultChunkData>> {
    let mut result_chunks = HashMap::new();
    while let Some(IndexedResultChunkData { index, result_chunk }) = stream.next().await {
        result_chunks.insert(index, result_chunk);
    }
    finish(stream).await?;
    Ok(result_chunks)
}

async fn collect_moniker_locations(
    mut stream: ItemStream<MonikerLocations>,
) -> Result<MonikerLocationTable> {
    let mut table = MonikerLocationTable::new();
    while let Some(MonikerLocations {
        scheme,
        identifier,
        locations,
    }) = stream.next().await
    {
        table
            .entry(scheme)
            .or_default()
            .insert(identifier, locations);
    }
    finish(stream).await?;
    Ok(table)
}

/// Waits for a drained stream's producer and checks it ran to the end.
async fn finish<T>(stream: ItemStream<T>) -> Result<()> {
    let producer = stream.name();
    let report = stream.join().await.map_err(|e| BundleError::Producer {
        producer: producer.to_string(),
        reason: e.to_string(),
    })?;

    match report.outcome {
        ProducerOutcome::Completed => Ok(()),
        ProducerOutcome::Cancelled => Err(BundleError::Cancelled),
        ProducerOutcome::Detached => Err(BundleError::Producer {
            producer: producer.to_string(),
            reason: format!("consumer detached after {} items", report.emitted),
        }),
        ProducerOutcome::Failed(reason) => Err(BundleError::Producer {
            producer: producer.to_string(),
            reason,
        }),
    }
}
