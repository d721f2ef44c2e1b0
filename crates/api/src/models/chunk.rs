use super::id::Id;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, JsonSchema)]
pub struct MetaData {
    pub num_result_chunks: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema)]
pub struct DocumentIdRangeId {
    pub document_id: Id,
    pub range_id: Id,
}

/// One shard of the definition/reference result table.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct ResultChunkData {
    /// Paths of every document referenced from this shard.
    pub document_paths: HashMap<Id, String>,
    /// Result id to the locations it resolves to. Present even when empty.
    pub document_id_range_ids: HashMap<Id, Vec<DocumentIdRangeId>>,
}

/// Stream item for the result chunk table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct IndexedResultChunkData {
    pub index: usize,
    pub result_chunk: ResultChunkData,
}
