use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use lsif_bundle_api::{DocumentIdRangeId, Id, IndexedResultChunkData, ResultChunkData, hash_key};
use lsif_bundle_ingest::{CancellationToken, FlowControlConfig, ItemStream, spawn_producer};

use super::is_out_of_root;
use crate::state::State;

/// Streams every non-empty result chunk of a bundle with `num_result_chunks` chunks.
pub fn serialize_result_chunks(
    state: Arc<State>,
    num_result_chunks: usize,
    flow_control: &FlowControlConfig,
    cancel_token: CancellationToken,
) -> ItemStream<IndexedResultChunkData> {
    spawn_producer("result_chunks", flow_control, cancel_token, move |emitter| async move {
        for (index, result_ids) in assign_result_chunks(&state, num_result_chunks) {
            let data = IndexedResultChunkData {
                index,
                result_chunk: build_result_chunk(&state, &result_ids),
            };
            emitter.emit(data).await?;
        }
        Ok(())
    })
}

/// Chunk index to the definition and reference result ids stored in it.
pub(crate) fn assign_result_chunks(
    state: &State,
    num_result_chunks: usize,
) -> BTreeMap<usize, BTreeSet<u64>> {
    let mut assignments: BTreeMap<usize, BTreeSet<u64>> = BTreeMap::new();
    for &id in state.definition_data.keys().chain(state.reference_data.keys()) {
        let index = hash_key(&Id::from_internal(id), num_result_chunks);
        assignments.entry(index).or_default().insert(id);
    }
    assignments
}

pub(crate) fn build_result_chunk(state: &State, result_ids: &BTreeSet<u64>) -> ResultChunkData {
    let mut chunk = ResultChunkData::default();

    for &result_id in result_ids {
        // Every result gets an entry even when all of its locations are
        // pruned, so readers can tell "no locations" from "unknown result".
        let entry = chunk
            .document_id_range_ids
            .entry(Id::from_internal(result_id))
            .or_default();

        let Some(locations) = state
            .definition_data
            .get(&result_id)
            .or_else(|| state.reference_data.get(&result_id))
        else {
            continue;
        };

        for (document_id, range_ids) in locations.iter() {
            let Some(path) = state.document_data.get(&document_id) else {
                continue;
            };
            if is_out_of_root(path) {
                continue;
            }

            chunk
                .document_paths
                .entry(Id::from_internal(document_id))
                .or_insert_with(|| path.clone());

            entry.extend(range_ids.iter().map(|range_id| DocumentIdRangeId {
                document_id: Id::from_internal(document_id),
                range_id: Id::from_internal(range_id),
            }));
        }
    }

    chunk
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Range;

    #[test]
    fn results_land_in_their_hashed_chunk() {
        let mut state = State::new();
        state.add_document(1, "a.go");
        for id in 1..=50u64 {
            state.add_range(1, 1000 + id, Range::new(id as u32, 0, id as u32, 1));
            state.add_definition_location(id, 1, 1000 + id);
            state.add_reference_location(100 + id, 1, 1000 + id);
        }

        let assignments = assign_result_chunks(&state, 7);
        let total: usize = assignments.values().map(BTreeSet::len).sum();
        assert_eq!(total, 100);
        for (index, ids) in &assignments {
            for id in ids {
                assert_eq!(hash_key(&Id::from_internal(*id), 7), *index);
            }
        }
    }

    #[test]
    fn pruned_results_keep_an_empty_entry() {
        let mut state = State::new();
        state
            .add_document(1, "../vendor/dep.go")
            .add_range(1, 10, Range::new(0, 0, 0, 1))
            .add_definition_location(5, 1, 10);

        let chunk = build_result_chunk(&state, &BTreeSet::from([5]));
        assert_eq!(chunk.document_id_range_ids.get(&Id::from("5")), Some(&vec![]));
        assert!(chunk.document_paths.is_empty());
    }

    #[test]
    fn document_paths_are_deduplicated_per_chunk() {
        let mut state = State::new();
        state
            .add_document(1, "a.go")
            .add_range(1, 10, Range::new(0, 0, 0, 1))
            .add_range(1, 11, Range::new(1, 0, 1, 1))
            .add_definition_location(5, 1, 10)
            .add_reference_location(6, 1, 10)
            .add_reference_location(6, 1, 11);

        let chunk = build_result_chunk(&state, &BTreeSet::from([5, 6]));
        assert_eq!(chunk.document_paths.len(), 1);
        assert_eq!(chunk.document_paths[&Id::from("1")], "a.go");
        assert_eq!(chunk.document_id_range_ids[&Id::from("5")].len(), 1);
        assert_eq!(
            chunk.document_id_range_ids[&Id::from("6")],
            vec![
                DocumentIdRangeId { document_id: Id::from("1"), range_id: Id::from("10") },
                DocumentIdRangeId { document_id: Id::from("1"), range_id: Id::from("11") },
            ]
        );
    }
}
