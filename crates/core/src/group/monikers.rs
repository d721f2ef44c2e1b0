use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use lsif_bundle_api::{LocationData, MonikerLocations};
use lsif_bundle_ingest::{CancellationToken, FlowControlConfig, ItemStream, spawn_producer};

use super::is_out_of_root;
use crate::state::{DefaultIdSetMap, Range, State};

/// Which side of the result tables a moniker table is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Definition,
    Reference,
}

impl ResultKind {
    fn result_id(self, range: &Range) -> Option<u64> {
        match self {
            ResultKind::Definition => range.definition_result_id,
            ResultKind::Reference => range.reference_result_id,
        }
    }

    fn results(self, state: &State) -> &HashMap<u64, DefaultIdSetMap> {
        match self {
            ResultKind::Definition => &state.definition_data,
            ResultKind::Reference => &state.reference_data,
        }
    }

    fn producer_name(self) -> &'static str {
        match self {
            ResultKind::Definition => "definitions",
            ResultKind::Reference => "references",
        }
    }
}

/// Streams one entry per (scheme, identifier) with at least one in-root location.
pub fn gather_monikers_locations(
    state: Arc<State>,
    kind: ResultKind,
    flow_control: &FlowControlConfig,
    cancel_token: CancellationToken,
) -> ItemStream<MonikerLocations> {
    spawn_producer(kind.producer_name(), flow_control, cancel_token, move |emitter| async move {
        for ((scheme, identifier), result_ids) in result_ids_by_moniker(&state, kind) {
            let locations = collect_locations(&state, kind.results(&state), &result_ids);
            if locations.is_empty() {
                continue;
            }

            let data = MonikerLocations {
                scheme: scheme.to_string(),
                identifier: identifier.to_string(),
                locations,
            };
            emitter.emit(data).await?;
        }
        Ok(())
    })
}

/// Groups result ids by the (scheme, identifier) of every moniker attached to
/// a range pointing at that result.
pub(crate) fn result_ids_by_moniker(
    state: &State,
    kind: ResultKind,
) -> BTreeMap<(&str, &str), BTreeSet<u64>> {
    let mut monikers_by_result = DefaultIdSetMap::new();
    for (&range_id, range) in &state.range_data {
        if let Some(result_id) = kind.result_id(range)
            && let Some(moniker_ids) = state.monikers.get(range_id)
        {
            monikers_by_result.set_union(result_id, moniker_ids);
        }
    }

    let mut grouped: BTreeMap<(&str, &str), BTreeSet<u64>> = BTreeMap::new();
    for &result_id in kind.results(state).keys() {
        for moniker_id in monikers_by_result.set_iter(result_id) {
            let Some(moniker) = state.moniker_data.get(&moniker_id) else {
                continue;
            };
            grouped
                .entry((moniker.scheme.as_str(), moniker.identifier.as_str()))
                .or_default()
                .insert(result_id);
        }
    }
    grouped
}

fn collect_locations(
    state: &State,
    results: &HashMap<u64, DefaultIdSetMap>,
    result_ids: &BTreeSet<u64>,
) -> Vec<LocationData> {
    let mut locations = Vec::new();
    for result_id in result_ids {
        let Some(document_ranges) = results.get(result_id) else {
            continue;
        };

        for (document_id, range_ids) in document_ranges.iter() {
            let Some(uri) = state.document_data.get(&document_id) else {
                continue;
            };
            if is_out_of_root(uri) {
                continue;
            }

            locations.extend(range_ids.iter().filter_map(|range_id| {
                let range = state.range_data.get(&range_id)?;
                Some(LocationData {
                    uri: uri.clone(),
                    start_line: range.start_line,
                    start_character: range.start_character,
                    end_line: range.end_line,
                    end_character: range.end_character,
                })
            }));
        }
    }
    locations
}
