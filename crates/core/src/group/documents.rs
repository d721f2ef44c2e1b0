use std::sync::Arc;

use lsif_bundle_api::{
    DiagnosticData, DocumentData, DocumentSymbolData, Id, KeyedDocumentData, MonikerData,
    PackageInformationData, Range as SourceRange, RangeData,
};
use lsif_bundle_ingest::{CancellationToken, FlowControlConfig, ItemStream, spawn_producer};

use super::is_out_of_root;
use crate::state::{
    DocumentSymbolResult, InlineDocumentSymbol, RangeBasedDocumentSymbol, State,
};

/// Inline outlines carry no tag; every node is a declaration.
const INLINE_SYMBOL_TYPE: &str = "definition";

/// Streams one [`KeyedDocumentData`] per in-root document.
pub fn serialize_bundle_documents(
    state: Arc<State>,
    flow_control: &FlowControlConfig,
    cancel_token: CancellationToken,
) -> ItemStream<KeyedDocumentData> {
    spawn_producer("documents", flow_control, cancel_token, move |emitter| async move {
        for (&document_id, path) in &state.document_data {
            if is_out_of_root(path) {
                tracing::trace!("skipping out-of-root document {path}");
                continue;
            }

            let data = KeyedDocumentData {
                path: path.clone(),
                document: serialize_document(&state, document_id),
            };
            emitter.emit(data).await?;
        }
        Ok(())
    })
}

pub fn serialize_document(state: &State, document_id: u64) -> DocumentData {
    let mut document = DocumentData {
        ranges: std::collections::HashMap::with_capacity(state.contains.set_len(document_id)),
        diagnostics: Vec::with_capacity(state.diagnostics.set_len(document_id)),
        symbols: Vec::with_capacity(state.document_symbols.set_len(document_id)),
        ..Default::default()
    };

    for range_id in state.contains.set_iter(document_id) {
        let Some(range) = state.range_data.get(&range_id) else {
            continue;
        };

        let mut moniker_ids = Vec::with_capacity(state.monikers.set_len(range_id));
        for moniker_id in state.monikers.set_iter(range_id) {
            let Some(moniker) = state.moniker_data.get(&moniker_id) else {
                continue;
            };
            moniker_ids.push(Id::from_internal(moniker_id));

            document.monikers.insert(
                Id::from_internal(moniker_id),
                MonikerData {
                    kind: moniker.kind.clone(),
                    scheme: moniker.scheme.clone(),
                    identifier: moniker.identifier.clone(),
                    package_information_id: Id::from_optional(moniker.package_information_id),
                },
            );

            if let Some(package_information_id) = moniker.package_information_id
                && let Some(info) = state.package_information_data.get(&package_information_id)
            {
                document.package_information.insert(
                    Id::from_internal(package_information_id),
                    PackageInformationData {
                        name: info.name.clone(),
                        version: info.version.clone(),
                        manager: info.manager.clone(),
                    },
                );
            }
        }

        document.ranges.insert(
            Id::from_internal(range_id),
            RangeData {
                start_line: range.start_line,
                start_character: range.start_character,
                end_line: range.end_line,
                end_character: range.end_character,
                definition_result_id: Id::from_optional(range.definition_result_id),
                reference_result_id: Id::from_optional(range.reference_result_id),
                hover_result_id: Id::from_optional(range.hover_result_id),
                moniker_ids,
            },
        );

        if let Some(hover_result_id) = range.hover_result_id
            && let Some(text) = state.hover_data.get(&hover_result_id)
        {
            document
                .hover_results
                .insert(Id::from_internal(hover_result_id), text.clone());
        }
    }

    for diagnostic_result_id in state.diagnostics.set_iter(document_id) {
        let Some(diagnostics) = state.diagnostic_results.get(&diagnostic_result_id) else {
            continue;
        };
        document
            .diagnostics
            .extend(diagnostics.iter().map(|diagnostic| DiagnosticData {
                severity: diagnostic.severity,
                code: diagnostic.code.clone(),
                message: diagnostic.message.clone(),
                source: diagnostic.source.clone(),
                start_line: diagnostic.start_line,
                start_character: diagnostic.start_character,
                end_line: diagnostic.end_line,
                end_character: diagnostic.end_character,
            }));
    }

    for document_symbol_id in state.document_symbols.set_iter(document_id) {
        match state.document_symbol_results.get(&document_symbol_id) {
            Some(DocumentSymbolResult::RangeBased(symbols)) => document
                .symbols
                .extend(symbols.iter().filter_map(|s| from_range_based(state, s))),
            Some(DocumentSymbolResult::Inline(symbols)) => {
                document.symbols.extend(symbols.iter().map(from_inline))
            }
            None => {}
        }
    }

    document
}

/// Nodes whose range is unknown are dropped together with their subtree.
fn from_range_based(state: &State, symbol: &RangeBasedDocumentSymbol) -> Option<DocumentSymbolData> {
    let range = state.range_data.get(&symbol.id)?;
    let tag = range.tag.clone().unwrap_or_default();

    Some(DocumentSymbolData {
        symbol_type: tag.tag_type,
        name: tag.text,
        detail: tag.detail,
        kind: tag.kind,
        range: SourceRange::new(
            range.start_line,
            range.start_character,
            range.end_line,
            range.end_character,
        ),
        full_range: tag.full_range,
        children: symbol
            .children
            .iter()
            .filter_map(|child| from_range_based(state, child))
            .collect(),
    })
}

fn from_inline(symbol: &InlineDocumentSymbol) -> DocumentSymbolData {
    DocumentSymbolData {
        symbol_type: INLINE_SYMBOL_TYPE.to_string(),
        name: symbol.name.clone(),
        detail: symbol.detail.clone(),
        kind: symbol.kind,
        range: symbol.selection_range,
        full_range: symbol.range,
        children: symbol.children.iter().map(from_inline).collect(),
    }
}
