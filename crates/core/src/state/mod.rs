//! Correlated index data as handed over by the dump correlator.
//!
//! Ids are process-local integers. Optional references use `Option<u64>`;
//! the bundle writer turns `None` into the reserved empty [`Id`].
//!
//! [`Id`]: lsif_bundle_api::Id

pub mod datastructures;

use crate::error::{BundleError, Result};
use lsif_bundle_api::Range as SourceRange;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub use datastructures::{DefaultIdSetMap, IdSet};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct State {
    /// Document id to path relative to the indexed root.
    pub document_data: HashMap<u64, String>,
    pub range_data: HashMap<u64, Range>,
    pub hover_data: HashMap<u64, String>,
    pub moniker_data: HashMap<u64, Moniker>,
    pub package_information_data: HashMap<u64, PackageInformation>,
    pub diagnostic_results: HashMap<u64, Vec<Diagnostic>>,
    pub document_symbol_results: HashMap<u64, DocumentSymbolResult>,
    /// Result id to the (document, ranges) it points at.
    pub definition_data: HashMap<u64, DefaultIdSetMap>,
    pub reference_data: HashMap<u64, DefaultIdSetMap>,
    /// Document id to contained range ids.
    pub contains: DefaultIdSetMap,
    /// Range id to attached moniker ids.
    pub monikers: DefaultIdSetMap,
    /// Document id to diagnostic result ids.
    pub diagnostics: DefaultIdSetMap,
    /// Document id to document symbol result ids.
    pub document_symbols: DefaultIdSetMap,
    pub exported_monikers: IdSet,
    pub imported_monikers: IdSet,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Range {
    pub start_line: u32,
    pub start_character: u32,
    pub end_line: u32,
    pub end_character: u32,
    #[serde(default)]
    pub definition_result_id: Option<u64>,
    #[serde(default)]
    pub reference_result_id: Option<u64>,
    #[serde(default)]
    pub hover_result_id: Option<u64>,
    #[serde(default)]
    pub tag: Option<RangeTag>,
}

impl Range {
    pub fn new(start_line: u32, start_character: u32, end_line: u32, end_character: u32) -> Self {
        Self {
            start_line,
            start_character,
            end_line,
            end_character,
            ..Default::default()
        }
    }

    pub fn with_definition_result(mut self, id: u64) -> Self {
        self.definition_result_id = Some(id);
        self
    }

    pub fn with_reference_result(mut self, id: u64) -> Self {
        self.reference_result_id = Some(id);
        self
    }

    pub fn with_hover_result(mut self, id: u64) -> Self {
        self.hover_result_id = Some(id);
        self
    }

    pub fn with_tag(mut self, tag: RangeTag) -> Self {
        self.tag = Some(tag);
        self
    }
}

/// Symbol information attached to a range, used by range-based outlines.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeTag {
    #[serde(rename = "type")]
    pub tag_type: String,
    pub text: String,
    pub kind: i32,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub full_range: SourceRange,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Moniker {
    pub kind: String,
    pub scheme: String,
    pub identifier: String,
    #[serde(default)]
    pub package_information_id: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageInformation {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub manager: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: i32,
    #[serde(default)]
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub source: String,
    pub start_line: u32,
    pub start_character: u32,
    pub end_line: u32,
    pub end_character: u32,
}

/// Outline of one document, in whichever shape the indexer emitted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "format", content = "symbols", rename_all = "snake_case")]
pub enum DocumentSymbolResult {
    /// Nodes point at ranges whose tags carry the symbol information.
    RangeBased(Vec<RangeBasedDocumentSymbol>),
    /// Nodes carry their own symbol information.
    Inline(Vec<InlineDocumentSymbol>),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeBasedDocumentSymbol {
    pub id: u64,
    #[serde(default)]
    pub children: Vec<RangeBasedDocumentSymbol>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineDocumentSymbol {
    pub name: String,
    #[serde(default)]
    pub detail: String,
    pub kind: i32,
    pub range: SourceRange,
    pub selection_range: SourceRange,
    #[serde(default)]
    pub children: Vec<InlineDocumentSymbol>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let state = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(state)
    }

    pub fn add_document(&mut self, document_id: u64, path: impl Into<String>) -> &mut Self {
        self.document_data.insert(document_id, path.into());
        self
    }

    /// Inserts a range and records it as contained in `document_id`.
    pub fn add_range(&mut self, document_id: u64, range_id: u64, range: Range) -> &mut Self {
        self.range_data.insert(range_id, range);
        self.contains.set_add(document_id, range_id);
        self
    }

    pub fn add_hover(&mut self, hover_result_id: u64, text: impl Into<String>) -> &mut Self {
        self.hover_data.insert(hover_result_id, text.into());
        self
    }

    pub fn add_moniker(&mut self, range_id: u64, moniker_id: u64, moniker: Moniker) -> &mut Self {
        self.moniker_data.insert(moniker_id, moniker);
        self.monikers.set_add(range_id, moniker_id);
        self
    }

    pub fn add_package_information(&mut self, id: u64, info: PackageInformation) -> &mut Self {
        self.package_information_data.insert(id, info);
        self
    }

    pub fn add_definition_location(
        &mut self,
        result_id: u64,
        document_id: u64,
        range_id: u64,
    ) -> &mut Self {
        self.definition_data
            .entry(result_id)
            .or_default()
            .set_add(document_id, range_id);
        self
    }

    pub fn add_reference_location(
        &mut self,
        result_id: u64,
        document_id: u64,
        range_id: u64,
    ) -> &mut Self {
        self.reference_data
            .entry(result_id)
            .or_default()
            .set_add(document_id, range_id);
        self
    }

    pub fn add_diagnostics(
        &mut self,
        document_id: u64,
        diagnostic_result_id: u64,
        diagnostics: Vec<Diagnostic>,
    ) -> &mut Self {
        self.diagnostic_results
            .insert(diagnostic_result_id, diagnostics);
        self.diagnostics.set_add(document_id, diagnostic_result_id);
        self
    }

    pub fn add_document_symbols(
        &mut self,
        document_id: u64,
        document_symbol_result_id: u64,
        result: DocumentSymbolResult,
    ) -> &mut Self {
        self.document_symbol_results
            .insert(document_symbol_result_id, result);
        self.document_symbols
            .set_add(document_id, document_symbol_result_id);
        self
    }

    pub fn export_moniker(&mut self, moniker_id: u64) -> &mut Self {
        self.exported_monikers.add(moniker_id);
        self
    }

    pub fn import_moniker(&mut self, moniker_id: u64) -> &mut Self {
        self.imported_monikers.add(moniker_id);
        self
    }

    /// Checks that every id referenced from one table exists in its owning table.
    ///
    /// Bundling tolerates dangling ids by skipping them; this is for callers
    /// that load a state from outside the correlator and want a hard failure.
    pub fn validate(&self) -> Result<()> {
        let dangling = |what: &str, id: u64, owner: &str| -> Result<()> {
            Err(BundleError::InvalidState(format!(
                "{what} {id} referenced but missing from {owner}"
            )))
        };

        for (document_id, range_ids) in self.contains.iter() {
            if !self.document_data.contains_key(&document_id) {
                return dangling("document", document_id, "document_data");
            }
            for range_id in range_ids.iter() {
                if !self.range_data.contains_key(&range_id) {
                    return dangling("range", range_id, "range_data");
                }
            }
        }

        for (range_id, moniker_ids) in self.monikers.iter() {
            if !self.range_data.contains_key(&range_id) {
                return dangling("range", range_id, "range_data");
            }
            for moniker_id in moniker_ids.iter() {
                if !self.moniker_data.contains_key(&moniker_id) {
                    return dangling("moniker", moniker_id, "moniker_data");
                }
            }
        }

        for moniker in self.moniker_data.values() {
            if let Some(id) = moniker.package_information_id
                && !self.package_information_data.contains_key(&id)
            {
                return dangling("package information", id, "package_information_data");
            }
        }

        for range in self.range_data.values() {
            if let Some(id) = range.hover_result_id
                && !self.hover_data.contains_key(&id)
            {
                return dangling("hover result", id, "hover_data");
            }
        }

        for locations in self.definition_data.values().chain(self.reference_data.values()) {
            for (document_id, range_ids) in locations.iter() {
                if !self.document_data.contains_key(&document_id) {
                    return dangling("document", document_id, "document_data");
                }
                for range_id in range_ids.iter() {
                    if !self.range_data.contains_key(&range_id) {
                        return dangling("range", range_id, "range_data");
                    }
                }
            }
        }

        for moniker_id in self.exported_monikers.iter().chain(self.imported_monikers.iter()) {
            if !self.moniker_data.contains_key(&moniker_id) {
                return dangling("moniker", moniker_id, "moniker_data");
            }
        }

        Ok(())
    }
}
