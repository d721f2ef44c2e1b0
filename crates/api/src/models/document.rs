use super::id::Id;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, JsonSchema)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, JsonSchema)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start_line: u32, start_character: u32, end_line: u32, end_character: u32) -> Self {
        Self {
            start: Position {
                line: start_line,
                character: start_character,
            },
            end: Position {
                line: end_line,
                character: end_character,
            },
        }
    }
}

/// Self-contained view of one source file.
///
/// Everything a hover or a single-document lookup needs is materialized here
/// (monikers and their package information included), so readers never have to
/// consult another table to render a document.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
pub struct DocumentData {
    pub ranges: HashMap<Id, RangeData>,
    pub hover_results: HashMap<Id, String>,
    pub monikers: HashMap<Id, MonikerData>,
    pub package_information: HashMap<Id, PackageInformationData>,
    pub diagnostics: Vec<DiagnosticData>,
    pub symbols: Vec<DocumentSymbolData>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct RangeData {
    pub start_line: u32,
    pub start_character: u32,
    pub end_line: u32,
    pub end_character: u32,
    pub definition_result_id: Id,
    pub reference_result_id: Id,
    pub hover_result_id: Id,
    pub moniker_ids: Vec<Id>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash, JsonSchema)]
pub struct MonikerData {
    pub kind: String,
    pub scheme: String,
    pub identifier: String,
    pub package_information_id: Id,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash, JsonSchema)]
pub struct PackageInformationData {
    pub name: String,
    pub version: String,
    pub manager: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct DiagnosticData {
    pub severity: i32,
    pub code: String,
    pub message: String,
    pub source: String,
    pub start_line: u32,
    pub start_character: u32,
    pub end_line: u32,
    pub end_character: u32,
}

/// One node of a document's symbol outline.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct DocumentSymbolData {
    #[serde(rename = "type")]
    pub symbol_type: String,
    pub name: String,
    pub detail: String,
    pub kind: i32,
    /// Range of the symbol's name.
    pub range: Range,
    /// Range of the whole declaration, body included.
    pub full_range: Range,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocumentSymbolData>,
}

/// Stream item for the documents table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct KeyedDocumentData {
    pub path: String,
    pub document: DocumentData,
}
