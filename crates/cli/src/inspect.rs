use std::path::{Path, PathBuf};

use lsif_bundle_core::{BundleError, GroupedBundleDataMaps};
use tabled::{Table, Tabled};

use crate::summary::print_summary;

#[derive(Tabled)]
struct PackageRow {
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Scheme")]
    scheme: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Manager")]
    manager: String,
}

pub fn run(path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let bundle = load_bundle(&path)?;
    print_summary(&bundle.summary());

    let rows: Vec<PackageRow> = bundle
        .packages
        .iter()
        .map(|p| PackageRow {
            kind: "provides",
            scheme: p.scheme.clone(),
            name: p.name.clone(),
            version: p.version.clone(),
            manager: p.manager.clone(),
        })
        .chain(bundle.package_references.iter().map(|r| PackageRow {
            kind: "uses",
            scheme: r.scheme.clone(),
            name: r.name.clone(),
            version: r.version.clone(),
            manager: r.manager.clone(),
        }))
        .collect();

    if !rows.is_empty() {
        println!("{}", Table::new(rows));
    }
    Ok(())
}

/// Reads a bundle written by `group`, as JSON when the file says so.
pub(crate) fn load_bundle(path: &Path) -> Result<GroupedBundleDataMaps, BundleError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => GroupedBundleDataMaps::load_from_json(path),
        _ => GroupedBundleDataMaps::load(path),
    }
}
