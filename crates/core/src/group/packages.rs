use std::collections::BTreeMap;

use lsif_bundle_api::{Package, PackageReference, create_filter_with_limit};
use rayon::prelude::*;
use tracing::debug;

use crate::error::{BundleError, Result};
use crate::state::{Moniker, PackageInformation, State};

type PackageKey<'a> = (&'a str, &'a str, &'a str);

/// Packages provided by the dump, one per (scheme, name, version).
pub fn gather_packages(state: &State, dump_id: i64) -> Vec<Package> {
    let mut uniques: BTreeMap<PackageKey<'_>, Package> = BTreeMap::new();

    for moniker_id in state.exported_monikers.iter() {
        let Some((moniker, info)) = resolve_package(state, moniker_id) else {
            continue;
        };

        uniques.insert(
            (moniker.scheme.as_str(), info.name.as_str(), info.version.as_str()),
            Package {
                dump_id,
                scheme: moniker.scheme.clone(),
                name: info.name.clone(),
                version: info.version.clone(),
                manager: info.manager.clone(),
            },
        );
    }

    uniques.into_values().collect()
}

/// Packages used by the dump, each with a filter over the imported identifiers.
///
/// A filter that cannot be built within `max_filter_bits` fails the whole
/// call; a reference without a filter could never match at query time.
pub fn gather_package_references(
    state: &State,
    dump_id: i64,
    max_filter_bits: usize,
) -> Result<Vec<PackageReference>> {
    struct Expanded<'a> {
        scheme: &'a str,
        name: &'a str,
        version: &'a str,
        manager: &'a str,
        identifiers: Vec<&'a str>,
    }

    let mut uniques: BTreeMap<PackageKey<'_>, Expanded<'_>> = BTreeMap::new();

    for moniker_id in state.imported_monikers.iter() {
        let Some((moniker, info)) = resolve_package(state, moniker_id) else {
            continue;
        };

        let entry = uniques
            .entry((moniker.scheme.as_str(), info.name.as_str(), info.version.as_str()))
            .or_insert_with(|| Expanded {
                scheme: moniker.scheme.as_str(),
                name: info.name.as_str(),
                version: info.version.as_str(),
                manager: info.manager.as_str(),
                identifiers: Vec::new(),
            });
        entry.manager = info.manager.as_str();
        entry.identifiers.push(moniker.identifier.as_str());
    }

    uniques
        .into_par_iter()
        .map(|(_, expanded)| {
            let filter = create_filter_with_limit(&expanded.identifiers, max_filter_bits)
                .map_err(|source| BundleError::PackageReferences {
                    scheme: expanded.scheme.to_string(),
                    name: expanded.name.to_string(),
                    version: expanded.version.to_string(),
                    source,
                })?;

            Ok(PackageReference {
                dump_id,
                scheme: expanded.scheme.to_string(),
                name: expanded.name.to_string(),
                version: expanded.version.to_string(),
                manager: expanded.manager.to_string(),
                filter,
            })
        })
        .collect()
}

fn resolve_package(state: &State, moniker_id: u64) -> Option<(&Moniker, &PackageInformation)> {
    let moniker = state.moniker_data.get(&moniker_id)?;
    let Some(info) = moniker
        .package_information_id
        .and_then(|id| state.package_information_data.get(&id))
    else {
        debug!(
            "skipping moniker {moniker_id} ({}:{}) without package information",
            moniker.scheme, moniker.identifier
        );
        return None;
    };
    Some((moniker, info))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Range;
    use lsif_bundle_api::bloomfilter::MAX_NUM_BITS;
    use lsif_bundle_api::test_filter;

    fn package_state() -> State {
        let mut state = State::new();
        state.add_document(1, "a.go");
        state
            .add_package_information(1, PackageInformation {
                name: "pkg".to_string(),
                version: "v1".to_string(),
                manager: "gomod".to_string(),
            })
            .add_package_information(2, PackageInformation {
                name: "dep".to_string(),
                version: "v2".to_string(),
                manager: "gomod".to_string(),
            });

        let monikers = [
            (10, "pkg.Foo", Some(1)),
            (11, "pkg.Bar", Some(1)),
            (12, "dep.Baz", Some(2)),
            (13, "dep.Qux", Some(2)),
            (14, "local", None),
        ];
        for (id, identifier, package) in monikers {
            state.add_range(1, 100 + id, Range::new(0, 0, 0, 1));
            state.add_moniker(100 + id, id, Moniker {
                kind: "import".to_string(),
                scheme: "go".to_string(),
                identifier: identifier.to_string(),
                package_information_id: package,
            });
        }
        state
    }

    #[test]
    fn exported_monikers_dedupe_by_package() {
        let mut state = package_state();
        state.export_moniker(10).export_moniker(11).export_moniker(14);

        let packages = gather_packages(&state, 42);
        assert_eq!(
            packages,
            vec![Package {
                dump_id: 42,
                scheme: "go".to_string(),
                name: "pkg".to_string(),
                version: "v1".to_string(),
                manager: "gomod".to_string(),
            }]
        );
    }

    #[test]
    fn imported_identifiers_test_positive_in_their_package_filter() {
        let mut state = package_state();
        for id in [10, 11, 12, 13, 14] {
            state.import_moniker(id);
        }

        let references = gather_package_references(&state, 7, MAX_NUM_BITS).unwrap();
        assert_eq!(references.len(), 2);

        let dep = references.iter().find(|r| r.name == "dep").unwrap();
        assert_eq!((dep.dump_id, dep.version.as_str()), (7, "v2"));
        assert!(test_filter(&dep.filter, "dep.Baz").unwrap());
        assert!(test_filter(&dep.filter, "dep.Qux").unwrap());

        let pkg = references.iter().find(|r| r.name == "pkg").unwrap();
        assert!(test_filter(&pkg.filter, "pkg.Foo").unwrap());
        assert!(test_filter(&pkg.filter, "pkg.Bar").unwrap());
    }

    #[test]
    fn no_imports_means_no_references() {
        assert!(
            gather_package_references(&package_state(), 1, MAX_NUM_BITS)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn filter_over_the_bit_limit_names_its_package() {
        let mut state = package_state();
        state.import_moniker(12).import_moniker(13);

        // two identifiers need 32 bits; nothing fits in 16
        let err = gather_package_references(&state, 1, 16).unwrap_err();
        match err {
            BundleError::PackageReferences {
                scheme,
                name,
                version,
                source,
            } => {
                assert_eq!((scheme.as_str(), name.as_str(), version.as_str()), ("go", "dep", "v2"));
                assert!(matches!(source, lsif_bundle_api::FilterError::TooLarge { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
