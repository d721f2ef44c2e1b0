mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use lsif_bundle_api::{FilterError, Id, LocationData, hash_key, test_filter};
use lsif_bundle_core::state::Range;
use lsif_bundle_core::{
    BundleConfig, BundleError, GroupedBundleDataMaps, State, group_bundle_data,
};
use lsif_bundle_ingest::CancellationToken;

use common::{moniker, out_of_root_state, package, shared_definition_state, wide_state};

async fn group(state: State) -> GroupedBundleDataMaps {
    let config = BundleConfig::default().with_dump_id(7);
    group_bundle_data(Arc::new(state), &config, CancellationToken::new())
        .await
        .expect("group bundle")
        .into_maps()
        .await
        .expect("drain bundle")
}

#[tokio::test]
async fn shared_definition_lands_in_one_chunk_with_both_locations() {
    let bundle = group(shared_definition_state()).await;

    assert_eq!(bundle.meta.num_result_chunks, 1);
    assert_eq!(bundle.result_chunks.len(), 1);

    let chunk = &bundle.result_chunks[&0usize];
    let locations = &chunk.document_id_range_ids[&Id::from("100")];
    assert_eq!(locations.len(), 2);
    assert_eq!(chunk.document_paths.len(), 2);
    assert_eq!(chunk.document_paths[&Id::from("1")], "a.go");
    assert_eq!(chunk.document_paths[&Id::from("2")], "b.go");

    // the moniker is on one range, but it names the whole result
    let foo = &bundle.definitions["go"]["pkg.Foo"];
    assert_eq!(foo.len(), 2);
    assert!(foo.contains(&LocationData {
        uri: "a.go".to_string(),
        start_line: 3,
        start_character: 5,
        end_line: 3,
        end_character: 8,
    }));
    assert!(bundle.references.is_empty());

    assert_eq!(bundle.packages.len(), 1);
    let pkg = &bundle.packages[0];
    assert_eq!(
        (pkg.scheme.as_str(), pkg.name.as_str(), pkg.version.as_str()),
        ("go", "pkg", "v1")
    );
    assert_eq!(pkg.dump_id, 7);
    assert!(bundle.package_references.is_empty());
}

#[tokio::test]
async fn out_of_root_documents_vanish_from_every_table() {
    let bundle = group(out_of_root_state()).await;

    assert_eq!(bundle.documents.len(), 1);
    assert!(bundle.documents.contains_key("main.go"));

    for chunk in bundle.result_chunks.values() {
        assert!(chunk.document_paths.values().all(|p| !p.starts_with("..")));
        for locations in chunk.document_id_range_ids.values() {
            assert!(locations.iter().all(|l| l.document_id != Id::from("2")));
        }
    }

    // definition 100 only resolves out of root, yet its id stays resolvable
    let chunk = &bundle.result_chunks[&0usize];
    assert!(chunk.document_id_range_ids[&Id::from("100")].is_empty());
    assert_eq!(chunk.document_id_range_ids[&Id::from("200")].len(), 1);

    // the only definition location is out of root, so the entry is dropped
    assert!(bundle.definitions.is_empty());
    let bar = &bundle.references["go"]["outside.Bar"];
    assert_eq!(bar.len(), 1);
    assert_eq!(bar[0].uri, "main.go");
}

#[tokio::test]
async fn every_result_lands_in_exactly_the_chunk_its_id_hashes_to() {
    let state = wide_state(1_500);
    let expected: BTreeSet<u64> = state
        .definition_data
        .keys()
        .chain(state.reference_data.keys())
        .copied()
        .collect();

    let bundle = group(state).await;
    // 3000 results
    assert_eq!(bundle.meta.num_result_chunks, 6);
    assert!(bundle.result_chunks.len() > 1);

    let mut seen = BTreeSet::new();
    for (&index, chunk) in &bundle.result_chunks {
        for id in chunk.document_id_range_ids.keys() {
            assert_eq!(hash_key(id, bundle.meta.num_result_chunks), index);
            let id: u64 = id.as_str().parse().expect("numeric id");
            assert!(seen.insert(id), "result {id} stored twice");
        }
    }
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn chunk_count_scales_with_results() {
    let bundle = group(wide_state(1_500)).await;
    // 3000 results
    assert_eq!(bundle.meta.num_result_chunks, 6);
    assert!(bundle.result_chunks.len() <= 6);

    let total: usize = bundle
        .result_chunks
        .values()
        .map(|c| c.document_id_range_ids.len())
        .sum();
    assert_eq!(total, 3_000);

    let bundle = group(State::new()).await;
    assert_eq!(bundle.meta.num_result_chunks, 1);
    assert!(bundle.documents.is_empty());
    assert!(bundle.result_chunks.is_empty());
}

#[tokio::test]
async fn documents_carry_each_range_exactly_once() {
    let mut state = shared_definition_state();
    state
        .add_range(1, 11, Range::new(9, 0, 9, 2).with_hover_result(500))
        .add_hover(500, "func Foo()");

    let bundle = group(state).await;
    let a = &bundle.documents["a.go"];
    assert_eq!(a.ranges.len(), 2);
    assert_eq!(a.ranges[&Id::from("10")].definition_result_id, Id::from("100"));
    assert_eq!(a.ranges[&Id::from("11")].hover_result_id, Id::from("500"));
    assert_eq!(a.hover_results[&Id::from("500")], "func Foo()");
    assert_eq!(a.monikers[&Id::from("30")].identifier, "pkg.Foo");
    assert_eq!(a.package_information[&Id::from("50")].version, "v1");

    let b = &bundle.documents["b.go"];
    assert_eq!(b.ranges.len(), 1);
    assert!(b.monikers.is_empty());
}

#[tokio::test]
async fn imported_identifiers_test_positive_against_their_package_filter() {
    let mut state = State::new();
    state
        .add_document(1, "main.go")
        .add_package_information(1, package("dep", "v2"))
        .add_package_information(2, package("other", "v0.1.0"));

    let imports = [
        (10, "dep.Open", 1),
        (11, "dep.Close", 1),
        (12, "dep.Open", 1),
        (13, "other.Run", 2),
    ];
    for (id, identifier, info) in imports {
        state
            .add_range(1, 100 + id, Range::new(0, 0, 0, 1))
            .add_moniker(100 + id, id, moniker("import", identifier, Some(info)))
            .import_moniker(id);
    }

    let bundle = group(state).await;
    assert!(bundle.packages.is_empty());
    assert_eq!(bundle.package_references.len(), 2);

    let dep = bundle
        .package_references
        .iter()
        .find(|r| r.name == "dep")
        .expect("dep reference");
    assert_eq!(dep.version, "v2");
    assert_eq!(dep.dump_id, 7);
    assert!(test_filter(&dep.filter, "dep.Open").unwrap());
    assert!(test_filter(&dep.filter, "dep.Close").unwrap());

    let other = bundle
        .package_references
        .iter()
        .find(|r| r.name == "other")
        .expect("other reference");
    assert!(test_filter(&other.filter, "other.Run").unwrap());
}

#[tokio::test]
async fn unbuildable_package_filter_aborts_the_build() {
    let mut state = wide_state(50);
    state
        .add_document(9_000, "vendor.go")
        .add_package_information(9_001, package("dep", "v2"));
    for i in 0..10u64 {
        let range_id = 9_100 + i;
        let moniker_id = 9_200 + i;
        state
            .add_range(9_000, range_id, Range::new(i as u32, 0, i as u32, 1))
            .add_moniker(
                range_id,
                moniker_id,
                moniker("import", &format!("dep.Symbol{i}"), Some(9_001)),
            )
            .import_moniker(moniker_id);
    }

    // ten identifiers need 96 bits
    let config = BundleConfig::default()
        .with_channel_capacity(1)
        .with_max_filter_bits(64);
    let cancel_token = CancellationToken::new();
    let result = group_bundle_data(Arc::new(state), &config, cancel_token.clone()).await;

    match result {
        Err(BundleError::PackageReferences {
            scheme,
            name,
            version,
            source: FilterError::TooLarge { identifiers, .. },
        }) => {
            assert_eq!((scheme.as_str(), name.as_str(), version.as_str()), ("go", "dep", "v2"));
            assert_eq!(identifiers, 10);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("build should fail"),
    }
    // only the build's own producers are cancelled
    assert!(!cancel_token.is_cancelled());

    let bundle = group_bundle_data(Arc::new(wide_state(4)), &config, cancel_token)
        .await
        .expect("group bundle")
        .into_maps()
        .await
        .expect("drain bundle");
    assert_eq!(bundle.documents.len(), 4);
}
