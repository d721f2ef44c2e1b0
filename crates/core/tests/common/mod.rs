#![allow(dead_code)]

use lsif_bundle_core::state::{Moniker, PackageInformation, Range, State};

pub fn moniker(kind: &str, identifier: &str, package_information_id: Option<u64>) -> Moniker {
    Moniker {
        kind: kind.to_string(),
        scheme: "go".to_string(),
        identifier: identifier.to_string(),
        package_information_id,
    }
}

pub fn package(name: &str, version: &str) -> PackageInformation {
    PackageInformation {
        name: name.to_string(),
        version: version.to_string(),
        manager: "gomod".to_string(),
    }
}

/// Two documents whose ranges share one definition result. Only the first
/// range carries the exported `pkg.Foo` moniker.
pub fn shared_definition_state() -> State {
    let mut state = State::new();
    state
        .add_document(1, "a.go")
        .add_document(2, "b.go")
        .add_range(1, 10, Range::new(3, 5, 3, 8).with_definition_result(100))
        .add_range(2, 20, Range::new(7, 1, 7, 4).with_definition_result(100))
        .add_package_information(50, package("pkg", "v1"))
        .add_moniker(10, 30, moniker("export", "pkg.Foo", Some(50)))
        .export_moniker(30)
        .add_definition_location(100, 1, 10)
        .add_definition_location(100, 2, 20);
    state
}

/// An in-root document referencing symbols defined in an out-of-root one.
pub fn out_of_root_state() -> State {
    let mut state = State::new();
    state
        .add_document(1, "main.go")
        .add_document(2, "../outside/file.go")
        .add_range(1, 10, Range::new(0, 0, 0, 3).with_reference_result(200))
        .add_range(
            2,
            20,
            Range::new(4, 0, 4, 3)
                .with_definition_result(100)
                .with_reference_result(200),
        )
        .add_moniker(20, 30, moniker("export", "outside.Bar", None))
        .add_definition_location(100, 2, 20)
        .add_reference_location(200, 1, 10)
        .add_reference_location(200, 2, 20);
    state
}

/// A state large enough that every table needs many emissions.
pub fn wide_state(num_documents: u64) -> State {
    let mut state = State::new();
    for document_id in 1..=num_documents {
        let range_id = 10_000 + document_id;
        let moniker_id = 20_000 + document_id;
        let definition_id = 30_000 + document_id;
        let reference_id = 40_000 + document_id;

        state
            .add_document(document_id, format!("src/file{document_id}.go"))
            .add_range(
                document_id,
                range_id,
                Range::new(1, 0, 1, 5)
                    .with_definition_result(definition_id)
                    .with_reference_result(reference_id),
            )
            .add_moniker(
                range_id,
                moniker_id,
                moniker("export", &format!("pkg.Symbol{document_id}"), None),
            )
            .add_definition_location(definition_id, document_id, range_id)
            .add_reference_location(reference_id, document_id, range_id);
    }
    state
}
