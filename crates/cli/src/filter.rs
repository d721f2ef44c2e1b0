use std::path::PathBuf;

use lsif_bundle_api::{PackageReference, test_filter};

use crate::inspect::load_bundle;

pub fn run(
    path: PathBuf,
    scheme: &str,
    name: &str,
    version: &str,
    identifier: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let bundle = load_bundle(&path)?;

    let Some(reference) = find_reference(&bundle.package_references, scheme, name, version) else {
        println!("No reference to {scheme}:{name}@{version} in {}", path.display());
        return Ok(());
    };

    if test_filter(&reference.filter, identifier)? {
        println!("{identifier} may be imported from {name}@{version}");
    } else {
        println!("{identifier} is not imported from {name}@{version}");
    }
    Ok(())
}

fn find_reference<'a>(
    references: &'a [PackageReference],
    scheme: &str,
    name: &str,
    version: &str,
) -> Option<&'a PackageReference> {
    references
        .iter()
        .find(|r| r.scheme == scheme && r.name == name && r.version == version)
}
