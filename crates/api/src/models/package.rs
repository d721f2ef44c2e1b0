use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A package provided by the indexed project.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct Package {
    pub dump_id: i64,
    pub scheme: String,
    pub name: String,
    pub version: String,
    pub manager: String,
}

/// A package used by the indexed project.
///
/// `filter` is an encoded [`crate::BloomFilter`] over every identifier the
/// project imports from the package; test it with [`crate::test_filter`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct PackageReference {
    pub dump_id: i64,
    pub scheme: String,
    pub name: String,
    pub version: String,
    pub manager: String,
    #[serde(with = "serde_bytes")]
    #[schemars(with = "Vec<u8>")]
    pub filter: Vec<u8>,
}
