pub mod config;
pub mod error;
pub mod group;
pub mod logging;
pub mod state;

pub use config::BundleConfig;
pub use error::{BundleError, Result};
pub use group::{
    BundleSummary, GroupedBundleDataChans, GroupedBundleDataMaps, MonikerLocationTable,
    group_bundle_data, is_out_of_root,
};
pub use lsif_bundle_ingest::CancellationToken;
pub use state::State;
