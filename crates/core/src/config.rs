use lsif_bundle_api::bloomfilter::MAX_NUM_BITS;
use lsif_bundle_ingest::FlowControlConfig;

pub const CHANNEL_CAPACITY_ENV: &str = "LSIF_BUNDLE_CHANNEL_CAPACITY";

/// Knobs for one bundle build. Chunk sizing is fixed by the bundle format
/// (see `lsif_bundle_api::shard`).
#[derive(Debug, Clone)]
pub struct BundleConfig {
    /// Stamped onto every package and package reference.
    pub dump_id: i64,
    pub flow_control: FlowControlConfig,
    /// Widest package reference filter the build may produce. A package
    /// importing more identifiers than fit fails the build.
    pub max_filter_bits: usize,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            dump_id: 0,
            flow_control: FlowControlConfig::default(),
            max_filter_bits: MAX_NUM_BITS,
        }
    }
}

impl BundleConfig {
    /// Defaults, with the channel capacity overridable from the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var(CHANNEL_CAPACITY_ENV) {
            match val.parse() {
                Ok(capacity) => config.flow_control.channel_capacity = capacity,
                Err(_) => tracing::warn!(
                    "Invalid {CHANNEL_CAPACITY_ENV} value: {val}, using default: {}",
                    config.flow_control.channel_capacity
                ),
            }
        }

        config
    }

    pub fn with_dump_id(mut self, dump_id: i64) -> Self {
        self.dump_id = dump_id;
        self
    }

    pub fn with_channel_capacity(mut self, channel_capacity: usize) -> Self {
        self.flow_control.channel_capacity = channel_capacity;
        self
    }

    pub fn with_max_filter_bits(mut self, max_filter_bits: usize) -> Self {
        self.max_filter_bits = max_filter_bits;
        self
    }
}
