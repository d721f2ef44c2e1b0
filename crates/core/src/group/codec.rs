use std::path::Path;

use super::GroupedBundleDataMaps;
use crate::error::{BundleError, Result};

impl GroupedBundleDataMaps {
    /// Encodes the bundle as zstd-compressed MessagePack.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let bytes = rmp_serde::to_vec_named(self)
            .map_err(|e| BundleError::Codec(format!("MSGPACK error: {}", e)))?;

        zstd::encode_all(&bytes[..], 0)
            .map_err(|e| BundleError::Codec(format!("Zstd compression failed: {}", e)))
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let decompressed = zstd::decode_all(bytes)
            .map_err(|e| BundleError::Codec(format!("Zstd decompression failed: {}", e)))?;

        rmp_serde::from_slice(&decompressed)
            .map_err(|e| BundleError::Codec(format!("MSGPACK error: {}", e)))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.serialize()?)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::deserialize(&std::fs::read(path)?)
    }

    /// Save bundle to JSON file (for debugging)
    pub fn save_to_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}
