//! Asset version tokens derived from the frontend build manifest.

use std::{fs, path::Path};

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Number of hex characters kept from the manifest digest
const VERSION_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum AssetVersionError {
    #[error("failed to read asset manifest {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Hash raw manifest bytes into a short, stable version token
pub fn version_from_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut version = hex::encode(digest);
    version.truncate(VERSION_LEN);
    version
}

/// Read a manifest file (e.g. `manifest.json` emitted by the bundler) and hash it
pub fn version_from_manifest(path: impl AsRef<Path>) -> Result<String, AssetVersionError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| AssetVersionError::Read {
        path: path.display().to_string(),
        source,
    })?;

    Ok(version_from_bytes(&bytes))
}
