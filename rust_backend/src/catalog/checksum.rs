//! Checksums tying a tile catalog to the target list it was built from.

use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::TargetList;

/// SHA-256 of `content`, hex encoded.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checksum of the canonical JSON encoding of a target list.
pub fn target_checksum(targets: &TargetList) -> Result<String> {
    Ok(calculate_checksum(&targets.to_canonical_json()?))
}
