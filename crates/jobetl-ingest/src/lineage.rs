use sha2::Digest;

use jobetl_model::RecordId;

/// Content fingerprint of a raw row.
///
/// Deterministic: sha256 over the source name, the row index and every cell,
/// each terminated by a NUL byte, truncated to 16 bytes.
pub fn derive_record_id(source: &str, row: usize, cells: &[String]) -> RecordId {
    let mut hasher = sha2::Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update([0u8]);
    hasher.update(row.to_string().as_bytes());
    hasher.update([0u8]);
    for cell in cells {
        hasher.update(cell.as_bytes());
        hasher.update([0u8]);
    }
    let digest: [u8; 32] = hasher.finalize().into();
    RecordId::from_first_16_bytes_of_sha256(digest)
}
