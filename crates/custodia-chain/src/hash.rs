//! Content hashing: SHA-256 over the canonical entry bytes.
//!
//! The content hash binds an entry to its own field values.  It carries no
//! key — anyone can recompute it, which is exactly what lets an offline
//! auditor detect content edits without access to the signing secret.

use sha2::{Digest, Sha256};

use crate::canonical::CanonicalEntry;

/// SHA-256 of `bytes` as a lowercase 64-character hex string.
///
/// Pure, total, deterministic.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Compute the `data_hash` for an entry's content fields.
///
/// `data_hash = SHA-256(canonical_v1(content fields))` — a pure function of
/// the entry's own fields, recomputable independently by any verifier.
pub fn compute_data_hash(entry: &CanonicalEntry<'_>) -> String {
    sha256_hex(&entry.to_bytes())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use custodia_contracts::action::{ActorType, AuditAction, EntityType};

    use super::*;

    #[test]
    fn sha256_hex_matches_known_vector() {
        // SHA-256("abc") — FIPS 180-2 appendix B.1.
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn data_hash_is_deterministic() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        let entry = CanonicalEntry {
            entity_type: EntityType::Report,
            entity_id: "rep-9",
            action: AuditAction::Generate,
            actor_id: None,
            actor_type: ActorType::System,
            timestamp: &ts,
            old_data: None,
            new_data: None,
            sequence_number: 1,
            metadata: None,
        };

        let first = compute_data_hash(&entry);
        let second = compute_data_hash(&entry);
        assert_eq!(first, second);
        assert_eq!(first.len(), 64, "hex-encoded SHA-256 is 64 chars");
    }
}
