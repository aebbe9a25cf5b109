//! Chain replay verification.
//!
//! The verifier walks an ordered entry range oldest-first, independently
//! recomputing what each entry's hash and signature must be, and stops at
//! the first divergence.  The check order matters for fault attribution:
//!
//! 1. **Content** — recompute `data_hash` from the entry's own fields.
//!    A mismatch means the entry was edited after signing.
//! 2. **Linkage** — the entry's `previous_signature` must equal the
//!    signature the previous entry actually produced.  A mismatch means
//!    insertion, deletion, or reordering; a sequence gap in the supplied
//!    range surfaces here too, because the entry after the gap names a
//!    predecessor that is not the one before it.
//! 3. **Signature** — recompute the HMAC over `(data_hash,
//!    previous_signature)`.  A mismatch with content and linkage intact
//!    means a forged signature or the wrong key.
//!
//! Verification is read-only and lock-free: it runs against an
//! already-persisted, immutable range and may run concurrently with
//! ongoing appends to later sequence numbers.

use tracing::{debug, warn};

use custodia_chain::{compute_data_hash, sign, CanonicalEntry, SigningSecret};
use custodia_contracts::{
    entry::{AuditEntry, TenantId},
    verify::{ChainFault, ChainVerificationResult, InvalidEntry},
};

/// Replay `entries` (ascending sequence order, caller's contract) and
/// report the first point of divergence.
///
/// An empty range verifies as valid with zero entries confirmed.  The
/// expected predecessor starts at the genesis sentinel, so a range must
/// start at sequence 1 to verify fully — verifying a tail segment is
/// possible by seeding with [`verify_entries_from`].
pub fn verify_entries(
    tenant_id: &TenantId,
    entries: &[AuditEntry],
    secret: &SigningSecret,
) -> ChainVerificationResult {
    verify_entries_from(tenant_id, entries, secret, AuditEntry::GENESIS_SIGNATURE)
}

/// Replay `entries` against an explicit starting predecessor.
///
/// `expected_previous` is the signature of the entry immediately before
/// the range (the genesis sentinel when the range starts at sequence 1).
/// This is what lets batched verification carry the chain state across
/// batch boundaries without re-reading earlier entries.
pub fn verify_entries_from(
    tenant_id: &TenantId,
    entries: &[AuditEntry],
    secret: &SigningSecret,
    expected_previous: &str,
) -> ChainVerificationResult {
    let mut expected_previous = expected_previous.to_string();
    let mut entries_verified: u64 = 0;

    for entry in entries {
        // Rule 1: the content must still match its hash.
        let recomputed_hash = compute_data_hash(&CanonicalEntry::from_entry(entry));
        if recomputed_hash != entry.data_hash {
            warn!(
                tenant_id = %tenant_id,
                sequence_number = entry.sequence_number,
                entry_id = %entry.id,
                "entry content does not match its data_hash"
            );
            return ChainVerificationResult::corrupt(
                tenant_id.clone(),
                entries_verified,
                InvalidEntry {
                    id: entry.id.clone(),
                    sequence_number: entry.sequence_number,
                    fault: ChainFault::DataHashMismatch,
                },
            );
        }

        // Rule 2: the entry must name the true predecessor.
        if entry.previous_signature != expected_previous {
            warn!(
                tenant_id = %tenant_id,
                sequence_number = entry.sequence_number,
                entry_id = %entry.id,
                "entry predecessor does not match the prior signature"
            );
            return ChainVerificationResult::corrupt(
                tenant_id.clone(),
                entries_verified,
                InvalidEntry {
                    id: entry.id.clone(),
                    sequence_number: entry.sequence_number,
                    fault: ChainFault::ChainBreak,
                },
            );
        }

        // Rule 3: the signature must be the HMAC the secret would produce.
        let recomputed_signature = sign(&recomputed_hash, &expected_previous, secret);
        if recomputed_signature != entry.signature {
            warn!(
                tenant_id = %tenant_id,
                sequence_number = entry.sequence_number,
                entry_id = %entry.id,
                "entry signature does not match recomputed HMAC"
            );
            return ChainVerificationResult::corrupt(
                tenant_id.clone(),
                entries_verified,
                InvalidEntry {
                    id: entry.id.clone(),
                    sequence_number: entry.sequence_number,
                    fault: ChainFault::SignatureMismatch,
                },
            );
        }

        // Advance the expected predecessor to this entry's signature.
        expected_previous = entry.signature.clone();
        entries_verified += 1;
    }

    debug!(
        tenant_id = %tenant_id,
        entries_verified,
        "chain range verified clean"
    );

    ChainVerificationResult::intact(tenant_id.clone(), entries_verified)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use custodia_contracts::{
        action::{ActorType, AuditAction, EntityType},
        entry::EntryId,
        verify::ChainFault,
    };

    use super::*;

    fn secret() -> SigningSecret {
        SigningSecret::new(*b"verify-engine-test-secret-key-01")
    }

    /// Build a genuine chain of `n` entries for one tenant, the same way
    /// the append pipeline does.
    fn make_chain(tenant: &TenantId, n: u64, secret: &SigningSecret) -> Vec<AuditEntry> {
        let mut entries = Vec::with_capacity(n as usize);
        let mut previous = AuditEntry::GENESIS_SIGNATURE.to_string();

        for seq in 1..=n {
            let timestamp = Utc::now();
            let new_data = json!({ "status": "active", "revision": seq });

            let data_hash = compute_data_hash(&CanonicalEntry {
                entity_type: EntityType::Client,
                entity_id: "client-42",
                action: AuditAction::Update,
                actor_id: Some("user-9"),
                actor_type: ActorType::User,
                timestamp: &timestamp,
                old_data: None,
                new_data: Some(&new_data),
                sequence_number: seq,
                metadata: None,
            });
            let signature = sign(&data_hash, &previous, secret);

            entries.push(AuditEntry {
                id: EntryId::new(),
                tenant_id: tenant.clone(),
                entity_type: EntityType::Client,
                entity_id: "client-42".to_string(),
                action: AuditAction::Update,
                actor_id: Some("user-9".to_string()),
                actor_type: ActorType::User,
                timestamp,
                old_data: None,
                new_data: Some(new_data),
                metadata: None,
                ip_address: None,
                user_agent: None,
                sequence_number: seq,
                data_hash,
                previous_signature: previous.clone(),
                signature: signature.clone(),
                created_at: timestamp,
            });

            previous = signature;
        }

        entries
    }

    #[test]
    fn empty_range_is_valid() {
        let tenant = TenantId::new("org-1");
        let result = verify_entries(&tenant, &[], &secret());
        assert!(result.valid);
        assert_eq!(result.entries_verified, 0);
        assert!(result.first_invalid.is_none());
    }

    #[test]
    fn genuine_chains_verify_fully() {
        let tenant = TenantId::new("org-1");
        let secret = secret();

        for n in [1u64, 5, 100] {
            let chain = make_chain(&tenant, n, &secret);
            let result = verify_entries(&tenant, &chain, &secret);
            assert!(result.valid, "chain of {} entries must verify", n);
            assert_eq!(result.entries_verified, n);
        }
    }

    #[test]
    fn tampered_content_is_pinpointed() {
        let tenant = TenantId::new("org-1");
        let secret = secret();
        let mut chain = make_chain(&tenant, 5, &secret);

        // Edit new_data on entry 3 (index 2) without touching chain fields.
        chain[2].new_data = Some(json!({ "status": "REWRITTEN" }));

        let result = verify_entries(&tenant, &chain, &secret);
        assert!(!result.valid);
        assert_eq!(result.entries_verified, 2);

        let invalid = result.first_invalid.expect("must pinpoint the corrupt entry");
        assert_eq!(invalid.sequence_number, 3);
        assert_eq!(invalid.id, chain[2].id);
        assert_eq!(invalid.fault, ChainFault::DataHashMismatch);
    }

    #[test]
    fn broken_linkage_is_pinpointed() {
        let tenant = TenantId::new("org-1");
        let secret = secret();
        let mut chain = make_chain(&tenant, 5, &secret);

        // Overwrite entry 2's predecessor pointer; its own hash and
        // signature are untouched.
        chain[1].previous_signature = "ff".repeat(32);

        let result = verify_entries(&tenant, &chain, &secret);
        assert!(!result.valid);
        assert_eq!(result.entries_verified, 1);

        let invalid = result.first_invalid.unwrap();
        assert_eq!(invalid.sequence_number, 2);
        assert_eq!(invalid.fault, ChainFault::ChainBreak);
    }

    #[test]
    fn wrong_key_fails_at_the_first_entry() {
        let tenant = TenantId::new("org-1");
        let chain = make_chain(&tenant, 3, &secret());

        let wrong = SigningSecret::new(b"a-completely-different-secret".to_vec());
        let result = verify_entries(&tenant, &chain, &wrong);

        assert!(!result.valid);
        assert_eq!(result.entries_verified, 0);

        // Data hashes carry no key, so the first finding is the signature.
        let invalid = result.first_invalid.unwrap();
        assert_eq!(invalid.sequence_number, 1);
        assert_eq!(invalid.fault, ChainFault::SignatureMismatch);
    }

    #[test]
    fn deleted_entry_surfaces_as_chain_break() {
        let tenant = TenantId::new("org-1");
        let secret = secret();
        let mut chain = make_chain(&tenant, 5, &secret);

        // Remove entry 3; entry 4 now follows entry 2 but still names
        // entry 3's signature as its predecessor.
        chain.remove(2);

        let result = verify_entries(&tenant, &chain, &secret);
        assert!(!result.valid);
        assert_eq!(result.entries_verified, 2);

        let invalid = result.first_invalid.unwrap();
        assert_eq!(invalid.sequence_number, 4);
        assert_eq!(invalid.fault, ChainFault::ChainBreak);
    }

    #[test]
    fn reordered_entries_surface_as_chain_break() {
        let tenant = TenantId::new("org-1");
        let secret = secret();
        let mut chain = make_chain(&tenant, 4, &secret);

        chain.swap(1, 2);

        let result = verify_entries(&tenant, &chain, &secret);
        assert!(!result.valid);
        assert_eq!(result.entries_verified, 1);
        assert_eq!(result.first_invalid.unwrap().fault, ChainFault::ChainBreak);
    }

    #[test]
    fn tail_segment_verifies_with_seeded_predecessor() {
        let tenant = TenantId::new("org-1");
        let secret = secret();
        let chain = make_chain(&tenant, 6, &secret);

        // Verify entries 4..=6 seeded with entry 3's signature.
        let result =
            verify_entries_from(&tenant, &chain[3..], &secret, &chain[2].signature);
        assert!(result.valid);
        assert_eq!(result.entries_verified, 3);
    }

    #[test]
    fn verification_does_not_mutate_entries() {
        let tenant = TenantId::new("org-1");
        let secret = secret();
        let chain = make_chain(&tenant, 3, &secret);
        let snapshot: Vec<String> = chain.iter().map(|e| e.signature.clone()).collect();

        let _ = verify_entries(&tenant, &chain, &secret);
        let _ = verify_entries(&tenant, &chain, &secret);

        let after: Vec<String> = chain.iter().map(|e| e.signature.clone()).collect();
        assert_eq!(snapshot, after);
    }
}
