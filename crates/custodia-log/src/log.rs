//! The audit log service: sequencer, append pipeline, batched
//! verification, and range export.
//!
//! `append()` is the single write path for the whole platform.  Per
//! tenant, it executes as one serialized unit:
//!
//!   validate → lock tenant → read tail → assign sequence → stamp time
//!            → hash → sign → conditional persist
//!
//! On any failure the tail is unchanged and no sequence number is burned.
//! Reads and verification take no locks — they operate on persisted,
//! immutable entries.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use custodia_chain::{compute_data_hash, sign, CanonicalEntry};
use custodia_contracts::{
    action::{ActorType, AuditAction, EntityType},
    entry::{AuditEntry, EntryId, TenantId},
    error::{CustodiaError, CustodiaResult},
    request::AppendRequest,
    verify::ChainVerificationResult,
};
use custodia_store::AuditStore;
use custodia_verify::verify_entries_from;

use crate::config::AuditConfig;
use crate::lock::{acquire, TenantLocks};

/// The tamper-evident audit log over a storage backend.
///
/// One instance serves every tenant; chains never interleave because all
/// sequencing state is keyed by tenant.  The service is `Send + Sync` and
/// meant to be shared behind an `Arc` by all domain services.
pub struct AuditLog {
    store: Arc<dyn AuditStore>,
    config: AuditConfig,
    locks: TenantLocks,
}

impl AuditLog {
    /// Create the service over a storage backend.
    pub fn new(store: Arc<dyn AuditStore>, config: AuditConfig) -> Self {
        Self {
            store,
            config,
            locks: TenantLocks::new(),
        }
    }

    /// Append one entry to the caller's tenant chain.
    ///
    /// The returned entry satisfies the chain invariants with respect to
    /// the entry immediately preceding it: its sequence number extends the
    /// tail by exactly one and its signature commits to the tail's
    /// signature.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for malformed requests (non-retryable, caller bug);
    /// `TenantLockTimeout` when a sibling append holds the tenant beyond
    /// the retry budget (retryable with backoff); `StorageUnavailable`
    /// when the persist fails (retryable — no partial entry is visible).
    pub fn append(&self, request: AppendRequest) -> CustodiaResult<AuditEntry> {
        validate(&request)?;

        // Serialize against sibling appends for this tenant.  The lock is
        // held across tail-read, entry construction, and persist.
        let cell = self.locks.handle(&request.tenant_id)?;
        let _guard = acquire(
            &cell,
            &request.tenant_id,
            self.config.lock_retry_limit,
            self.config.lock_retry_backoff,
        )?;

        let tail = self.store.tail(&request.tenant_id)?;
        let sequence_number = tail.sequence_number + 1;

        // Event time is stamped here, not by the caller — backdating an
        // entry would require forging the whole chain after it.
        let timestamp = Utc::now();

        let data_hash = compute_data_hash(&CanonicalEntry {
            entity_type: request.entity_type,
            entity_id: &request.entity_id,
            action: request.action,
            actor_id: request.actor_id.as_deref(),
            actor_type: request.actor_type,
            timestamp: &timestamp,
            old_data: request.old_data.as_ref(),
            new_data: request.new_data.as_ref(),
            sequence_number,
            metadata: request.metadata.as_ref(),
        });
        let signature = sign(&data_hash, &tail.signature, &self.config.secret);

        let entry = AuditEntry {
            id: EntryId::new(),
            tenant_id: request.tenant_id.clone(),
            entity_type: request.entity_type,
            entity_id: request.entity_id,
            action: request.action,
            actor_id: request.actor_id,
            actor_type: request.actor_type,
            timestamp,
            old_data: request.old_data,
            new_data: request.new_data,
            metadata: request.metadata,
            ip_address: request.ip_address,
            user_agent: request.user_agent,
            sequence_number,
            data_hash,
            previous_signature: tail.signature.clone(),
            signature,
            created_at: Utc::now(),
        };

        self.store.append(entry.clone(), tail.sequence_number)?;

        info!(
            tenant_id = %entry.tenant_id,
            sequence_number = entry.sequence_number,
            entity_type = %entry.entity_type,
            action = %entry.action,
            "audit entry appended"
        );

        Ok(entry)
    }

    /// Verify a tenant's chain over an inclusive sequence range.
    ///
    /// Entries are read from the store in batches of
    /// `config.verify_batch_size`, with the expected predecessor carried
    /// across batch boundaries.  `None` bounds mean "from the first entry"
    /// / "to the current tail".  Read-only and lock-free: safe to run
    /// repeatedly and concurrently with ongoing appends.
    pub fn verify_range(
        &self,
        tenant_id: &TenantId,
        from: Option<u64>,
        to: Option<u64>,
    ) -> CustodiaResult<ChainVerificationResult> {
        let lo = from.unwrap_or(1).max(1);

        // Seed the expected predecessor: genesis for a full-chain run,
        // otherwise the signature of the entry just before the range.
        let mut expected_previous = if lo == 1 {
            AuditEntry::GENESIS_SIGNATURE.to_string()
        } else {
            self.store
                .range(tenant_id, Some(lo - 1), Some(lo - 1))?
                .first()
                .map(|e| e.signature.clone())
                .unwrap_or_else(|| AuditEntry::GENESIS_SIGNATURE.to_string())
        };

        let batch = self.config.verify_batch_size as u64;
        let mut cursor = lo;
        let mut verified_total: u64 = 0;

        loop {
            let mut upper = cursor + batch - 1;
            if let Some(t) = to {
                if cursor > t {
                    break;
                }
                upper = upper.min(t);
            }

            let entries = self.store.range(tenant_id, Some(cursor), Some(upper))?;
            if entries.is_empty() {
                break;
            }

            let result =
                verify_entries_from(tenant_id, &entries, &self.config.secret, &expected_previous);
            verified_total += result.entries_verified;

            if !result.valid {
                // entries_verified counts the whole range, not this batch.
                let invalid = result
                    .first_invalid
                    .expect("an invalid result always names the corrupt entry");
                return Ok(ChainVerificationResult::corrupt(
                    tenant_id.clone(),
                    verified_total,
                    invalid,
                ));
            }

            expected_previous = entries
                .last()
                .map(|e| e.signature.clone())
                .unwrap_or(expected_previous);

            let read = entries.len() as u64;
            if read < upper - cursor + 1 {
                // Short batch: we ran past the tail.
                break;
            }
            cursor = upper + 1;
        }

        debug!(
            tenant_id = %tenant_id,
            entries_verified = verified_total,
            "chain verification complete"
        );

        Ok(ChainVerificationResult::intact(
            tenant_id.clone(),
            verified_total,
        ))
    }

    /// Ordered entries for a tenant, bounded by inclusive sequence numbers.
    pub fn entries(
        &self,
        tenant_id: &TenantId,
        from: Option<u64>,
        to: Option<u64>,
    ) -> CustodiaResult<Vec<AuditEntry>> {
        self.store.range(tenant_id, from, to)
    }

    /// Full history of one entity within a tenant.
    pub fn entity_history(
        &self,
        tenant_id: &TenantId,
        entity_type: EntityType,
        entity_id: &str,
    ) -> CustodiaResult<Vec<AuditEntry>> {
        self.store.entries_for_entity(tenant_id, entity_type, entity_id)
    }

    /// Export an ordered entry range as JSONL (one entry per line), for
    /// offline auditors.
    ///
    /// Exporting does not alter the exported entries, but it is itself an
    /// auditable action: an EXPORT entry for the audit log entity is
    /// appended to the same chain after the snapshot is taken.  The export
    /// therefore never contains its own EXPORT entry.
    pub fn export_jsonl(
        &self,
        tenant_id: &TenantId,
        from: Option<u64>,
        to: Option<u64>,
        actor_id: Option<String>,
    ) -> CustodiaResult<String> {
        let entries = self.store.range(tenant_id, from, to)?;

        let mut out = String::new();
        for entry in &entries {
            let line = serde_json::to_string(entry)
                .expect("persisted audit entries are always serializable");
            out.push_str(&line);
            out.push('\n');
        }

        // Exporting the log is itself logged — recursion intentional.
        let export_record = AppendRequest {
            actor_id,
            actor_type: ActorType::System,
            metadata: Some(serde_json::json!({
                "from_sequence": from,
                "to_sequence": to,
                "entry_count": entries.len(),
            })),
            ..AppendRequest::new(
                tenant_id.clone(),
                EntityType::AuditLog,
                tenant_id.0.clone(),
                AuditAction::Export,
                ActorType::System,
            )
        };
        self.append(export_record)?;

        Ok(out)
    }
}

/// Reject malformed requests before any chain state is touched.
fn validate(request: &AppendRequest) -> CustodiaResult<()> {
    if request.tenant_id.0.trim().is_empty() {
        return Err(CustodiaError::InvalidInput {
            reason: "tenant_id must not be empty".to_string(),
        });
    }
    if request.entity_id.trim().is_empty() {
        return Err(CustodiaError::InvalidInput {
            reason: "entity_id must not be empty".to_string(),
        });
    }
    if let Some(actor_id) = &request.actor_id {
        if actor_id.trim().is_empty() {
            return Err(CustodiaError::InvalidInput {
                reason: "actor_id, when present, must not be empty".to_string(),
            });
        }
    }
    Ok(())
}
