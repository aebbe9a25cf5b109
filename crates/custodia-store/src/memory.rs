//! In-memory implementation of `AuditStore`.
//!
//! `MemoryAuditStore` is the reference implementation: one `Vec` of entries
//! per tenant behind a `Mutex`, with the vector's order doubling as the
//! `(tenant_id, sequence_number)` index.  It is the store used by every
//! test in the workspace and by the demo binary; a relational
//! implementation would satisfy the same trait with a unique index on
//! `(tenant_id, sequence_number)` and a conditional insert.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use custodia_contracts::{
    action::EntityType,
    entry::{AuditEntry, ChainTail, TenantId},
    error::{CustodiaError, CustodiaResult},
};

use crate::store::AuditStore;

/// An in-memory, append-only audit store partitioned by tenant.
///
/// # Thread safety
///
/// All operations acquire an internal `Mutex`.  The conditional `append`
/// re-checks the tail under that lock, so two racing appends for the same
/// tenant can never both succeed against the same tail.
#[derive(Default)]
pub struct MemoryAuditStore {
    /// Per-tenant entries in append order; index `i` holds sequence `i + 1`.
    chains: Mutex<HashMap<TenantId, Vec<AuditEntry>>>,
}

impl MemoryAuditStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> CustodiaResult<std::sync::MutexGuard<'_, HashMap<TenantId, Vec<AuditEntry>>>> {
        self.chains.lock().map_err(|e| CustodiaError::StorageUnavailable {
            reason: format!("store lock poisoned: {}", e),
        })
    }
}

impl AuditStore for MemoryAuditStore {
    fn append(&self, entry: AuditEntry, expected_tail: u64) -> CustodiaResult<()> {
        let mut chains = self.lock()?;
        let chain = chains.entry(entry.tenant_id.clone()).or_default();

        // Tail re-check under the lock: refuse to fork rather than corrupt.
        let current_tail = chain.len() as u64;
        if current_tail != expected_tail {
            return Err(CustodiaError::SequenceConflict {
                tenant_id: entry.tenant_id.0.clone(),
                expected: expected_tail,
            });
        }

        debug!(
            tenant_id = %entry.tenant_id,
            sequence_number = entry.sequence_number,
            entity_type = %entry.entity_type,
            "entry persisted"
        );

        chain.push(entry);
        Ok(())
    }

    fn tail(&self, tenant_id: &TenantId) -> CustodiaResult<ChainTail> {
        let chains = self.lock()?;
        Ok(chains
            .get(tenant_id)
            .and_then(|chain| chain.last())
            .map(|last| ChainTail {
                sequence_number: last.sequence_number,
                signature: last.signature.clone(),
            })
            .unwrap_or_else(ChainTail::genesis))
    }

    fn range(
        &self,
        tenant_id: &TenantId,
        from: Option<u64>,
        to: Option<u64>,
    ) -> CustodiaResult<Vec<AuditEntry>> {
        let chains = self.lock()?;
        let Some(chain) = chains.get(tenant_id) else {
            return Ok(Vec::new());
        };

        let lo = from.unwrap_or(1);
        let hi = to.unwrap_or(u64::MAX);

        Ok(chain
            .iter()
            .filter(|e| e.sequence_number >= lo && e.sequence_number <= hi)
            .cloned()
            .collect())
    }

    fn entries_for_entity(
        &self,
        tenant_id: &TenantId,
        entity_type: EntityType,
        entity_id: &str,
    ) -> CustodiaResult<Vec<AuditEntry>> {
        let chains = self.lock()?;
        let Some(chain) = chains.get(tenant_id) else {
            return Ok(Vec::new());
        };

        Ok(chain
            .iter()
            .filter(|e| e.entity_type == entity_type && e.entity_id == entity_id)
            .cloned()
            .collect())
    }

    fn count(&self, tenant_id: &TenantId) -> CustodiaResult<u64> {
        let chains = self.lock()?;
        Ok(chains.get(tenant_id).map(|c| c.len() as u64).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use custodia_contracts::{
        action::{ActorType, AuditAction},
        entry::EntryId,
        error::CustodiaError,
    };

    use super::*;

    /// Build a structurally plausible entry; chain fields are filler since
    /// the store treats them as opaque.
    fn make_entry(tenant: &str, sequence: u64, entity_id: &str) -> AuditEntry {
        AuditEntry {
            id: EntryId::new(),
            tenant_id: TenantId::new(tenant),
            entity_type: EntityType::Client,
            entity_id: entity_id.to_string(),
            action: AuditAction::Create,
            actor_id: Some("user-1".to_string()),
            actor_type: ActorType::User,
            timestamp: Utc::now(),
            old_data: None,
            new_data: None,
            metadata: None,
            ip_address: None,
            user_agent: None,
            sequence_number: sequence,
            data_hash: format!("{:064x}", sequence),
            previous_signature: AuditEntry::GENESIS_SIGNATURE.to_string(),
            signature: format!("{:064x}", sequence + 1000),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn tail_starts_at_genesis() {
        let store = MemoryAuditStore::new();
        let tail = store.tail(&TenantId::new("org-1")).unwrap();
        assert_eq!(tail, ChainTail::genesis());
    }

    #[test]
    fn append_advances_tail() {
        let store = MemoryAuditStore::new();
        let tenant = TenantId::new("org-1");

        store.append(make_entry("org-1", 1, "c-1"), 0).unwrap();
        store.append(make_entry("org-1", 2, "c-2"), 1).unwrap();

        let tail = store.tail(&tenant).unwrap();
        assert_eq!(tail.sequence_number, 2);
        assert_eq!(store.count(&tenant).unwrap(), 2);
    }

    #[test]
    fn stale_tail_is_rejected() {
        let store = MemoryAuditStore::new();
        store.append(make_entry("org-1", 1, "c-1"), 0).unwrap();

        // A second writer that also observed tail 0 must not fork the chain.
        let result = store.append(make_entry("org-1", 1, "c-dup"), 0);
        match result {
            Err(CustodiaError::SequenceConflict { expected, .. }) => assert_eq!(expected, 0),
            other => panic!("expected SequenceConflict, got {:?}", other),
        }

        // The losing write left nothing behind.
        assert_eq!(store.count(&TenantId::new("org-1")).unwrap(), 1);
    }

    #[test]
    fn range_respects_inclusive_bounds() {
        let store = MemoryAuditStore::new();
        for seq in 1..=5 {
            store
                .append(make_entry("org-1", seq, &format!("c-{}", seq)), seq - 1)
                .unwrap();
        }

        let tenant = TenantId::new("org-1");
        let middle = store.range(&tenant, Some(2), Some(4)).unwrap();
        assert_eq!(middle.len(), 3);
        assert_eq!(middle[0].sequence_number, 2);
        assert_eq!(middle[2].sequence_number, 4);

        let all = store.range(&tenant, None, None).unwrap();
        assert_eq!(all.len(), 5);

        let empty = store.range(&TenantId::new("org-2"), None, None).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn entity_history_filters_by_type_and_id() {
        let store = MemoryAuditStore::new();
        store.append(make_entry("org-1", 1, "c-1"), 0).unwrap();
        store.append(make_entry("org-1", 2, "c-2"), 1).unwrap();
        store.append(make_entry("org-1", 3, "c-1"), 2).unwrap();

        let tenant = TenantId::new("org-1");
        let history = store
            .entries_for_entity(&tenant, EntityType::Client, "c-1")
            .unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].sequence_number, 1);
        assert_eq!(history[1].sequence_number, 3);

        let none = store
            .entries_for_entity(&tenant, EntityType::Report, "c-1")
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn tenants_are_isolated() {
        let store = MemoryAuditStore::new();
        store.append(make_entry("org-a", 1, "c-1"), 0).unwrap();
        store.append(make_entry("org-b", 1, "c-1"), 0).unwrap();
        store.append(make_entry("org-a", 2, "c-2"), 1).unwrap();

        assert_eq!(store.count(&TenantId::new("org-a")).unwrap(), 2);
        assert_eq!(store.count(&TenantId::new("org-b")).unwrap(), 1);
        assert_eq!(
            store.tail(&TenantId::new("org-b")).unwrap().sequence_number,
            1
        );
    }
}
