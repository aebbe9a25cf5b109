//! The `AuditStore` trait: the seam between the append pipeline and
//! whatever durable ordered row store backs it.
//!
//! The storage engine itself is an external collaborator — the pipeline
//! only assumes a store that can (a) look up a tenant's chain tail,
//! (b) append one row conditionally on that tail, and (c) read ordered
//! ranges back.  The conditional append is the store-level half of the
//! fork protection: even if per-tenant serialization above it were
//! bypassed, the store refuses to accept two entries extending the same
//! tail.

use custodia_contracts::{
    action::EntityType,
    entry::{AuditEntry, ChainTail, TenantId},
    error::CustodiaResult,
};

/// Storage backend for audit chains.
///
/// Implementations must be thread-safe.  Persisted entries are immutable:
/// there is deliberately no update or delete operation on this trait.
pub trait AuditStore: Send + Sync {
    /// Append one fully-formed entry, conditional on the tenant's tail.
    ///
    /// `expected_tail` is the sequence number the caller observed when it
    /// built the entry; the entry itself carries `expected_tail + 1`.  The
    /// append must be atomic: either the entry becomes the new tail, or
    /// nothing changes.
    ///
    /// # Errors
    ///
    /// `SequenceConflict` when the tenant's tail is no longer
    /// `expected_tail`; `StorageUnavailable` when the write cannot be
    /// performed.  In both cases no partial entry is visible.
    fn append(&self, entry: AuditEntry, expected_tail: u64) -> CustodiaResult<()>;

    /// The tenant's current chain tail, or the genesis tail if the tenant
    /// has no entries yet.
    fn tail(&self, tenant_id: &TenantId) -> CustodiaResult<ChainTail>;

    /// Entries for a tenant in ascending sequence order, bounded by the
    /// inclusive `from`/`to` sequence numbers when given.
    fn range(
        &self,
        tenant_id: &TenantId,
        from: Option<u64>,
        to: Option<u64>,
    ) -> CustodiaResult<Vec<AuditEntry>>;

    /// History of a single entity within a tenant, in ascending sequence
    /// order.  A read-path convenience, not part of the chain algorithm.
    fn entries_for_entity(
        &self,
        tenant_id: &TenantId,
        entity_type: EntityType,
        entity_id: &str,
    ) -> CustodiaResult<Vec<AuditEntry>>;

    /// Number of entries stored for a tenant.
    fn count(&self, tenant_id: &TenantId) -> CustodiaResult<u64>;
}
