//! The audit entry model and chain tail types.
//!
//! `AuditEntry` is a single link in a tenant's signature chain — it wraps a
//! domain mutation with sequence numbering, a SHA-256 content hash, and the
//! HMAC signatures that make tampering detectable.  Entries are immutable
//! once persisted; corrections are new entries referencing the original
//! `entity_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::{ActorType, AuditAction, EntityType};

/// Unique identifier for a single audit entry.
///
/// Assigned once at creation, never reused.  Appears in verification
/// findings so operators can locate the exact corrupt record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub uuid::Uuid);

impl EntryId {
    /// Create a new, unique entry ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An isolated organization scope.
///
/// All sequencing and chaining is partitioned per tenant — chains of
/// different tenants never interleave or cross-reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

impl TenantId {
    /// Construct a tenant ID from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single entry in a tenant's HMAC signature chain.
///
/// Each entry commits to the previous entry via `previous_signature`,
/// forming an append-only chain.  Modifying any content field invalidates
/// `data_hash`; modifying any entry invalidates every later `signature`
/// transitively — both are detected by the chain verifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Opaque unique identifier, assigned at creation.
    pub id: EntryId,

    /// The tenant whose chain this entry extends.
    pub tenant_id: TenantId,

    /// The kind of regulated entity that was touched.
    pub entity_type: EntityType,

    /// Identifier of the touched entity within its kind.
    pub entity_id: String,

    /// What happened to the entity.
    pub action: AuditAction,

    /// Who or what caused the change, when known.
    pub actor_id: Option<String>,

    /// The class of actor behind `actor_id`.
    pub actor_type: ActorType,

    /// Event time (UTC), stamped by the append pipeline — never by the
    /// caller, to prevent backdating.
    pub timestamp: DateTime<Utc>,

    /// Serialized snapshot of the entity before the action.
    pub old_data: Option<serde_json::Value>,

    /// Serialized snapshot of the entity after the action.
    pub new_data: Option<serde_json::Value>,

    /// Free-form request context (e.g. request origin).
    pub metadata: Option<serde_json::Value>,

    /// Originating IP address, when the action came over a network request.
    pub ip_address: Option<String>,

    /// Originating user agent, when the action came over a network request.
    pub user_agent: Option<String>,

    /// Tenant-scoped position in the chain: 1, 2, 3, … with no gaps.
    pub sequence_number: u64,

    /// SHA-256 hash (hex) of the canonical encoding of this entry's
    /// content fields — everything except the chain fields themselves.
    pub data_hash: String,

    /// The `signature` of the immediately preceding entry for this tenant,
    /// or `GENESIS_SIGNATURE` for the first entry.
    pub previous_signature: String,

    /// HMAC-SHA256 (hex) over `(data_hash, previous_signature)`, keyed by
    /// the signing secret.
    pub signature: String,

    /// Wall-clock time (UTC) the entry was persisted.  May differ from
    /// `timestamp` under buffering; append order equals sequence order.
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    /// The sentinel `previous_signature` for the first entry in every chain.
    ///
    /// 64 hex zeros — a value that can never be a real HMAC-SHA256 output,
    /// making genesis detection unambiguous.
    pub const GENESIS_SIGNATURE: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// The chain tail for one tenant: the sequence number and signature of the
/// most recently appended entry.
///
/// The append pipeline reads the tail, extends it, and writes the new entry
/// as one serialized unit.  A tenant with no entries has the genesis tail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainTail {
    /// Sequence number of the latest entry, or 0 before any entry exists.
    pub sequence_number: u64,

    /// Signature of the latest entry, or `GENESIS_SIGNATURE`.
    pub signature: String,
}

impl ChainTail {
    /// The tail of an empty chain: sequence 0, genesis signature.
    pub fn genesis() -> Self {
        Self {
            sequence_number: 0,
            signature: AuditEntry::GENESIS_SIGNATURE.to_string(),
        }
    }
}
