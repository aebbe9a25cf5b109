//! The append request raised by domain services.
//!
//! `AppendRequest` is everything an external caller supplies; the append
//! pipeline adds the rest (timestamp, sequence number, hash, signatures).
//! Note what is deliberately absent: callers cannot set the event time or
//! the sequence number.

use serde::{Deserialize, Serialize};

use crate::action::{ActorType, AuditAction, EntityType};
use crate::entry::TenantId;

/// Input for one `append()` call.
///
/// Snapshots and metadata are plain JSON values — the pipeline treats them
/// as opaque and commits to their canonical byte form in `data_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendRequest {
    /// The tenant whose chain to extend.
    pub tenant_id: TenantId,

    /// The kind of entity that was touched.
    pub entity_type: EntityType,

    /// Identifier of the touched entity.
    pub entity_id: String,

    /// What happened.
    pub action: AuditAction,

    /// Who caused it, when known.
    pub actor_id: Option<String>,

    /// The class of actor.
    pub actor_type: ActorType,

    /// Entity snapshot before the action.
    pub old_data: Option<serde_json::Value>,

    /// Entity snapshot after the action.
    pub new_data: Option<serde_json::Value>,

    /// Originating IP address.
    pub ip_address: Option<String>,

    /// Originating user agent.
    pub user_agent: Option<String>,

    /// Free-form request context.
    pub metadata: Option<serde_json::Value>,
}

impl AppendRequest {
    /// Build a minimal request with all optional context absent.
    ///
    /// Domain services typically start here and fill in actor and snapshot
    /// fields with struct update syntax.
    pub fn new(
        tenant_id: TenantId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        action: AuditAction,
        actor_type: ActorType,
    ) -> Self {
        Self {
            tenant_id,
            entity_type,
            entity_id: entity_id.into(),
            action,
            actor_id: None,
            actor_type,
            old_data: None,
            new_data: None,
            ip_address: None,
            user_agent: None,
            metadata: None,
        }
    }
}
