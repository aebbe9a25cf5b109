//! The four CUSTODIA demo scenarios.
//!
//! Each scenario is self-contained: it builds its own audit log over an
//! in-memory store, runs a narrative of compliance mutations, and prints
//! what the chain machinery did at each step.

pub mod export;
pub mod isolation;
pub mod onboarding;
pub mod tamper;

use std::sync::Arc;

use custodia_chain::SigningSecret;
use custodia_log::{AuditConfig, AuditLog};
use custodia_store::MemoryAuditStore;

/// Demo-only signing secret, used when the environment does not provide one.
pub(crate) const DEMO_SECRET: &[u8; 32] = b"custodia-demo-secret-not-for-pro";

/// Build an audit log for a demo run.
///
/// Uses the real environment secret when `CUSTODIA_SIGNING_SECRET` is set;
/// otherwise falls back to the fixed demo secret so the scenarios run out
/// of the box.  Production deployments construct their config via
/// `AuditConfig::from_env()` only.
pub(crate) fn demo_audit_log() -> AuditLog {
    let config = AuditConfig::from_env()
        .unwrap_or_else(|_| AuditConfig::new(SigningSecret::new(*DEMO_SECRET)));
    AuditLog::new(Arc::new(MemoryAuditStore::new()), config)
}

/// Build an audit log over a caller-chosen secret.
///
/// The tamper scenario needs to re-verify exported copies itself, so it
/// must know exactly which secret signed the chain.
pub(crate) fn demo_audit_log_with(secret: SigningSecret) -> AuditLog {
    AuditLog::new(Arc::new(MemoryAuditStore::new()), AuditConfig::new(secret))
}
