//! # custodia-log
//!
//! The sequencer and append pipeline of the CUSTODIA audit trail.
//!
//! ## Overview
//!
//! Every mutation to a regulated entity is recorded through
//! `AuditLog::append()`, which composes the canonicalizer, content hasher,
//! and chain signer into one atomic operation: per tenant, the chain tail
//! is read and extended under a lock, so sequence numbers are a contiguous
//! run 1..N with no duplicates and no forks.  `verify_range()` replays any
//! stored range through `custodia-verify` in configurable batches.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use custodia_log::{AuditConfig, AuditLog};
//! use custodia_store::MemoryAuditStore;
//!
//! let log = AuditLog::new(Arc::new(MemoryAuditStore::new()), AuditConfig::from_env()?);
//! let entry = log.append(request)?;
//! let report = log.verify_range(&tenant, None, None)?;
//! assert!(report.valid);
//! ```

pub mod config;
pub mod lock;
pub mod log;

pub use config::{AuditConfig, ENV_SIGNING_SECRET, ENV_VERIFY_BATCH_SIZE};
pub use lock::TenantLocks;
pub use log::AuditLog;

// ── Tests ─────────────────────────────────────────────────────────────────────
