//! # custodia-store
//!
//! The storage seam for the CUSTODIA audit trail.
//!
//! The relational engine backing a production deployment is an external
//! collaborator; this crate defines the narrow contract the append
//! pipeline needs from it (`AuditStore`) and ships the in-memory reference
//! implementation (`MemoryAuditStore`) used by tests and the demo.

pub mod memory;
pub mod store;

pub use memory::MemoryAuditStore;
pub use store::AuditStore;
