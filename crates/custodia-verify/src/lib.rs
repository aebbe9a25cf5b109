//! # custodia-verify
//!
//! Chain replay verification for the CUSTODIA audit trail.
//!
//! Given an ordered range of persisted entries and the signing secret, the
//! verifier independently recomputes every hash and signature and reports
//! the first point of divergence with a specific fault classification:
//! content edit (`DATA_HASH_MISMATCH`), forged or wrong-key signature
//! (`SIGNATURE_MISMATCH`), or insertion/deletion/reordering
//! (`CHAIN_BREAK`).
//!
//! Integrity findings are terminal: they are reported to the operator, not
//! retried or repaired.

pub mod engine;

pub use engine::{verify_entries, verify_entries_from};
