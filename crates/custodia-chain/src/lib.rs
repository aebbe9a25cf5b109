//! # custodia-chain
//!
//! Leaf cryptographic primitives for the CUSTODIA audit trail: canonical
//! entry encoding, SHA-256 content hashing, and HMAC-SHA256 chain signing.
//!
//! ## Overview
//!
//! Every audit entry carries two digests.  The `data_hash` is an unkeyed
//! SHA-256 over the entry's canonical content bytes — recomputable by
//! anyone, it pins the entry to its own field values.  The `signature` is
//! a keyed HMAC-SHA256 over `(data_hash, previous_signature)` — it chains
//! the entry to its entire prior history and cannot be recomputed without
//! the signing secret.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use custodia_chain::{CanonicalEntry, compute_data_hash, sign, SigningSecret};
//!
//! let data_hash = compute_data_hash(&CanonicalEntry::from_entry(&entry));
//! let signature = sign(&data_hash, &previous_signature, &secret);
//! ```

pub mod canonical;
pub mod hash;
pub mod sign;

pub use canonical::CanonicalEntry;
pub use hash::{compute_data_hash, sha256_hex};
pub use sign::{sign, SigningSecret};
