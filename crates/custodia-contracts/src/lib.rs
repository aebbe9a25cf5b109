//! # custodia-contracts
//!
//! Shared types, schemas, and contracts for the CUSTODIA audit trail.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod action;
pub mod entry;
pub mod error;
pub mod request;
pub mod verify;
