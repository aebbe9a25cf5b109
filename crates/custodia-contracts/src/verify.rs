//! Chain verification result types and the integrity fault taxonomy.
//!
//! Integrity faults are findings, not errors: they are never "recovered"
//! and never retried.  A fault means the historical record itself is
//! suspect and must trigger out-of-band investigation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::{EntryId, TenantId};

/// The kind of corruption a verification run detected.
///
/// The three variants pinpoint *how* the chain was damaged, which tells an
/// auditor what kind of attack or fault to investigate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChainFault {
    /// The entry's content no longer matches its `data_hash` — the entry
    /// was altered after signing.
    DataHashMismatch,

    /// The entry's `signature` does not match its content and chain
    /// position — a forged signature or the wrong key.
    SignatureMismatch,

    /// The entry's `previous_signature` does not match the prior entry's
    /// `signature` — evidence of insertion, deletion, or reordering.
    ChainBreak,
}

impl std::fmt::Display for ChainFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::DataHashMismatch => "DATA_HASH_MISMATCH",
            Self::SignatureMismatch => "SIGNATURE_MISMATCH",
            Self::ChainBreak => "CHAIN_BREAK",
        };
        f.write_str(s)
    }
}

/// The first entry a verification run found to be corrupt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidEntry {
    /// The corrupt entry's identifier.
    pub id: EntryId,

    /// Its claimed position in the chain.
    pub sequence_number: u64,

    /// What kind of corruption was found.
    pub fault: ChainFault,
}

/// The outcome of replaying an ordered entry range against the chain rules.
///
/// Verification stops at the first divergence: everything before
/// `first_invalid` is confirmed good, everything from it onward is suspect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainVerificationResult {
    /// True only when every entry in the range checked out.
    pub valid: bool,

    /// The tenant whose chain was verified.
    pub tenant_id: TenantId,

    /// Entries confirmed good before any failure.
    pub entries_verified: u64,

    /// Wall-clock time (UTC) the verification ran.
    pub verified_at: DateTime<Utc>,

    /// The first corrupt entry, when the chain is invalid.
    pub first_invalid: Option<InvalidEntry>,
}

impl ChainVerificationResult {
    /// Build a passing result.  An empty range verifies with count 0.
    pub fn intact(tenant_id: TenantId, entries_verified: u64) -> Self {
        Self {
            valid: true,
            tenant_id,
            entries_verified,
            verified_at: Utc::now(),
            first_invalid: None,
        }
    }

    /// Build a failing result pointing at the first corrupt entry.
    pub fn corrupt(tenant_id: TenantId, entries_verified: u64, invalid: InvalidEntry) -> Self {
        Self {
            valid: false,
            tenant_id,
            entries_verified,
            verified_at: Utc::now(),
            first_invalid: Some(invalid),
        }
    }
}
