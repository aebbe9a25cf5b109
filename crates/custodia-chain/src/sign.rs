//! Chain signing: HMAC-SHA256 over `(data_hash, previous_signature)`.
//!
//! The signature binds an entry to both its own content and the entire
//! prior chain history: each signature covers the previous signature, which
//! covers the one before it, all the way back to genesis.  Without the
//! secret, an attacker who edits any past entry cannot recompute a matching
//! signature for it — nor for any later entry.
//!
//! The two inputs are framed with the same presence-tag + length-prefix
//! scheme as the canonical encoding, so `("ab", "c")` and `("a", "bc")`
//! can never sign identically.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::canonical::push_value;

/// Type alias for HMAC-SHA256.
type HmacSha256 = Hmac<Sha256>;

/// The process-wide chain signing secret.
///
/// Loaded once at startup, held in memory only.  Deliberately implements
/// neither `Serialize` nor `Display`, and its `Debug` output is redacted —
/// the secret must never reach a log line, an error message, or a
/// persisted entry.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Wrap raw secret bytes.
    ///
    /// HMAC-SHA256 accepts any key length; key sizing policy belongs to
    /// the key-management layer, not this core.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Borrow the raw key bytes for MAC construction.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

/// Compute an entry's chain signature.
///
/// `signature = HMAC-SHA256(secret, frame(data_hash) ‖ frame(previous))`
/// where `previous` is the prior entry's signature, or the genesis sentinel
/// for the first entry of a tenant.  Returns a lowercase 64-character hex
/// string.
pub fn sign(data_hash: &str, previous_signature: &str, secret: &SigningSecret) -> String {
    let mut message = Vec::with_capacity(data_hash.len() + previous_signature.len() + 10);
    push_value(&mut message, Some(data_hash.as_bytes()));
    push_value(&mut message, Some(previous_signature.as_bytes()));

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(&message);
    hex::encode(mac.finalize().into_bytes())
}
