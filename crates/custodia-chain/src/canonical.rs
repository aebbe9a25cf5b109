//! Canonical byte encoding of audit entry content.
//!
//! Two logically identical entries (same field values, any internal field
//! order) must always canonicalize to the same bytes, and any change to any
//! field value must change the output.  The encoding is the chain's
//! permanent contract: changing it would make every historical hash
//! unverifiable.
//!
//! Encoding v1 layout, fields in this exact order:
//!   1. entity_type as tagged string (stable `as_str()` form)
//!   2. entity_id as tagged string
//!   3. action as tagged string (stable `as_str()` form)
//!   4. actor_id as tagged optional string
//!   5. actor_type as tagged string (stable `as_str()` form)
//!   6. timestamp as tagged string, fixed format `%Y-%m-%dT%H:%M:%S%.9fZ`
//!   7. old_data as tagged optional JSON
//!   8. new_data as tagged optional JSON
//!   9. sequence_number as 8-byte little-endian
//!  10. metadata as tagged optional JSON
//!
//! A tagged value is one presence byte (0x00 absent, 0x01 present) followed,
//! when present, by a 4-byte little-endian byte length and the value bytes.
//! The length prefix removes separator ambiguity; the presence byte keeps
//! `None` distinct from an empty string.

use chrono::{DateTime, Utc};

use custodia_contracts::{
    action::{ActorType, AuditAction, EntityType},
    entry::AuditEntry,
};

/// Presence byte for an absent optional field.
const TAG_ABSENT: u8 = 0x00;

/// Presence byte for a present field.
const TAG_PRESENT: u8 = 0x01;

/// A borrowed view of the fields that contribute to an entry's `data_hash`.
///
/// The chain fields (`data_hash`, `signature`, `previous_signature`) are
/// excluded so the hash stays recomputable from content alone.  The append
/// pipeline builds this before the entry exists; the verifier builds it
/// from a stored entry via [`CanonicalEntry::from_entry`].
#[derive(Debug, Clone, Copy)]
pub struct CanonicalEntry<'a> {
    pub entity_type: EntityType,
    pub entity_id: &'a str,
    pub action: AuditAction,
    pub actor_id: Option<&'a str>,
    pub actor_type: ActorType,
    pub timestamp: &'a DateTime<Utc>,
    pub old_data: Option<&'a serde_json::Value>,
    pub new_data: Option<&'a serde_json::Value>,
    pub sequence_number: u64,
    pub metadata: Option<&'a serde_json::Value>,
}

impl<'a> CanonicalEntry<'a> {
    /// Borrow the hashed fields out of a stored entry.
    pub fn from_entry(entry: &'a AuditEntry) -> Self {
        Self {
            entity_type: entry.entity_type,
            entity_id: &entry.entity_id,
            action: entry.action,
            actor_id: entry.actor_id.as_deref(),
            actor_type: entry.actor_type,
            timestamp: &entry.timestamp,
            old_data: entry.old_data.as_ref(),
            new_data: entry.new_data.as_ref(),
            sequence_number: entry.sequence_number,
            metadata: entry.metadata.as_ref(),
        }
    }

    /// Produce the canonical v1 byte encoding.
    ///
    /// Total over all valid entry shapes — malformed input is rejected by
    /// the append pipeline before it reaches this point.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);

        push_value(&mut buf, Some(self.entity_type.as_str().as_bytes()));
        push_value(&mut buf, Some(self.entity_id.as_bytes()));
        push_value(&mut buf, Some(self.action.as_str().as_bytes()));
        push_value(&mut buf, self.actor_id.map(str::as_bytes));
        push_value(&mut buf, Some(self.actor_type.as_str().as_bytes()));

        // Fixed-width fractional seconds: two timestamps differing anywhere
        // down to the nanosecond canonicalize differently.
        let ts = self.timestamp.format("%Y-%m-%dT%H:%M:%S%.9fZ").to_string();
        push_value(&mut buf, Some(ts.as_bytes()));

        push_json(&mut buf, self.old_data);
        push_json(&mut buf, self.new_data);

        buf.extend_from_slice(&self.sequence_number.to_le_bytes());

        push_json(&mut buf, self.metadata);

        buf
    }
}

/// Append one tagged, length-prefixed value to `buf`.
///
/// `None` writes the absent tag alone — one byte, never confusable with a
/// present empty value (tag + zero length).
pub(crate) fn push_value(buf: &mut Vec<u8>, value: Option<&[u8]>) {
    match value {
        None => buf.push(TAG_ABSENT),
        Some(bytes) => {
            buf.push(TAG_PRESENT);
            buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
            buf.extend_from_slice(bytes);
        }
    }
}

/// Append an optional JSON value as a tagged, length-prefixed field.
///
/// serde_json sorts object keys on serialization (its map type is ordered
/// by key), so the same logical document always produces the same bytes
/// regardless of insertion order.
fn push_json(buf: &mut Vec<u8>, value: Option<&serde_json::Value>) {
    match value {
        None => buf.push(TAG_ABSENT),
        Some(v) => {
            let bytes = serde_json::to_vec(v)
                .expect("serde_json::Value must always be serializable to JSON");
            push_value(buf, Some(&bytes));
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap()
    }

    fn base_entry(timestamp: &DateTime<Utc>) -> CanonicalEntry<'_> {
        CanonicalEntry {
            entity_type: EntityType::Client,
            entity_id: "client-001",
            action: AuditAction::Update,
            actor_id: Some("user-7"),
            actor_type: ActorType::User,
            timestamp,
            old_data: None,
            new_data: None,
            sequence_number: 4,
            metadata: None,
        }
    }

    #[test]
    fn identical_content_canonicalizes_identically() {
        let ts = base_time();
        let a = base_entry(&ts);
        let b = base_entry(&ts);
        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn json_field_order_does_not_matter() {
        let ts = base_time();
        // Same logical document, different construction order.
        let first = json!({ "name": "Acme GmbH", "risk": "low" });
        let second = json!({ "risk": "low", "name": "Acme GmbH" });

        let mut a = base_entry(&ts);
        a.new_data = Some(&first);
        let mut b = base_entry(&ts);
        b.new_data = Some(&second);

        assert_eq!(
            a.to_bytes(),
            b.to_bytes(),
            "key insertion order must not leak into the canonical form"
        );
    }

    #[test]
    fn absent_field_differs_from_empty_string() {
        let ts = base_time();
        let mut with_none = base_entry(&ts);
        with_none.actor_id = None;
        let mut with_empty = base_entry(&ts);
        with_empty.actor_id = Some("");

        assert_ne!(
            with_none.to_bytes(),
            with_empty.to_bytes(),
            "canonical null must be distinct from empty string"
        );
    }

    #[test]
    fn absent_json_differs_from_json_null() {
        let ts = base_time();
        let null_doc = serde_json::Value::Null;

        let mut absent = base_entry(&ts);
        absent.old_data = None;
        let mut null_json = base_entry(&ts);
        null_json.old_data = Some(&null_doc);

        assert_ne!(absent.to_bytes(), null_json.to_bytes());
    }

    #[test]
    fn adjacent_string_fields_cannot_bleed_into_each_other() {
        let ts = base_time();
        // ("ab", …action CREATE) vs ("a", …) with a different boundary must
        // not collide: the length prefixes pin every boundary.
        let mut a = base_entry(&ts);
        a.entity_id = "ab";
        a.actor_id = Some("c");
        let mut b = base_entry(&ts);
        b.entity_id = "a";
        b.actor_id = Some("bc");

        assert_ne!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn every_field_reaches_the_encoding() {
        let ts = base_time();
        let later = ts + chrono::Duration::nanoseconds(1);
        let old = json!({ "status": "draft" });
        let new = json!({ "status": "submitted" });
        let meta = json!({ "origin": "api-gateway" });

        let base = base_entry(&ts).to_bytes();

        let variants: Vec<Vec<u8>> = vec![
            {
                let mut e = base_entry(&ts);
                e.entity_type = EntityType::Transaction;
                e.to_bytes()
            },
            {
                let mut e = base_entry(&ts);
                e.entity_id = "client-002";
                e.to_bytes()
            },
            {
                let mut e = base_entry(&ts);
                e.action = AuditAction::Delete;
                e.to_bytes()
            },
            {
                let mut e = base_entry(&ts);
                e.actor_id = Some("user-8");
                e.to_bytes()
            },
            {
                let mut e = base_entry(&ts);
                e.actor_type = ActorType::System;
                e.to_bytes()
            },
            base_entry(&later).to_bytes(),
            {
                let mut e = base_entry(&ts);
                e.old_data = Some(&old);
                e.to_bytes()
            },
            {
                let mut e = base_entry(&ts);
                e.new_data = Some(&new);
                e.to_bytes()
            },
            {
                let mut e = base_entry(&ts);
                e.sequence_number = 5;
                e.to_bytes()
            },
            {
                let mut e = base_entry(&ts);
                e.metadata = Some(&meta);
                e.to_bytes()
            },
        ];

        for (i, v) in variants.iter().enumerate() {
            assert_ne!(&base, v, "changing field {} must change the encoding", i);
        }
    }
}
