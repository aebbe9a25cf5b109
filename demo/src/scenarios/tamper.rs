//! Scenario 2: Tamper Detection
//!
//! Builds a clean five-entry chain, then attacks an exported copy three
//! ways (editing a snapshot, cutting an entry's predecessor link,
//! verifying with the wrong secret) and shows how the verifier pinpoints
//! each corruption: which entry, which kind of fault, and how many
//! entries were still confirmed good.

use serde_json::json;

use custodia_chain::SigningSecret;
use custodia_contracts::{
    action::{ActorType, AuditAction, EntityType},
    entry::TenantId,
    error::CustodiaResult,
    request::AppendRequest,
    verify::ChainVerificationResult,
};
use custodia_verify::verify_entries;

use super::{demo_audit_log_with, DEMO_SECRET};

fn describe(result: &ChainVerificationResult) -> String {
    match &result.first_invalid {
        None => format!("VALID ({} entries confirmed)", result.entries_verified),
        Some(invalid) => format!(
            "INVALID: {} at seq {} ({} entries confirmed before it)",
            invalid.fault, invalid.sequence_number, result.entries_verified
        ),
    }
}

/// Run Scenario 2: Tamper Detection.
pub fn run_scenario() -> CustodiaResult<()> {
    println!("=== Scenario 2: Tamper Detection ===");
    println!();

    // This scenario re-verifies exported copies itself, so it pins the
    // secret instead of deferring to the environment.
    let secret_bytes = *DEMO_SECRET;
    let log = demo_audit_log_with(SigningSecret::new(secret_bytes));
    let tenant = TenantId::new("org-acme");

    // Five transaction mutations form the chain under attack.
    for i in 1..=5 {
        log.append(AppendRequest {
            actor_id: Some("api-client-7".to_string()),
            new_data: Some(json!({
                "amount": 1500 * i,
                "currency": "EUR",
                "counterparty": format!("cp-{:03}", i)
            })),
            ..AppendRequest::new(
                tenant.clone(),
                EntityType::Transaction,
                format!("txn-{:04}", i),
                AuditAction::Create,
                ActorType::Api,
            )
        })?;
    }

    let pristine = log.entries(&tenant, None, None)?;
    let secret = SigningSecret::new(secret_bytes);

    println!("  Built a clean chain of 5 transaction entries.");
    println!(
        "  Baseline:              {}",
        describe(&verify_entries(&tenant, &pristine, &secret))
    );
    println!();

    // ── Attack 1: edit a snapshot after the fact ─────────────────────────────

    let mut edited = pristine.clone();
    edited[2].new_data = Some(json!({
        "amount": 150,
        "currency": "EUR",
        "counterparty": "cp-003"
    }));

    println!("  Attack 1: rewrite the amount on entry 3:");
    println!(
        "    {}",
        describe(&verify_entries(&tenant, &edited, &secret))
    );

    // ── Attack 2: cut an entry's predecessor link ────────────────────────────

    let mut relinked = pristine.clone();
    relinked[1].previous_signature = "f".repeat(64);

    println!("  Attack 2: overwrite entry 2's predecessor pointer:");
    println!(
        "    {}",
        describe(&verify_entries(&tenant, &relinked, &secret))
    );

    // ── Attack 3: verify a genuine chain with the wrong key ──────────────────

    let wrong_secret = SigningSecret::new(b"a-forged-or-rotated-away-secret".to_vec());

    println!("  Attack 3: genuine chain, wrong secret:");
    println!(
        "    {}",
        describe(&verify_entries(&tenant, &pristine, &wrong_secret))
    );

    println!();
    println!("  The stored chain itself is untouched:");
    let result = log.verify_range(&tenant, None, None)?;
    println!("    {}", describe(&result));

    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}
