//! Scenario 4: Auditor Export
//!
//! Dumps an ordered entry range as JSONL the way an external auditor would
//! receive it, and shows the deliberate recursion: exporting the log is
//! itself an auditable EXPORT action appended to the same chain.

use serde_json::json;

use custodia_contracts::{
    action::{ActorType, AuditAction, EntityType},
    entry::TenantId,
    error::CustodiaResult,
    request::AppendRequest,
};

use super::demo_audit_log;

/// Run Scenario 4: Auditor Export.
pub fn run_scenario() -> CustodiaResult<()> {
    println!("=== Scenario 4: Auditor Export ===");
    println!();

    let log = demo_audit_log();
    let tenant = TenantId::new("org-acme");

    // A short history worth exporting.
    for (entity, action) in [
        ("client-0001", AuditAction::Create),
        ("client-0001", AuditAction::Update),
        ("client-0002", AuditAction::Create),
    ] {
        log.append(AppendRequest {
            actor_id: Some("officer-17".to_string()),
            new_data: Some(json!({ "entity": entity })),
            ..AppendRequest::new(
                tenant.clone(),
                EntityType::Client,
                entity,
                action,
                ActorType::User,
            )
        })?;
    }

    // ── The export itself ────────────────────────────────────────────────────

    let jsonl = log.export_jsonl(&tenant, None, None, Some("auditor-ext-02".to_string()))?;

    println!("  Exported {} JSONL line(s):", jsonl.lines().count());
    for line in jsonl.lines() {
        // Show a compact view rather than the full record.
        let entry: custodia_contracts::entry::AuditEntry =
            serde_json::from_str(line).expect("exported lines are audit entries");
        println!(
            "    seq {}  {:<8} {:<12} sig …{}",
            entry.sequence_number,
            entry.action.as_str(),
            entry.entity_type.as_str(),
            &entry.signature[56..],
        );
    }

    println!();

    // ── The recursion: the export left its own trace ─────────────────────────

    let entries = log.entries(&tenant, None, None)?;
    let last = entries.last().expect("chain is not empty");
    println!(
        "  Chain now has {} entries; the newest is {} on {} by {}.",
        entries.len(),
        last.action,
        last.entity_type,
        last.actor_id.as_deref().unwrap_or("-"),
    );

    let result = log.verify_range(&tenant, None, None)?;
    println!(
        "  Chain verification:  {} ({} entries confirmed)",
        if result.valid { "VALID" } else { "INVALID" },
        result.entries_verified
    );

    println!();
    println!("  Scenario 4 complete.");
    println!();

    Ok(())
}
