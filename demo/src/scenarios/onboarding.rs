//! Scenario 1: Client Onboarding
//!
//! Walks a realistic onboarding flow for one tenant — client created,
//! identity document attached, address recorded, beneficial-owner data
//! updated, compliance report submitted — and shows the chain each
//! mutation leaves behind.
//!
//! Pipeline walk-through for the demo run:
//!   1. Five domain mutations call append(), one entry each
//!   2. Sequence numbers come out 1..=5, no caller involvement
//!   3. Entry 1 links to the genesis sentinel, each later entry to its
//!      predecessor's signature
//!   4. verify_range replays the whole chain and confirms it clean

use serde_json::json;

use custodia_contracts::{
    action::{ActorType, AuditAction, EntityType},
    entry::TenantId,
    error::CustodiaResult,
    request::AppendRequest,
};

use super::demo_audit_log;

/// Run Scenario 1: Client Onboarding.
pub fn run_scenario() -> CustodiaResult<()> {
    println!("=== Scenario 1: Client Onboarding ===");
    println!();

    let log = demo_audit_log();
    let tenant = TenantId::new("org-acme");

    println!("  Tenant: org-acme");
    println!();

    // ── The onboarding flow, as the domain services would drive it ───────────

    let steps: Vec<(&str, AppendRequest)> = vec![
        (
            "client created",
            AppendRequest {
                actor_id: Some("officer-17".to_string()),
                new_data: Some(json!({
                    "name": "Meridian Trading GmbH",
                    "jurisdiction": "DE",
                    "risk_rating": "medium"
                })),
                ip_address: Some("10.20.0.4".to_string()),
                ..AppendRequest::new(
                    tenant.clone(),
                    EntityType::Client,
                    "client-0001",
                    AuditAction::Create,
                    ActorType::User,
                )
            },
        ),
        (
            "identity document attached",
            AppendRequest {
                actor_id: Some("officer-17".to_string()),
                new_data: Some(json!({
                    "kind": "commercial-register-extract",
                    "client_id": "client-0001"
                })),
                ..AppendRequest::new(
                    tenant.clone(),
                    EntityType::ClientDocument,
                    "doc-0001",
                    AuditAction::Create,
                    ActorType::User,
                )
            },
        ),
        (
            "registered address recorded",
            AppendRequest {
                actor_id: Some("officer-17".to_string()),
                new_data: Some(json!({
                    "street": "Friedrichstr. 120",
                    "city": "Berlin",
                    "country": "DE"
                })),
                ..AppendRequest::new(
                    tenant.clone(),
                    EntityType::ClientAddress,
                    "addr-0001",
                    AuditAction::Create,
                    ActorType::User,
                )
            },
        ),
        (
            "beneficial owner updated",
            AppendRequest {
                actor_id: Some("officer-17".to_string()),
                old_data: Some(json!({ "ubo": null })),
                new_data: Some(json!({
                    "ubo": { "name": "K. Meridian", "share_pct": 62.5 }
                })),
                ..AppendRequest::new(
                    tenant.clone(),
                    EntityType::Client,
                    "client-0001",
                    AuditAction::Update,
                    ActorType::User,
                )
            },
        ),
        (
            "onboarding report submitted",
            AppendRequest {
                actor_id: None,
                metadata: Some(json!({ "trigger": "onboarding-complete" })),
                ..AppendRequest::new(
                    tenant.clone(),
                    EntityType::Report,
                    "rep-0001",
                    AuditAction::Submit,
                    ActorType::System,
                )
            },
        ),
    ];

    for (label, request) in steps {
        let entry = log.append(request)?;
        println!(
            "  [seq {}] {:<32} prev …{}  sig …{}",
            entry.sequence_number,
            label,
            &entry.previous_signature[56..],
            &entry.signature[56..],
        );
    }

    println!();

    // ── Replay the chain ─────────────────────────────────────────────────────

    let result = log.verify_range(&tenant, None, None)?;
    println!(
        "  Chain verification:  {} ({} entries confirmed)",
        if result.valid { "VALID" } else { "INVALID" },
        result.entries_verified
    );

    // The client's own history is a filtered view of the same chain.
    let history = log.entity_history(&tenant, EntityType::Client, "client-0001")?;
    println!(
        "  client-0001 history: {} entries ({} then {})",
        history.len(),
        history[0].action,
        history[1].action
    );

    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}
