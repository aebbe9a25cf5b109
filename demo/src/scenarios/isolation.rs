//! Scenario 3: Tenant Isolation
//!
//! Two tenants hammer the same audit log from concurrent writers.  Each
//! tenant's chain comes out contiguous from 1 with no interleaving, and
//! both verify clean — appends for different tenants need no coordination
//! at all, while appends within a tenant serialize on its chain tail.

use std::sync::Arc;

use serde_json::json;

use custodia_contracts::{
    action::{ActorType, AuditAction, EntityType},
    entry::TenantId,
    error::CustodiaResult,
    request::AppendRequest,
};

use super::demo_audit_log;

const WRITERS_PER_TENANT: usize = 4;
const APPENDS_PER_WRITER: usize = 10;

/// Run Scenario 3: Tenant Isolation.
pub fn run_scenario() -> CustodiaResult<()> {
    println!("=== Scenario 3: Tenant Isolation ===");
    println!();

    let log = Arc::new(demo_audit_log());
    let tenants = ["org-acme", "org-borealis"];

    println!(
        "  {} writers x {} appends per writer, per tenant, all concurrent.",
        WRITERS_PER_TENANT, APPENDS_PER_WRITER
    );
    println!();

    // ── Concurrent writers across both tenants ───────────────────────────────

    let mut handles = Vec::new();
    for tenant_name in tenants {
        for writer in 0..WRITERS_PER_TENANT {
            let log = Arc::clone(&log);
            handles.push(std::thread::spawn(move || -> CustodiaResult<()> {
                for i in 0..APPENDS_PER_WRITER {
                    log.append(AppendRequest {
                        actor_id: Some(format!("svc-{}", writer)),
                        new_data: Some(json!({ "alert": format!("a-{}-{}", writer, i) })),
                        ..AppendRequest::new(
                            TenantId::new(tenant_name),
                            EntityType::Alert,
                            format!("alert-{}-{}", writer, i),
                            AuditAction::Create,
                            ActorType::ServiceBinding,
                        )
                    })?;
                }
                Ok(())
            }));
        }
    }
    for handle in handles {
        handle.join().expect("writer thread panicked")?;
    }

    // ── Each tenant's chain stands alone ─────────────────────────────────────

    let expected = (WRITERS_PER_TENANT * APPENDS_PER_WRITER) as u64;
    for tenant_name in tenants {
        let tenant = TenantId::new(tenant_name);
        let entries = log.entries(&tenant, None, None)?;

        let contiguous = entries
            .iter()
            .enumerate()
            .all(|(idx, e)| e.sequence_number == idx as u64 + 1);

        let result = log.verify_range(&tenant, None, None)?;

        println!(
            "  {:<14} {} entries, sequence 1..={} {}, chain {}",
            tenant_name,
            entries.len(),
            expected,
            if contiguous { "contiguous" } else { "BROKEN" },
            if result.valid { "VALID" } else { "INVALID" },
        );
    }

    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}
