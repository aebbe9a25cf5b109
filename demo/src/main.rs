//! CUSTODIA Audit Trail — Demo CLI
//!
//! Runs one or all of the four audit-trail demo scenarios.  Each scenario
//! uses real CUSTODIA components (append pipeline, in-memory store, chain
//! verifier) with mock compliance data.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- onboarding
//!   cargo run -p demo -- tamper-detection
//!   cargo run -p demo -- tenant-isolation
//!   cargo run -p demo -- export

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod scenarios;

use scenarios::{export, isolation, onboarding, tamper};

// ── CLI definition ────────────────────────────────────────────────────────────

/// CUSTODIA — tamper-evident audit trail demo.
///
/// Each subcommand runs one or all of the four scenarios, demonstrating
/// chain construction, corruption pinpointing, tenant isolation, and
/// auditable export.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "CUSTODIA audit trail demo",
    long_about = "Runs CUSTODIA demo scenarios showing hash/signature chain construction,\n\
                  tamper pinpointing, per-tenant sequencing, and JSONL export."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all four scenarios in sequence.
    RunAll,
    /// Scenario 1: Client Onboarding (chain construction + verification).
    Onboarding,
    /// Scenario 2: Tamper Detection (content edit, chain break, wrong key).
    TamperDetection,
    /// Scenario 3: Tenant Isolation (concurrent appends, independent chains).
    TenantIsolation,
    /// Scenario 4: Auditor Export (JSONL dump, export self-audit).
    Export,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::Onboarding => onboarding::run_scenario(),
        Command::TamperDetection => tamper::run_scenario(),
        Command::TenantIsolation => isolation::run_scenario(),
        Command::Export => export::run_scenario(),
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all() -> custodia_contracts::error::CustodiaResult<()> {
    onboarding::run_scenario()?;
    tamper::run_scenario()?;
    isolation::run_scenario()?;
    export::run_scenario()?;
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("CUSTODIA — Tamper-Evident Audit Trail");
    println!("Compliance Platform Demo");
    println!("=====================================");
    println!();
    println!("CUSTODIA append pipeline per entry:");
    println!("  [1] Validate input (closed entity/action/actor taxonomies)");
    println!("  [2] Lock the tenant chain tail (per-tenant serialization)");
    println!("  [3] Assign sequence number = tail + 1, stamp event time");
    println!("  [4] data_hash = SHA-256(canonical content bytes)");
    println!("  [5] signature = HMAC-SHA256(data_hash, previous signature)");
    println!("  [6] Conditional persist — tail advances or nothing changes");
    println!();
}
