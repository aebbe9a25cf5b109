//! The closed entity, action, and actor taxonomies.
//!
//! These sets are deliberately closed: an unknown entity kind or action is
//! an input error, rejected before any chain state is touched.  The
//! `as_str()` forms feed the canonical encoding, so they are part of the
//! chain's permanent contract — renaming a variant's string form would make
//! every historical hash unverifiable.

use serde::{Deserialize, Serialize};

/// The kinds of regulated entities whose mutations are audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    Client,
    ClientDocument,
    ClientAddress,
    Transaction,
    TransactionPaymentMethod,
    Alert,
    AlertRule,
    Notice,
    Report,
    ReferenceValue,
    Settings,
    Catalog,
    CatalogItem,
    /// The audit log itself — exports of the log are logged.
    AuditLog,
}

impl EntityType {
    /// Stable string form, used in canonical encoding and entity lookups.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::ClientDocument => "client-document",
            Self::ClientAddress => "client-address",
            Self::Transaction => "transaction",
            Self::TransactionPaymentMethod => "transaction-payment-method",
            Self::Alert => "alert",
            Self::AlertRule => "alert-rule",
            Self::Notice => "notice",
            Self::Report => "report",
            Self::ReferenceValue => "reference-value",
            Self::Settings => "settings",
            Self::Catalog => "catalog",
            Self::CatalogItem => "catalog-item",
            Self::AuditLog => "audit-log",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Read,
    Export,
    Verify,
    Login,
    Logout,
    Submit,
    Generate,
}

impl AuditAction {
    /// Stable string form, used in canonical encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Read => "READ",
            Self::Export => "EXPORT",
            Self::Verify => "VERIFY",
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::Submit => "SUBMIT",
            Self::Generate => "GENERATE",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The class of actor that caused a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorType {
    /// A human operator acting through the platform UI.
    User,
    /// The platform itself (scheduled jobs, lifecycle transitions).
    System,
    /// A direct API caller holding tenant credentials.
    Api,
    /// A platform-to-platform service binding.
    ServiceBinding,
}

impl ActorType {
    /// Stable string form, used in canonical encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::System => "SYSTEM",
            Self::Api => "API",
            Self::ServiceBinding => "SERVICE_BINDING",
        }
    }
}

impl std::fmt::Display for ActorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
