//! Runtime configuration for the append pipeline.
//!
//! The signing secret comes from the environment only — it is required,
//! never defaulted, and never written to a config file, a log line, or an
//! error message.  The non-secret knobs (verification batch size, lock
//! retry budget) have defaults and may be overridden from a TOML document.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use custodia_chain::SigningSecret;
use custodia_contracts::error::{CustodiaError, CustodiaResult};

/// Environment variable holding the chain signing secret.
pub const ENV_SIGNING_SECRET: &str = "CUSTODIA_SIGNING_SECRET";

/// Environment variable overriding the verification batch size.
pub const ENV_VERIFY_BATCH_SIZE: &str = "CUSTODIA_VERIFY_BATCH_SIZE";

/// How many entries `verify_range` reads from the store per batch.
const DEFAULT_VERIFY_BATCH_SIZE: usize = 500;

/// How many times an append retries acquiring the tenant lock before
/// surfacing `TenantLockTimeout`.
const DEFAULT_LOCK_RETRY_LIMIT: u32 = 200;

/// Pause between tenant-lock acquisition attempts.
const DEFAULT_LOCK_RETRY_BACKOFF: Duration = Duration::from_millis(2);

/// Everything the audit log service needs at construction time.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// The process-wide chain signing secret.
    pub secret: SigningSecret,

    /// Entries per storage read during batched verification.
    pub verify_batch_size: usize,

    /// Tenant-lock acquisition attempts before giving up.
    pub lock_retry_limit: u32,

    /// Pause between tenant-lock acquisition attempts.
    pub lock_retry_backoff: Duration,
}

impl AuditConfig {
    /// Build a config with default knobs around the given secret.
    pub fn new(secret: SigningSecret) -> Self {
        Self {
            secret,
            verify_batch_size: DEFAULT_VERIFY_BATCH_SIZE,
            lock_retry_limit: DEFAULT_LOCK_RETRY_LIMIT,
            lock_retry_backoff: DEFAULT_LOCK_RETRY_BACKOFF,
        }
    }

    /// Load the configuration from the process environment.
    ///
    /// Returns `CustodiaError::ConfigError` when the signing secret is
    /// absent or empty — there is deliberately no fallback value.
    pub fn from_env() -> CustodiaResult<Self> {
        let secret = std::env::var(ENV_SIGNING_SECRET).map_err(|_| CustodiaError::ConfigError {
            reason: format!("{} is not set", ENV_SIGNING_SECRET),
        })?;
        if secret.is_empty() {
            return Err(CustodiaError::ConfigError {
                reason: format!("{} is set but empty", ENV_SIGNING_SECRET),
            });
        }

        let mut config = Self::new(SigningSecret::new(secret.into_bytes()));

        if let Ok(batch) = std::env::var(ENV_VERIFY_BATCH_SIZE) {
            let parsed: usize = batch.parse().map_err(|_| CustodiaError::ConfigError {
                reason: format!("{} must be a positive integer", ENV_VERIFY_BATCH_SIZE),
            })?;
            if parsed == 0 {
                return Err(CustodiaError::ConfigError {
                    reason: format!("{} must be a positive integer", ENV_VERIFY_BATCH_SIZE),
                });
            }
            config.verify_batch_size = parsed;
        }

        Ok(config)
    }

    /// Apply non-secret overrides from a TOML document.
    ///
    /// The secret is never read from TOML; it stays whatever the config
    /// already holds.
    pub fn apply_toml_str(mut self, s: &str) -> CustodiaResult<Self> {
        let overrides: ConfigOverrides =
            toml::from_str(s).map_err(|e| CustodiaError::ConfigError {
                reason: format!("failed to parse config TOML: {}", e),
            })?;

        if let Some(batch) = overrides.verify_batch_size {
            if batch == 0 {
                return Err(CustodiaError::ConfigError {
                    reason: "verify_batch_size must be positive".to_string(),
                });
            }
            self.verify_batch_size = batch;
        }
        if let Some(limit) = overrides.lock_retry_limit {
            self.lock_retry_limit = limit;
        }
        if let Some(ms) = overrides.lock_retry_backoff_ms {
            self.lock_retry_backoff = Duration::from_millis(ms);
        }

        Ok(self)
    }

    /// Read the file at `path` and apply it as TOML overrides.
    pub fn apply_file(self, path: &Path) -> CustodiaResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CustodiaError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        self.apply_toml_str(&contents)
    }
}

/// The subset of knobs a TOML config file may override.
#[derive(Debug, Deserialize)]
struct ConfigOverrides {
    verify_batch_size: Option<usize>,
    lock_retry_limit: Option<u32>,
    lock_retry_backoff_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_secret() -> SigningSecret {
        SigningSecret::new(b"config-test-secret".to_vec())
    }

    #[test]
    fn defaults_are_sane() {
        let config = AuditConfig::new(test_secret());
        assert_eq!(config.verify_batch_size, 500);
        assert!(config.lock_retry_limit > 0);
    }

    #[test]
    fn toml_overrides_apply() {
        let config = AuditConfig::new(test_secret())
            .apply_toml_str(
                r#"
                verify_batch_size = 64
                lock_retry_limit = 10
                lock_retry_backoff_ms = 5
                "#,
            )
            .unwrap();

        assert_eq!(config.verify_batch_size, 64);
        assert_eq!(config.lock_retry_limit, 10);
        assert_eq!(config.lock_retry_backoff, Duration::from_millis(5));
    }

    #[test]
    fn empty_toml_keeps_defaults() {
        let config = AuditConfig::new(test_secret()).apply_toml_str("").unwrap();
        assert_eq!(config.verify_batch_size, 500);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let result = AuditConfig::new(test_secret()).apply_toml_str("verify_batch_size = \"many\"");
        match result {
            Err(CustodiaError::ConfigError { reason }) => {
                assert!(reason.contains("TOML"), "reason: {}", reason)
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let result = AuditConfig::new(test_secret()).apply_toml_str("verify_batch_size = 0");
        assert!(matches!(result, Err(CustodiaError::ConfigError { .. })));
    }

    #[test]
    fn config_debug_never_leaks_the_secret() {
        let config = AuditConfig::new(SigningSecret::new(b"hunter2-material".to_vec()));
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
    }
}
