//! Injected collaborator contracts.
//!
//! The engines reach every external capability through one of these traits.
//! Implementations are supplied by the embedding application (or by test
//! doubles); each engine holds at most one boxed implementation per
//! capability, and a missing implementation means the dependent side
//! effects are skipped, never an error. No call is retried: a `false` or
//! failed collaborator result is accepted at face value.

/// Compliance standing of an account, as reported by the compliance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceLevel {
    Low,
    Medium,
    High,
    Blocked,
}

/// Result of a multi-factor token verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Success,
    Failed,
    Pending,
    Timeout,
    NetworkError,
}

/// Compliance screening for accounts.
pub trait ComplianceCheck {
    fn compliance_level(&self, account: &str) -> ComplianceLevel;

    /// Report suspicious activity; returns whether the report was recorded.
    fn report_suspicious_activity(&self, account: &str, description: &str) -> bool;

    fn blacklist(&self) -> Vec<String>;

    fn is_blacklisted(&self, account: &str) -> bool;
}

/// Append-only audit trail for transactions and account events.
pub trait AuditLog {
    /// Log a transaction; returns whether the entry was recorded.
    fn log_transaction(&self, account: &str, details: &str, timestamp: &str) -> bool;

    /// Log an account event; returns whether the entry was recorded.
    fn log_account_event(&self, account: &str, event_type: &str, details: &str) -> bool;

    fn audit_trail(&self, account: &str) -> Vec<String>;

    /// Archive entries up to the given date.
    fn archive(&self, date: &str) -> bool;
}

/// Credential and multi-factor authentication operations.
pub trait Authentication {
    fn validate_credentials(&self, username: &str, password: &str) -> bool;

    fn enable_multi_factor(&self, account: &str) -> bool;

    fn verify_multi_factor_token(&self, account: &str, token: &str) -> VerificationOutcome;

    fn lock_account(&self, account: &str) -> bool;
}

/// Outbound user notifications. All sends are fire-and-forget from the
/// engine's point of view.
pub trait Notification {
    fn send_email(&self, address: &str, subject: &str, body: &str) -> bool;

    fn send_sms(&self, number: &str, message: &str) -> bool;

    fn send_push(&self, device_token: &str, title: &str, message: &str) -> bool;

    fn subscribe(&self, account: &str, notification_type: &str) -> bool;
}

/// Lookups against external data providers.
pub trait ExternalData {
    fn credit_score(&self, account: &str) -> String;

    fn identity_verification_status(&self, account: &str) -> String;

    fn validate_bank_account(&self, account: &str, routing: &str) -> bool;

    fn linked_accounts(&self, account: &str) -> Vec<String>;
}
