//! Core domain types for the transaction and account engines.

use std::fmt;

use crate::Amount;

/// Kind of a financial transaction presented to the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    /// Credit funds to an account.
    Deposit,
    /// Debit funds from an account; capped at 50,000 per transaction.
    Withdrawal,
    /// Move funds between two accounts.
    Transfer,
    /// Return funds from a prior transaction; capped at 10,000.
    Refund,
    /// A type code the processor does not recognize. Always resolves
    /// to [`TransactionStatus::Cancelled`].
    Unknown,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Transfer => "transfer",
            TransactionType::Refund => "refund",
            TransactionType::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Outcome of processing a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Accepted but deferred (system locked, or daily volume ceiling hit).
    Pending,
    /// Accepted, pending settlement.
    Approved,
    /// Refused; nothing was recorded.
    Rejected,
    /// Abandoned (zero/negative amount, unrecognized type); nothing was recorded.
    Cancelled,
    /// Fully executed.
    Completed,
}

impl TransactionStatus {
    /// Whether a transaction with this status is appended to history,
    /// audited, and counted against the daily limit.
    pub fn is_recorded(&self) -> bool {
        !matches!(
            self,
            TransactionStatus::Rejected | TransactionStatus::Cancelled
        )
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Approved => "approved",
            TransactionStatus::Rejected => "rejected",
            TransactionStatus::Cancelled => "cancelled",
            TransactionStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// A transaction request: the input the processor consumes.
#[derive(Debug, Clone)]
pub struct TransactionRequest {
    pub kind: TransactionType,
    pub amount: Amount,
    pub source: String,
    /// Destination account; only meaningful for transfers, may be empty.
    pub destination: String,
}

/// An immutable record of a processed transaction.
///
/// Records exist only for requests that did not end Rejected or Cancelled,
/// and are never mutated or removed once appended to the history.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Monotonic identifier, unique for the lifetime of one processor.
    pub id: u64,
    pub kind: TransactionType,
    pub amount: Amount,
    pub source: String,
    pub destination: String,
    /// Creation time, unix seconds.
    pub timestamp: u64,
    pub status: TransactionStatus,
}

/// Kind of a managed account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    Checking,
    Savings,
    Investment,
    Business,
}

/// Lifecycle status of a managed account.
///
/// `Closed` is terminal: no other status is reachable from it (a
/// `Closed` -> `Closed` update is accepted as a no-op).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Active,
    Suspended,
    Frozen,
    Closed,
    /// Initial status of every freshly created account.
    PendingVerification,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccountStatus::Active => "active",
            AccountStatus::Suspended => "suspended",
            AccountStatus::Frozen => "frozen",
            AccountStatus::Closed => "closed",
            AccountStatus::PendingVerification => "pending-verification",
        };
        f.write_str(s)
    }
}

/// A managed account, keyed by its unique number within one manager.
#[derive(Debug, Clone)]
pub struct Account {
    pub number: String,
    pub kind: AccountType,
    pub status: AccountStatus,
    pub balance: Amount,
    pub credit_limit: Amount,
    pub risk_score: i32,
    pub verified: bool,
    pub fraud_alert: bool,
}

/// Operational flags shared across engine instances.
///
/// The flags are consulted, never mutated, by the engines; the caller owns
/// the context and passes it by reference into the calls that need it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemContext {
    /// Operational kill-switch: gates non-urgent transfers to Pending and
    /// caps urgent transfers at Approved.
    pub locked: bool,
    /// When set, high-risk accounts are frozen instead of suspended
    /// during risk evaluation.
    pub compliance_audit_mode: bool,
}
