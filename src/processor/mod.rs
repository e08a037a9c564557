//! Transaction validation and execution.
//!
//! [`TransactionProcessor`] validates, classifies, and executes financial
//! transactions against running daily limits. Outcomes are communicated
//! exclusively through [`TransactionStatus`]; no operation fails with an
//! error. Requests that do not end `Rejected` or `Cancelled` are appended
//! to an immutable history and reported to the audit collaborator when one
//! is injected.
//!
//! The processor is single-threaded: every mutating operation takes
//! `&mut self`, so sharing one instance across threads requires an
//! external lock.

use std::time::{SystemTime, UNIX_EPOCH};

use tokio_stream::{Stream, StreamExt};
use tracing::info;

use crate::Amount;
use crate::model::{
    SystemContext, Transaction, TransactionRequest, TransactionStatus, TransactionType,
};
use crate::services::{AuditLog, ComplianceCheck, ComplianceLevel};

/// Smallest amount any transaction may carry.
const MIN_AMOUNT: Amount = Amount::from_scaled(100); // 0.01
/// Largest amount any transaction may carry.
const MAX_AMOUNT: Amount = Amount::from_units(1_000_000);
/// Per-transaction ceiling for withdrawals.
const WITHDRAWAL_CEILING: Amount = Amount::from_units(50_000);
/// Per-transaction ceiling for refunds.
const REFUND_CEILING: Amount = Amount::from_units(10_000);
/// Daily volume ceiling consulted by the transfer decision chain.
const DAILY_VOLUME_CEILING: Amount = Amount::from_units(5_000_000);
/// Urgent transfers above this amount get the extra pre-checks.
const URGENT_REVIEW_FLOOR: Amount = Amount::from_units(100_000);
/// High-risk accounts may not move more than this in one transaction.
const COMPLIANCE_REVIEW_CEILING: Amount = Amount::from_units(50_000);

/// Maximum number of recorded transactions per day.
pub const MAX_DAILY_TRANSACTIONS: u32 = 1000;

/// Transaction ids are handed out above this seed.
const TRANSACTION_ID_SEED: u64 = 1000;

/// The transaction processing engine.
///
/// Owns the daily counters and the append-only transaction history, and
/// holds optional compliance/audit collaborators.
pub struct TransactionProcessor {
    daily_count: u32,
    daily_volume: Amount,
    history: Vec<Transaction>,
    next_id: u64,
    /// Lifetime count of recorded transactions; unlike the daily counters,
    /// never reset.
    total_processed: u64,
    compliance: Option<Box<dyn ComplianceCheck>>,
    audit: Option<Box<dyn AuditLog>>,
}

/// Public API
impl TransactionProcessor {
    pub fn new() -> Self {
        Self {
            daily_count: 0,
            daily_volume: Amount::ZERO,
            history: Vec::new(),
            next_id: TRANSACTION_ID_SEED,
            total_processed: 0,
            compliance: None,
            audit: None,
        }
    }

    pub fn set_compliance(&mut self, service: Box<dyn ComplianceCheck>) {
        self.compliance = Some(service);
    }

    pub fn set_audit(&mut self, service: Box<dyn AuditLog>) {
        self.audit = Some(service);
    }

    /// Check whether an amount is acceptable for the given transaction type.
    ///
    /// The checks form an ordered chain: the global bounds win over the
    /// type-specific ceilings.
    pub fn validate_transaction(amount: Amount, kind: TransactionType) -> bool {
        if amount < MIN_AMOUNT {
            false
        } else if amount > MAX_AMOUNT {
            false
        } else if kind == TransactionType::Withdrawal && amount > WITHDRAWAL_CEILING {
            false
        } else if kind == TransactionType::Refund && amount > REFUND_CEILING {
            false
        } else {
            true
        }
    }

    /// Decide the outcome of a transfer without mutating any counters;
    /// bookkeeping belongs to [`process`](Self::process).
    pub fn execute_transfer(
        &self,
        ctx: &SystemContext,
        amount: Amount,
        source: &str,
        destination: &str,
        urgent: bool,
    ) -> TransactionStatus {
        if source.is_empty() || destination.is_empty() {
            return TransactionStatus::Rejected;
        }

        if source == destination {
            if amount.is_positive() {
                return TransactionStatus::Rejected;
            } else {
                return TransactionStatus::Cancelled;
            }
        }

        // Urgent large transfers get extra pre-checks; passing them falls
        // through to the lock and final checks below.
        if urgent && amount > URGENT_REVIEW_FLOOR {
            if self.daily_count >= MAX_DAILY_TRANSACTIONS {
                return TransactionStatus::Rejected;
            } else if self.daily_volume + amount > DAILY_VOLUME_CEILING {
                return TransactionStatus::Rejected;
            }
        }

        // While the system is locked, urgent transfers still go through but
        // only to Approved, never Completed.
        if ctx.locked && !urgent {
            return TransactionStatus::Pending;
        } else if ctx.locked && urgent {
            return TransactionStatus::Approved;
        }

        if amount.is_positive()
            && self.daily_count < MAX_DAILY_TRANSACTIONS
            && self.daily_volume + amount <= DAILY_VOLUME_CEILING
        {
            TransactionStatus::Completed
        } else if amount.is_positive() && self.daily_count < MAX_DAILY_TRANSACTIONS {
            TransactionStatus::Approved
        } else if amount.is_positive() {
            TransactionStatus::Pending
        } else {
            TransactionStatus::Cancelled
        }
    }

    /// Validate, screen, dispatch, and record one transaction request.
    ///
    /// Recorded outcomes (anything but `Rejected`/`Cancelled`) append an
    /// immutable history record, notify the audit collaborator, and count
    /// against the daily limit.
    pub fn process(
        &mut self,
        ctx: &SystemContext,
        request: TransactionRequest,
    ) -> TransactionStatus {
        let status = self.dispatch(ctx, &request);

        if status.is_recorded() {
            self.record(request, status);
            self.daily_count += 1;
            self.total_processed += 1;
        } else {
            info!(
                kind = %request.kind,
                amount = %request.amount,
                source = %request.source,
                status = %status,
                "transaction dropped"
            );
        }

        status
    }

    /// Drain an async stream of requests through [`process`](Self::process).
    pub async fn run(
        &mut self,
        ctx: &SystemContext,
        mut stream: impl Stream<Item = TransactionRequest> + Unpin,
    ) {
        while let Some(request) = stream.next().await {
            // every request resolves to some status; nothing stops the drain
            let _ = self.process(ctx, request);
        }
    }

    /// Zero the daily volume and count. Always succeeds.
    pub fn reset_daily_limits(&mut self) -> bool {
        self.daily_volume = Amount::ZERO;
        self.daily_count = 0;
        true
    }

    pub fn daily_volume(&self) -> Amount {
        self.daily_volume
    }

    /// Number of transactions recorded since the last daily reset.
    pub fn daily_count(&self) -> u32 {
        self.daily_count
    }

    pub fn total_processed(&self) -> u64 {
        self.total_processed
    }

    pub fn history(&self) -> &[Transaction] {
        &self.history
    }
}

/// Private API
impl TransactionProcessor {
    fn dispatch(&mut self, ctx: &SystemContext, request: &TransactionRequest) -> TransactionStatus {
        if !Self::validate_transaction(request.amount, request.kind) {
            return TransactionStatus::Rejected;
        }

        if let Some(compliance) = &self.compliance {
            let level = compliance.compliance_level(&request.source);
            if level == ComplianceLevel::Blocked {
                return TransactionStatus::Rejected;
            }
            if level == ComplianceLevel::High && request.amount > COMPLIANCE_REVIEW_CEILING {
                return TransactionStatus::Rejected;
            }
        }

        match request.kind {
            TransactionType::Transfer => self.execute_transfer(
                ctx,
                request.amount,
                &request.source,
                &request.destination,
                false,
            ),
            TransactionType::Deposit => {
                if request.amount.is_positive() && self.daily_count < MAX_DAILY_TRANSACTIONS {
                    self.daily_volume += request.amount;
                    TransactionStatus::Completed
                } else {
                    TransactionStatus::Rejected
                }
            }
            TransactionType::Withdrawal => {
                if request.amount.is_positive()
                    && request.amount <= WITHDRAWAL_CEILING
                    && self.daily_count < MAX_DAILY_TRANSACTIONS
                {
                    self.daily_volume += request.amount;
                    TransactionStatus::Completed
                } else if self.daily_count >= MAX_DAILY_TRANSACTIONS {
                    TransactionStatus::Rejected
                } else {
                    // Not reachable through `process`: validation already
                    // rejects non-positive and over-ceiling withdrawal
                    // amounts. Kept so the chain stays complete if the
                    // validation rules are ever loosened.
                    TransactionStatus::Pending
                }
            }
            TransactionType::Refund => {
                if request.amount.is_positive() && request.amount <= REFUND_CEILING {
                    TransactionStatus::Completed
                } else {
                    // Over-ceiling refunds defer; same dead path as the
                    // withdrawal Pending branch above.
                    TransactionStatus::Pending
                }
            }
            TransactionType::Unknown => TransactionStatus::Cancelled,
        }
    }

    fn record(&mut self, request: TransactionRequest, status: TransactionStatus) {
        self.next_id += 1;
        let transaction = Transaction {
            id: self.next_id,
            kind: request.kind,
            amount: request.amount,
            source: request.source,
            destination: request.destination,
            timestamp: now_unix(),
            status,
        };

        if let Some(audit) = &self.audit {
            // Best effort: a failed audit write never changes the outcome.
            let _ = audit.log_transaction(
                &transaction.source,
                &transaction.amount.to_string(),
                &transaction.timestamp.to_string(),
            );
            let _ = audit.log_account_event(
                &transaction.source,
                "TRANSACTION_PROCESSED",
                &format!("Transaction: {}", transaction.id),
            );
        }

        info!(
            id = transaction.id,
            kind = %transaction.kind,
            amount = %transaction.amount,
            source = %transaction.source,
            status = %status,
            "transaction recorded"
        );

        self.history.push(transaction);
    }
}

impl Default for TransactionProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
