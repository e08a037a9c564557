//! In-memory financial decision engines.
//!
//! Two sibling components with no coupling between them:
//!
//! - [`TransactionProcessor`] validates, classifies, and executes
//!   transactions against running daily limits, keeping an append-only
//!   history and reporting to compliance/audit collaborators.
//! - [`AccountManager`] creates accounts, evolves them through a small
//!   status lifecycle, and scores them from transaction telemetry.
//!
//! Both communicate every outcome through returned statuses, booleans, and
//! `Option`s; no operation returns an error or panics. External
//! capabilities (compliance, audit, authentication, notification, data
//! lookups) are injected through the traits in [`services`] and are
//! optional: absent collaborators simply skip the dependent side effects.
//!
//! Operational flags (system lock, compliance-audit mode) live in
//! [`SystemContext`], owned by the caller and passed explicitly into the
//! calls that consult them.

pub mod amount;
pub mod csv;
pub mod manager;
pub mod model;
pub mod processor;
pub mod services;

pub use amount::Amount;
pub use manager::AccountManager;
pub use manager::RiskAssessment;
pub use model::{
    Account, AccountStatus, AccountType, SystemContext, Transaction, TransactionRequest,
    TransactionStatus, TransactionType,
};
pub use processor::TransactionProcessor;
