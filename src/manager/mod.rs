//! Account lifecycle and risk management.
//!
//! [`AccountManager`] owns a collection of accounts, evolves each through
//! the status lifecycle, and scores accounts from transaction telemetry.
//! Outcomes are booleans and [`RiskAssessment`] values; nothing here
//! returns an error. Like the processor, the manager is single-threaded:
//! mutating operations take `&mut self`, and cross-thread sharing requires
//! an external lock.

use std::collections::HashMap;

use tracing::info;

use crate::Amount;
use crate::model::{Account, AccountStatus, AccountType, SystemContext};
use crate::services::{Authentication, ExternalData, Notification};

mod risk;
pub use risk::RiskAssessment;

/// Smallest opening balance for a new account.
const MINIMUM_BALANCE: Amount = Amount::from_scaled(100); // 0.01
/// Risk score at or above which an account is frozen or suspended.
pub const HIGH_RISK_THRESHOLD: i32 = 75;
/// Maximum number of accounts one manager will hold.
pub const MAX_ACCOUNTS: usize = 10;

const ACCOUNT_NUMBER_PREFIX: &str = "ACC";
/// Account numbers are handed out above this seed.
const ACCOUNT_NUMBER_SEED: u64 = 500_000;

/// The account management engine.
pub struct AccountManager {
    accounts: HashMap<String, Account>,
    suspended_count: u32,
    total_managed_balance: Amount,
    next_account_id: u64,
    auth: Option<Box<dyn Authentication>>,
    notification: Option<Box<dyn Notification>>,
    data: Option<Box<dyn ExternalData>>,
}

/// Public API
impl AccountManager {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            suspended_count: 0,
            total_managed_balance: Amount::ZERO,
            next_account_id: ACCOUNT_NUMBER_SEED,
            auth: None,
            notification: None,
            data: None,
        }
    }

    pub fn set_authentication(&mut self, service: Box<dyn Authentication>) {
        self.auth = Some(service);
    }

    pub fn set_notification(&mut self, service: Box<dyn Notification>) {
        self.notification = Some(service);
    }

    pub fn set_external_data(&mut self, service: Box<dyn ExternalData>) {
        self.data = Some(service);
    }

    /// The injected authenticator, if any. Held purely as a hook for the
    /// embedding application; no manager operation consults it.
    pub fn authentication(&self) -> Option<&dyn Authentication> {
        self.auth.as_deref()
    }

    /// Open a new account in `PendingVerification` status.
    ///
    /// Returns `None` when the opening balance is below the minimum or the
    /// manager already holds its maximum number of accounts.
    pub fn create_account(&mut self, kind: AccountType, initial_balance: Amount) -> Option<String> {
        if initial_balance < MINIMUM_BALANCE {
            return None;
        }
        if self.accounts.len() >= MAX_ACCOUNTS {
            return None;
        }

        self.next_account_id += 1;
        let number = format!("{ACCOUNT_NUMBER_PREFIX}{}", self.next_account_id);

        let account = Account {
            number: number.clone(),
            kind,
            status: AccountStatus::PendingVerification,
            balance: initial_balance,
            credit_limit: Amount::ZERO,
            risk_score: 0,
            verified: false,
            fraud_alert: false,
        };
        self.accounts.insert(number.clone(), account);
        self.total_managed_balance += initial_balance;

        info!(account = %number, balance = %initial_balance, "account created");
        Some(number)
    }

    /// Move an account to `Active`.
    ///
    /// Fails for unknown accounts, unverified pending accounts, and
    /// closed or frozen accounts. A verified pending account activates,
    /// and activating an already-active account succeeds as a no-op.
    pub fn activate_account(&mut self, number: &str) -> bool {
        let Some(account) = self.accounts.get_mut(number) else {
            return false;
        };

        if account.status == AccountStatus::PendingVerification && !account.verified {
            return false;
        }
        if account.status == AccountStatus::Closed || account.status == AccountStatus::Frozen {
            return false;
        }

        account.status = AccountStatus::Active;
        true
    }

    /// Move an account to `Suspended`.
    ///
    /// The suspended counter increments on every successful call, including
    /// repeated suspension of an already-suspended account; callers that
    /// need an exact count must not re-suspend.
    pub fn suspend_account(&mut self, number: &str, reason: &str) -> bool {
        let Some(account) = self.accounts.get_mut(number) else {
            return false;
        };

        if account.status == AccountStatus::Closed {
            return false;
        }

        account.status = AccountStatus::Suspended;
        self.suspended_count += 1;
        info!(account = %number, reason, "account suspended");
        true
    }

    /// Close an account. Requires a zero (or negative) balance; `Closed`
    /// is terminal.
    pub fn deactivate_account(&mut self, number: &str) -> bool {
        let Some(account) = self.accounts.get_mut(number) else {
            return false;
        };

        if account.status == AccountStatus::Closed {
            return false;
        }
        if account.balance.is_positive() {
            return false;
        }

        account.status = AccountStatus::Closed;
        info!(account = %number, "account closed");
        true
    }

    /// Score an account from last-day telemetry and act on the result.
    ///
    /// At or above [`HIGH_RISK_THRESHOLD`] the account is frozen (when the
    /// context has compliance-audit mode set) or suspended. Scores above 50
    /// advise `PendingVerification` and lower scores advise `Active`, but
    /// neither of those two outcomes touches the stored status.
    pub fn evaluate_risk(
        &mut self,
        ctx: &SystemContext,
        number: &str,
        transaction_count: u32,
        volume_last_day: Amount,
    ) -> RiskAssessment {
        let Some(account) = self.accounts.get_mut(number) else {
            return RiskAssessment::NotFound;
        };

        if let Some(data) = &self.data {
            // advisory lookup; the result does not feed the score
            let _ = data.linked_accounts(number);
        }

        let score = risk::risk_score(
            transaction_count,
            volume_last_day,
            account.verified,
            account.fraud_alert,
        );

        let outcome = if score >= HIGH_RISK_THRESHOLD && ctx.compliance_audit_mode {
            account.status = AccountStatus::Frozen;
            AccountStatus::Frozen
        } else if score >= HIGH_RISK_THRESHOLD {
            account.status = AccountStatus::Suspended;
            self.suspended_count += 1;
            AccountStatus::Suspended
        } else if score > 50 {
            AccountStatus::PendingVerification
        } else {
            AccountStatus::Active
        };

        info!(account = %number, score, outcome = %outcome, "risk evaluated");
        RiskAssessment::Evaluated(outcome)
    }

    /// Apply a direct status transition, subject to the transition rules.
    ///
    /// `Closed` accounts accept only `Closed` (a no-op). Leaving `Frozen`
    /// for `Active` requires a verified account without a fraud alert, and
    /// suspending an `Active` account requires a stored risk score at or
    /// above the threshold.
    pub fn update_status(&mut self, number: &str, new_status: AccountStatus) -> bool {
        let Some(account) = self.accounts.get_mut(number) else {
            return false;
        };

        if account.status == AccountStatus::Closed && new_status != AccountStatus::Closed {
            return false;
        } else if account.status == AccountStatus::Frozen && new_status == AccountStatus::Active {
            if !account.verified || account.fraud_alert {
                return false;
            }
        } else if new_status == AccountStatus::Suspended
            && account.risk_score < HIGH_RISK_THRESHOLD
            && account.status == AccountStatus::Active
        {
            return false;
        }

        if account.status == AccountStatus::Suspended && new_status == AccountStatus::Active {
            self.suspended_count = self.suspended_count.saturating_sub(1);
        } else if account.status != AccountStatus::Suspended
            && new_status == AccountStatus::Suspended
        {
            self.suspended_count += 1;
        }

        account.status = new_status;
        true
    }

    /// Record a verification result.
    ///
    /// The verified flag is always updated. Returns `true` only for the
    /// `PendingVerification` -> `Active` promotion; a successful result on
    /// an account in any other status updates the flag but reports `false`.
    pub fn verify_account(&mut self, number: &str, result: bool) -> bool {
        let Some(account) = self.accounts.get_mut(number) else {
            return false;
        };

        account.verified = result;

        if let Some(data) = &self.data {
            // advisory lookups; results unused
            let _ = data.identity_verification_status(number);
            let _ = data.credit_score(number);
        }

        if result {
            if let Some(notification) = &self.notification {
                // fire and forget
                let _ = notification.send_email(
                    "user@example.com",
                    "Account Verified",
                    "Your account has been verified successfully.",
                );
            }
        }

        if result && account.status == AccountStatus::PendingVerification {
            account.status = AccountStatus::Active;
            info!(account = %number, "account verified and activated");
            return true;
        }

        false
    }

    pub fn account(&self, number: &str) -> Option<&Account> {
        self.accounts.get(number)
    }

    pub fn account_mut(&mut self, number: &str) -> Option<&mut Account> {
        self.accounts.get_mut(number)
    }

    pub fn balance(&self, number: &str) -> Option<Amount> {
        self.accounts.get(number).map(|account| account.balance)
    }

    pub fn suspended_count(&self) -> u32 {
        self.suspended_count
    }

    /// Sum of all opening balances taken under management.
    pub fn total_managed_balance(&self) -> Amount {
        self.total_managed_balance
    }
}

impl Default for AccountManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // test utils

    fn manager_with_account() -> (AccountManager, String) {
        let mut manager = AccountManager::new();
        let number = manager
            .create_account(AccountType::Checking, Amount::from_float(100.0))
            .unwrap();
        (manager, number)
    }

    fn audit_ctx() -> SystemContext {
        SystemContext {
            compliance_audit_mode: true,
            ..Default::default()
        }
    }

    // create_account

    #[test]
    fn create_rejects_balance_below_minimum() {
        let mut manager = AccountManager::new();
        assert_eq!(
            manager.create_account(AccountType::Checking, Amount::ZERO),
            None
        );
        assert_eq!(
            manager.create_account(AccountType::Checking, Amount::from_float(0.0099)),
            None
        );
    }

    #[test]
    fn create_accepts_the_minimum_balance() {
        let mut manager = AccountManager::new();
        let number = manager
            .create_account(AccountType::Checking, Amount::from_float(0.01))
            .unwrap();
        assert_eq!(number, "ACC500001");

        let account = manager.account(&number).unwrap();
        assert_eq!(account.status, AccountStatus::PendingVerification);
        assert_eq!(account.risk_score, 0);
        assert!(!account.verified);
        assert!(!account.fraud_alert);
        assert_eq!(account.credit_limit, Amount::ZERO);
    }

    #[test]
    fn created_numbers_are_unique_and_prefixed() {
        let mut manager = AccountManager::new();
        let a = manager
            .create_account(AccountType::Savings, Amount::from_float(1.0))
            .unwrap();
        let b = manager
            .create_account(AccountType::Business, Amount::from_float(1.0))
            .unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("ACC"));
        assert!(b.starts_with("ACC"));
    }

    #[test]
    fn create_refuses_an_eleventh_account() {
        let mut manager = AccountManager::new();
        for _ in 0..MAX_ACCOUNTS {
            assert!(
                manager
                    .create_account(AccountType::Checking, Amount::from_float(1.0))
                    .is_some()
            );
        }
        assert_eq!(
            manager.create_account(AccountType::Checking, Amount::from_float(1.0)),
            None
        );
    }

    #[test]
    fn create_accumulates_managed_balance() {
        let mut manager = AccountManager::new();
        manager.create_account(AccountType::Checking, Amount::from_float(100.0));
        manager.create_account(AccountType::Savings, Amount::from_float(50.0));
        assert_eq!(manager.total_managed_balance(), Amount::from_float(150.0));
    }

    // activate_account

    #[test]
    fn activate_unknown_account_fails() {
        let mut manager = AccountManager::new();
        assert!(!manager.activate_account("ACC999999"));
    }

    #[test]
    fn activate_unverified_pending_account_fails() {
        let (mut manager, number) = manager_with_account();
        assert!(!manager.activate_account(&number));
    }

    #[test]
    fn activate_verified_pending_account_succeeds() {
        let (mut manager, number) = manager_with_account();
        manager.account_mut(&number).unwrap().verified = true;

        assert!(manager.activate_account(&number));
        assert_eq!(manager.account(&number).unwrap().status, AccountStatus::Active);
    }

    #[test]
    fn activate_is_idempotent_on_active_accounts() {
        let (mut manager, number) = manager_with_account();
        manager.verify_account(&number, true);

        assert!(manager.activate_account(&number));
        assert!(manager.activate_account(&number));
    }

    #[test]
    fn activate_closed_or_frozen_account_fails() {
        let (mut manager, number) = manager_with_account();
        manager.account_mut(&number).unwrap().status = AccountStatus::Frozen;
        assert!(!manager.activate_account(&number));

        manager.account_mut(&number).unwrap().status = AccountStatus::Closed;
        assert!(!manager.activate_account(&number));
    }

    // suspend_account

    #[test]
    fn suspend_sets_status_and_counts() {
        let (mut manager, number) = manager_with_account();
        assert!(manager.suspend_account(&number, "manual review"));
        assert_eq!(
            manager.account(&number).unwrap().status,
            AccountStatus::Suspended
        );
        assert_eq!(manager.suspended_count(), 1);
    }

    #[test]
    fn suspend_unknown_or_closed_account_fails() {
        let (mut manager, number) = manager_with_account();
        assert!(!manager.suspend_account("ACC999999", "x"));

        manager.account_mut(&number).unwrap().status = AccountStatus::Closed;
        assert!(!manager.suspend_account(&number, "x"));
        assert_eq!(manager.suspended_count(), 0);
    }

    #[test]
    fn repeated_suspension_double_counts() {
        // the counter increment is not guarded by the current status, so
        // re-suspending inflates it; kept as specified
        let (mut manager, number) = manager_with_account();
        assert!(manager.suspend_account(&number, "first"));
        assert!(manager.suspend_account(&number, "second"));
        assert_eq!(manager.suspended_count(), 2);
    }

    // deactivate_account

    #[test]
    fn deactivate_refuses_positive_balance() {
        let (mut manager, number) = manager_with_account();
        assert!(!manager.deactivate_account(&number));
    }

    #[test]
    fn deactivate_closes_once_balance_is_zero() {
        let (mut manager, number) = manager_with_account();
        manager.account_mut(&number).unwrap().balance = Amount::ZERO;

        assert!(manager.deactivate_account(&number));
        assert_eq!(manager.account(&number).unwrap().status, AccountStatus::Closed);

        // closed is terminal; a second close fails
        assert!(!manager.deactivate_account(&number));
    }

    #[test]
    fn deactivate_unknown_account_fails() {
        let mut manager = AccountManager::new();
        assert!(!manager.deactivate_account("ACC999999"));
    }

    // evaluate_risk

    #[test]
    fn risk_of_unknown_account_reads_as_closed() {
        let mut manager = AccountManager::new();
        let assessment =
            manager.evaluate_risk(&SystemContext::default(), "ACC999999", 0, Amount::ZERO);
        assert_eq!(assessment, RiskAssessment::NotFound);
        assert_eq!(assessment.status(), AccountStatus::Closed);
    }

    #[test]
    fn high_risk_account_is_frozen_in_audit_mode() {
        let (mut manager, number) = manager_with_account();
        manager.account_mut(&number).unwrap().fraud_alert = true;

        let assessment =
            manager.evaluate_risk(&audit_ctx(), &number, 150, Amount::from_units(1_200_000));

        assert_eq!(assessment.status(), AccountStatus::Frozen);
        assert_eq!(manager.account(&number).unwrap().status, AccountStatus::Frozen);
        assert_eq!(manager.suspended_count(), 0);
    }

    #[test]
    fn high_risk_account_is_suspended_outside_audit_mode() {
        let (mut manager, number) = manager_with_account();
        manager.account_mut(&number).unwrap().fraud_alert = true;

        let assessment = manager.evaluate_risk(
            &SystemContext::default(),
            &number,
            150,
            Amount::from_units(1_200_000),
        );

        assert_eq!(assessment.status(), AccountStatus::Suspended);
        assert_eq!(
            manager.account(&number).unwrap().status,
            AccountStatus::Suspended
        );
        assert_eq!(manager.suspended_count(), 1);
    }

    #[test]
    fn elevated_score_advises_verification_without_touching_status() {
        let (mut manager, number) = manager_with_account();
        manager.account_mut(&number).unwrap().status = AccountStatus::Active;

        // unverified (+20) + heavy volume (+40) = 60: above 50, below 75
        let assessment = manager.evaluate_risk(
            &SystemContext::default(),
            &number,
            0,
            Amount::from_units(1_200_000),
        );

        assert_eq!(assessment.status(), AccountStatus::PendingVerification);
        // stored status is deliberately left alone in this branch
        assert_eq!(manager.account(&number).unwrap().status, AccountStatus::Active);
    }

    #[test]
    fn low_score_advises_active_without_touching_status() {
        let (mut manager, number) = manager_with_account();
        let assessment =
            manager.evaluate_risk(&SystemContext::default(), &number, 0, Amount::ZERO);

        assert_eq!(assessment.status(), AccountStatus::Active);
        assert_eq!(
            manager.account(&number).unwrap().status,
            AccountStatus::PendingVerification
        );
    }

    #[test]
    fn threshold_boundary_exactly_75_suspends() {
        let (mut manager, number) = manager_with_account();
        // unverified+fraud (+35) + volume > 1M (+40) = 75
        manager.account_mut(&number).unwrap().fraud_alert = true;
        let assessment = manager.evaluate_risk(
            &SystemContext::default(),
            &number,
            0,
            Amount::from_units(1_200_000),
        );
        assert_eq!(assessment.status(), AccountStatus::Suspended);
    }

    // update_status

    #[test]
    fn closed_accounts_accept_only_closed() {
        let (mut manager, number) = manager_with_account();
        manager.account_mut(&number).unwrap().status = AccountStatus::Closed;

        assert!(!manager.update_status(&number, AccountStatus::Active));
        assert!(!manager.update_status(&number, AccountStatus::Suspended));
        assert!(!manager.update_status(&number, AccountStatus::Frozen));
        assert!(!manager.update_status(&number, AccountStatus::PendingVerification));
        // no-op transition is allowed
        assert!(manager.update_status(&number, AccountStatus::Closed));
    }

    #[test]
    fn frozen_to_active_requires_verified_without_fraud_alert() {
        let (mut manager, number) = manager_with_account();
        {
            let account = manager.account_mut(&number).unwrap();
            account.status = AccountStatus::Frozen;
            account.verified = false;
        }
        assert!(!manager.update_status(&number, AccountStatus::Active));

        manager.account_mut(&number).unwrap().verified = true;
        manager.account_mut(&number).unwrap().fraud_alert = true;
        assert!(!manager.update_status(&number, AccountStatus::Active));

        manager.account_mut(&number).unwrap().fraud_alert = false;
        assert!(manager.update_status(&number, AccountStatus::Active));
    }

    #[test]
    fn active_account_with_low_risk_cannot_be_suspended_directly() {
        let (mut manager, number) = manager_with_account();
        manager.account_mut(&number).unwrap().status = AccountStatus::Active;

        assert!(!manager.update_status(&number, AccountStatus::Suspended));
    }

    #[test]
    fn active_account_at_threshold_risk_can_be_suspended() {
        let (mut manager, number) = manager_with_account();
        {
            let account = manager.account_mut(&number).unwrap();
            account.status = AccountStatus::Active;
            account.risk_score = HIGH_RISK_THRESHOLD;
        }

        assert!(manager.update_status(&number, AccountStatus::Suspended));
        assert_eq!(manager.suspended_count(), 1);
    }

    #[test]
    fn non_active_account_with_low_risk_can_be_suspended() {
        // the low-risk guard only protects Active accounts
        let (mut manager, number) = manager_with_account();
        assert!(manager.update_status(&number, AccountStatus::Suspended));
        assert_eq!(manager.suspended_count(), 1);
    }

    #[test]
    fn leaving_suspension_for_active_decrements_the_counter() {
        let (mut manager, number) = manager_with_account();
        manager.suspend_account(&number, "review");
        assert_eq!(manager.suspended_count(), 1);

        manager.account_mut(&number).unwrap().verified = true;
        assert!(manager.update_status(&number, AccountStatus::Active));
        assert_eq!(manager.suspended_count(), 0);
    }

    #[test]
    fn leaving_suspension_for_frozen_does_not_decrement() {
        let (mut manager, number) = manager_with_account();
        manager.suspend_account(&number, "review");

        assert!(manager.update_status(&number, AccountStatus::Frozen));
        assert_eq!(manager.suspended_count(), 1);
    }

    #[test]
    fn update_status_unknown_account_fails() {
        let mut manager = AccountManager::new();
        assert!(!manager.update_status("ACC999999", AccountStatus::Active));
    }

    // verify_account

    #[test]
    fn verify_promotes_pending_account_to_active() {
        let (mut manager, number) = manager_with_account();

        assert!(manager.verify_account(&number, true));
        let account = manager.account(&number).unwrap();
        assert!(account.verified);
        assert_eq!(account.status, AccountStatus::Active);
    }

    #[test]
    fn verify_failure_keeps_pending_status() {
        let (mut manager, number) = manager_with_account();

        assert!(!manager.verify_account(&number, false));
        let account = manager.account(&number).unwrap();
        assert!(!account.verified);
        assert_eq!(account.status, AccountStatus::PendingVerification);
    }

    #[test]
    fn verify_success_on_non_pending_account_updates_flag_but_reports_false() {
        let (mut manager, number) = manager_with_account();
        manager.account_mut(&number).unwrap().status = AccountStatus::Active;

        assert!(!manager.verify_account(&number, true));
        assert!(manager.account(&number).unwrap().verified);
    }

    #[test]
    fn verify_unknown_account_fails() {
        let mut manager = AccountManager::new();
        assert!(!manager.verify_account("ACC999999", true));
    }

    // accessors

    #[test]
    fn balance_of_unknown_account_is_none() {
        let (manager, number) = manager_with_account();
        assert_eq!(manager.balance(&number), Some(Amount::from_float(100.0)));
        assert_eq!(manager.balance("ACC999999"), None);
    }

    #[test]
    fn authentication_hook_defaults_to_absent() {
        let manager = AccountManager::new();
        assert!(manager.authentication().is_none());
    }
}
