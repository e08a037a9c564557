//! Additive risk scoring from transaction telemetry.

use crate::Amount;
use crate::model::AccountStatus;

const VOLUME_HIGH: Amount = Amount::from_units(1_000_000);
const VOLUME_MEDIUM: Amount = Amount::from_units(500_000);
const VOLUME_LOW: Amount = Amount::from_units(100_000);

/// Score an account from its last-day telemetry and verification flags.
///
/// Three independent ladders, each contributing its highest matching tier:
/// transaction frequency, moved volume, and the verification/fraud pair.
pub(super) fn risk_score(
    transaction_count: u32,
    volume_last_day: Amount,
    verified: bool,
    fraud_alert: bool,
) -> i32 {
    let mut score = 0;

    if transaction_count > 100 {
        score += 30;
    } else if transaction_count > 50 {
        score += 15;
    } else if transaction_count > 20 {
        score += 5;
    }

    if volume_last_day > VOLUME_HIGH {
        score += 40;
    } else if volume_last_day > VOLUME_MEDIUM {
        score += 20;
    } else if volume_last_day > VOLUME_LOW {
        score += 10;
    }

    if !verified && fraud_alert {
        score += 35;
    } else if !verified {
        score += 20;
    } else if fraud_alert {
        score += 25;
    }

    score
}

/// Result of a risk evaluation.
///
/// Unknown accounts are distinguished from real closures, but
/// [`status`](RiskAssessment::status) still collapses `NotFound` to
/// `Closed` for callers that only care about the status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskAssessment {
    /// No account with the given number exists.
    NotFound,
    /// The evaluated outcome for an existing account.
    Evaluated(AccountStatus),
}

impl RiskAssessment {
    /// The status an embedding caller observes; an unknown account reads
    /// as `Closed`.
    pub fn status(&self) -> AccountStatus {
        match self {
            RiskAssessment::NotFound => AccountStatus::Closed,
            RiskAssessment::Evaluated(status) => *status,
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, RiskAssessment::NotFound)
    }
}
