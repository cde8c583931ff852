use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::models::PaymentOutcome;

/// Pro subscription state. Entitlement is derived from `expires_at` on
/// every read — there is no separate "subscribed" flag to drift out of
/// sync once time passes. `payment_result` is ephemeral UI feedback and
/// is excluded from the persisted blob.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionState {
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    payment_result: Option<PaymentOutcome>,
}

/// One calendar month after `start`, with end-of-month clamping
/// (Jan 31 + 1 month lands on the last day of February).
fn expiry_from(start: DateTime<Utc>) -> Option<DateTime<Utc>> {
    start.checked_add_months(Months::new(1))
}

impl SubscriptionState {
    /// Start (or extend) the subscription: one month from now.
    pub fn activate(&mut self) {
        self.expires_at = expiry_from(Utc::now());
    }

    /// Drop the subscription immediately.
    pub fn deactivate(&mut self) {
        self.expires_at = None;
    }

    pub fn set_payment_result(&mut self, outcome: PaymentOutcome) {
        self.payment_result = Some(outcome);
    }

    pub fn clear_payment_result(&mut self) {
        self.payment_result = None;
    }

    pub fn payment_result(&self) -> Option<PaymentOutcome> {
        self.payment_result
    }

    /// Entitled iff the expiry is present and strictly in the future.
    pub fn is_entitled(&self) -> bool {
        self.expires_at.is_some_and(|t| t > Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn activate_grants_entitlement() {
        let mut state = SubscriptionState::default();
        assert!(!state.is_entitled());

        state.activate();
        assert!(state.is_entitled());
    }

    #[test]
    fn deactivate_revokes_entitlement() {
        let mut state = SubscriptionState::default();
        state.activate();
        state.deactivate();
        assert!(!state.is_entitled());
        assert!(state.expires_at.is_none());
    }

    #[test]
    fn past_expiry_is_not_entitled() {
        let state = SubscriptionState {
            expires_at: Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
            payment_result: None,
        };
        assert!(!state.is_entitled());
    }

    #[test]
    fn month_arithmetic_clamps_at_month_end() {
        let jan_31 = Utc.with_ymd_and_hms(2025, 1, 31, 12, 0, 0).unwrap();
        let expiry = expiry_from(jan_31).unwrap();
        assert_eq!(expiry, Utc.with_ymd_and_hms(2025, 2, 28, 12, 0, 0).unwrap());

        let leap = Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap();
        let expiry = expiry_from(leap).unwrap();
        assert_eq!(expiry, Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap());
    }

    #[test]
    fn payment_result_is_set_and_cleared() {
        let mut state = SubscriptionState::default();
        assert!(state.payment_result().is_none());

        state.set_payment_result(PaymentOutcome::Error);
        assert_eq!(state.payment_result(), Some(PaymentOutcome::Error));

        state.clear_payment_result();
        assert!(state.payment_result().is_none());
    }

    #[test]
    fn payment_result_is_not_serialized() {
        let mut state = SubscriptionState::default();
        state.activate();
        state.set_payment_result(PaymentOutcome::Success);

        let blob = serde_json::to_string(&state).unwrap();
        assert!(!blob.contains("payment_result"));

        // And a rehydrated copy starts with the marker cleared.
        let back: SubscriptionState = serde_json::from_str(&blob).unwrap();
        assert!(back.payment_result().is_none());
        assert_eq!(back.expires_at, state.expires_at);
    }
}
