//! Business constants of the offer cascade.
//!
//! These are product decisions, not derived values. They can be overridden
//! through the `[selection]` configuration section; the defaults below are
//! the reference policy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Strict-stage price ceiling is `budget * BUDGET_SLACK_MULTIPLIER`.
pub const BUDGET_SLACK_MULTIPLIER: Decimal = Decimal::from_parts(13, 0, 0, false, 1);

/// Budgets below this get the cheapest protection tier.
pub const MID_TIER_THRESHOLD: Decimal = Decimal::from_parts(40, 0, 0, false, 0);

/// Budgets at or above this get the priciest protection tier.
pub const PREMIUM_TIER_THRESHOLD: Decimal = Decimal::from_parts(70, 0, 0, false, 0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    pub budget_slack_multiplier: Decimal,
    pub mid_tier_threshold: Decimal,
    pub premium_tier_threshold: Decimal,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            budget_slack_multiplier: BUDGET_SLACK_MULTIPLIER,
            mid_tier_threshold: MID_TIER_THRESHOLD,
            premium_tier_threshold: PREMIUM_TIER_THRESHOLD,
        }
    }
}

impl SelectionPolicy {
    /// Saturates at `Decimal::MAX`, which leaves every vehicle under the ceiling.
    pub fn price_ceiling(&self, budget: Decimal) -> Decimal {
        budget.checked_mul(self.budget_slack_multiplier).unwrap_or(Decimal::MAX)
    }
}
