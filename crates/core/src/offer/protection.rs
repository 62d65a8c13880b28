use rust_decimal::Decimal;

use crate::domain::protection::ProtectionPackage;
use crate::errors::DomainError;
use crate::offer::policy::SelectionPolicy;

pub const PROTECTION_TIER_COUNT: usize = 3;

pub trait ProtectionSelector: Send + Sync {
    fn select_protection<'a>(
        &self,
        budget: Decimal,
        tiers: &'a [ProtectionPackage],
    ) -> Result<&'a ProtectionPackage, DomainError>;
}

/// Maps a budget onto the cheapest, mid or priciest tier.
///
/// Tiers are ranked by cost before bucketing, so the mapping holds whether
/// the feed lists them priciest-first (as the rental API does) or not.
#[derive(Clone, Debug, Default)]
pub struct ThresholdProtectionSelector {
    policy: SelectionPolicy,
}

impl ThresholdProtectionSelector {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self { policy }
    }
}

impl ProtectionSelector for ThresholdProtectionSelector {
    fn select_protection<'a>(
        &self,
        budget: Decimal,
        tiers: &'a [ProtectionPackage],
    ) -> Result<&'a ProtectionPackage, DomainError> {
        if tiers.len() != PROTECTION_TIER_COUNT {
            return Err(DomainError::InvalidCatalog(format!(
                "expected {PROTECTION_TIER_COUNT} protection tiers, found {}",
                tiers.len()
            )));
        }

        let mut ranked: Vec<&ProtectionPackage> = tiers.iter().collect();
        ranked.sort_by_key(|tier| tier.cost);

        let bucket = if budget < self.policy.mid_tier_threshold {
            0
        } else if budget < self.policy.premium_tier_threshold {
            1
        } else {
            2
        };

        Ok(ranked[bucket])
    }
}
