use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::analytics::PriceHistoryEntry;
use crate::models::calendar::PriceCalendarEntry;
use crate::models::pricing_rules::{
    BlackoutPeriod, CapacitySetting, DynamicPricingRule, EarlyBirdLastMinuteRule,
    GroupDiscountTier, SeasonalPeriod,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasePricing {
    /// Per-person price before any rule fires.
    pub base_price: f64,
    pub currency: String,
    /// Share of the final price collected as a deposit, in percent.
    pub deposit_percentage: f64,
}

impl Default for BasePricing {
    fn default() -> Self {
        Self {
            base_price: 0.0,
            currency: "USD".to_string(),
            deposit_percentage: 20.0,
        }
    }
}

/// Aggregate root for one tour's pricing. Rule collections are replaced
/// wholesale by the store's update operations; `price_calendar` and
/// `price_history` are derived and never mutated by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfiguration {
    pub tour_id: String,
    pub base_pricing: BasePricing,
    pub seasonal_periods: Vec<SeasonalPeriod>,
    pub dynamic_rules: Vec<DynamicPricingRule>,
    pub group_discounts: Vec<GroupDiscountTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub early_bird_last_minute: Option<EarlyBirdLastMinuteRule>,
    pub blackout_periods: Vec<BlackoutPeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_settings: Option<CapacitySetting>,
    pub price_calendar: Vec<PriceCalendarEntry>,
    pub price_history: Vec<PriceHistoryEntry>,
    pub updated_at: DateTime<Utc>,
}

impl PricingConfiguration {
    pub fn new(tour_id: impl Into<String>, base_pricing: BasePricing) -> Self {
        Self {
            tour_id: tour_id.into(),
            base_pricing,
            seasonal_periods: Vec::new(),
            dynamic_rules: Vec::new(),
            group_discounts: Vec::new(),
            early_bird_last_minute: None,
            blackout_periods: Vec::new(),
            capacity_settings: None,
            price_calendar: Vec::new(),
            price_history: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Whether any blackout period blocks this tour on `date`.
    pub fn is_blacked_out(&self, date: chrono::NaiveDate) -> bool {
        self.blackout_periods
            .iter()
            .any(|p| p.blocks(&self.tour_id, date))
    }
}
