use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::analytics::{AdjustmentKind, PriceAdjustment};
use crate::models::configuration::PricingConfiguration;
use crate::models::pricing_rules::{DynamicPricingRule, GroupDiscountTier};

/// Result of a single-date price computation: the final per-person price plus
/// an itemized trail of which rules fired and by how much.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    pub base_price: f64,
    pub final_price: f64,
    pub breakdown: Vec<PriceAdjustment>,
    /// Set when a blackout period blocks this date. The price stays numeric
    /// for display; bookability is denied by the calendar status, not by
    /// zeroing the price.
    pub blacked_out: bool,
}

pub struct PricingService;

impl PricingService {
    /// Compute the bookable per-person price for one date.
    ///
    /// Steps run in a fixed order, each multiplying or discounting the
    /// running price (never the original base): seasonal -> occupancy ->
    /// days-to-departure -> early-bird/last-minute -> group tier. Rounding
    /// happens once at the end so intermediate steps never compound error.
    pub fn calculate_price(
        config: &PricingConfiguration,
        date: NaiveDate,
        today: NaiveDate,
        group_size: u32,
        occupancy_percentage: f64,
    ) -> PriceQuote {
        let base_price = config.base_pricing.base_price;
        let mut running = base_price;
        let mut breakdown: Vec<PriceAdjustment> = Vec::new();

        // Seasonal: first matching period in configured list order wins.
        // Overlapping periods never stack.
        if let Some(period) = config
            .seasonal_periods
            .iter()
            .find(|p| date >= p.start_date && date <= p.end_date)
        {
            let adjusted = running * period.price_multiplier;
            if (adjusted - running).abs() > f64::EPSILON {
                breakdown.push(PriceAdjustment {
                    rule: period.name.clone(),
                    kind: AdjustmentKind::Seasonal,
                    amount: adjusted - running,
                });
            }
            running = adjusted;
        }

        let days_until = (date - today).num_days();

        if let Some(rule) = Self::applicable_dynamic_rule(config) {
            // Occupancy bracket: half-open [min, max), except a bracket
            // ending at 100 which is closed so 100% occupancy still matches.
            if let Some(threshold) = rule.occupancy_thresholds.iter().find(|t| {
                occupancy_percentage >= t.min_occupancy
                    && (occupancy_percentage < t.max_occupancy
                        || (t.max_occupancy >= 100.0 && occupancy_percentage <= t.max_occupancy))
            }) {
                let adjusted = running * threshold.price_multiplier;
                if (adjusted - running).abs() > f64::EPSILON {
                    breakdown.push(PriceAdjustment {
                        rule: format!(
                            "{} (occupancy {:.0}-{:.0}%)",
                            rule.name, threshold.min_occupancy, threshold.max_occupancy
                        ),
                        kind: AdjustmentKind::Occupancy,
                        amount: adjusted - running,
                    });
                }
                running = adjusted;
            }

            // Days-to-departure bracket, compounding on the occupancy-adjusted
            // price. An unmatched bracket on either axis means no adjustment.
            if let Some(dtd) = rule
                .days_to_departure_rules
                .iter()
                .find(|r| days_until >= r.days_range.min && days_until <= r.days_range.max)
            {
                let adjusted = running * dtd.price_multiplier;
                if (adjusted - running).abs() > f64::EPSILON {
                    breakdown.push(PriceAdjustment {
                        rule: format!(
                            "{} ({}-{} days out)",
                            rule.name, dtd.days_range.min, dtd.days_range.max
                        ),
                        kind: AdjustmentKind::DaysToDeparture,
                        amount: adjusted - running,
                    });
                }
                running = adjusted;
            }
        }

        // Early-bird and last-minute are mutually exclusive per calculation;
        // early-bird is checked first.
        if let Some(rule) = config
            .early_bird_last_minute
            .as_ref()
            .filter(|r| r.tour_ids.is_empty() || r.tour_ids.iter().any(|t| t == &config.tour_id))
        {
            if rule.early_bird_enabled && days_until >= rule.early_bird_days_before_departure {
                let discount = running * rule.early_bird_discount / 100.0;
                if discount.abs() > f64::EPSILON {
                    breakdown.push(PriceAdjustment {
                        rule: format!("Early bird ({}% off)", rule.early_bird_discount),
                        kind: AdjustmentKind::EarlyBird,
                        amount: -discount,
                    });
                }
                running -= discount;
            } else if rule.last_minute_enabled
                && days_until <= rule.last_minute_days_before_departure
            {
                let discount = running * rule.last_minute_discount / 100.0;
                if discount.abs() > f64::EPSILON {
                    breakdown.push(PriceAdjustment {
                        rule: format!("Last minute ({}% off)", rule.last_minute_discount),
                        kind: AdjustmentKind::LastMinute,
                        amount: -discount,
                    });
                }
                running -= discount;
            }
        }

        if let Some(tier) = Self::select_group_tier(&config.group_discounts, group_size) {
            if let Some(per_person) = tier.price_per_person {
                // A fixed per-person price overrides the percentage outright.
                if (per_person - running).abs() > f64::EPSILON {
                    breakdown.push(PriceAdjustment {
                        rule: tier.name.clone(),
                        kind: AdjustmentKind::Group,
                        amount: per_person - running,
                    });
                }
                running = per_person;
            } else {
                let discount = running * tier.discount_percentage / 100.0;
                if discount.abs() > f64::EPSILON {
                    breakdown.push(PriceAdjustment {
                        rule: tier.name.clone(),
                        kind: AdjustmentKind::Group,
                        amount: -discount,
                    });
                }
                running -= discount;
            }
        }

        PriceQuote {
            base_price,
            final_price: running.round(),
            breakdown,
            blacked_out: config.is_blacked_out(date),
        }
    }

    /// First active dynamic rule that applies to this tour. An empty
    /// `tour_ids` list means the rule applies to every tour.
    fn applicable_dynamic_rule(config: &PricingConfiguration) -> Option<&DynamicPricingRule> {
        config.dynamic_rules.iter().find(|r| {
            r.is_active && (r.tour_ids.is_empty() || r.tour_ids.iter().any(|t| t == &config.tour_id))
        })
    }

    /// Among tiers containing `group_size`, pick the one with the largest
    /// `min_group_size` so overlapping tiers resolve deterministically to the
    /// most specific match.
    fn select_group_tier(
        tiers: &[GroupDiscountTier],
        group_size: u32,
    ) -> Option<&GroupDiscountTier> {
        tiers
            .iter()
            .filter(|t| {
                group_size >= t.min_group_size
                    && t.max_group_size.map_or(true, |max| group_size <= max)
            })
            .max_by_key(|t| t.min_group_size)
    }
}
