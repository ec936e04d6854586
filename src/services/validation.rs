use serde::{Deserialize, Serialize};

use crate::models::pricing_rules::{
    BlackoutPeriod, CapacitySetting, DynamicPricingRule, EarlyBirdLastMinuteRule,
    GroupDiscountTier, SeasonalPeriod,
};

/// One rejected field with the reason, surfaced to the admin UI as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn check(issues: Vec<ValidationIssue>) -> Result<(), Vec<ValidationIssue>> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Malformed rules are rejected here, before anything is persisted.
/// Overlaps and coverage gaps are deliberately allowed; the calculator
/// resolves those deterministically.
pub fn validate_seasonal_periods(periods: &[SeasonalPeriod]) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();
    for (i, period) in periods.iter().enumerate() {
        if period.start_date > period.end_date {
            issues.push(ValidationIssue::new(
                format!("seasonal_periods[{}].start_date", i),
                format!("'{}': start_date is after end_date", period.name),
            ));
        }
        if period.price_multiplier <= 0.0 {
            issues.push(ValidationIssue::new(
                format!("seasonal_periods[{}].price_multiplier", i),
                format!("'{}': multiplier must be positive", period.name),
            ));
        }
    }
    check(issues)
}

pub fn validate_dynamic_rules(rules: &[DynamicPricingRule]) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();
    for (i, rule) in rules.iter().enumerate() {
        if rule.base_price < 0.0 {
            issues.push(ValidationIssue::new(
                format!("dynamic_rules[{}].base_price", i),
                "base price cannot be negative",
            ));
        }
        for (j, t) in rule.occupancy_thresholds.iter().enumerate() {
            if t.min_occupancy > t.max_occupancy {
                issues.push(ValidationIssue::new(
                    format!("dynamic_rules[{}].occupancy_thresholds[{}]", i, j),
                    "min_occupancy exceeds max_occupancy",
                ));
            }
            if t.min_occupancy < 0.0 || t.max_occupancy > 100.0 {
                issues.push(ValidationIssue::new(
                    format!("dynamic_rules[{}].occupancy_thresholds[{}]", i, j),
                    "occupancy bounds must lie within [0, 100]",
                ));
            }
            if t.price_multiplier <= 0.0 {
                issues.push(ValidationIssue::new(
                    format!(
                        "dynamic_rules[{}].occupancy_thresholds[{}].price_multiplier",
                        i, j
                    ),
                    "multiplier must be positive",
                ));
            }
        }
        for (j, r) in rule.days_to_departure_rules.iter().enumerate() {
            if r.days_range.min > r.days_range.max {
                issues.push(ValidationIssue::new(
                    format!("dynamic_rules[{}].days_to_departure_rules[{}]", i, j),
                    "days range min exceeds max",
                ));
            }
            if r.price_multiplier <= 0.0 {
                issues.push(ValidationIssue::new(
                    format!(
                        "dynamic_rules[{}].days_to_departure_rules[{}].price_multiplier",
                        i, j
                    ),
                    "multiplier must be positive",
                ));
            }
        }
    }
    check(issues)
}

pub fn validate_group_tiers(tiers: &[GroupDiscountTier]) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();
    for (i, tier) in tiers.iter().enumerate() {
        if tier.min_group_size == 0 {
            issues.push(ValidationIssue::new(
                format!("group_discounts[{}].min_group_size", i),
                format!("'{}': minimum group size must be at least 1", tier.name),
            ));
        }
        if let Some(max) = tier.max_group_size {
            if tier.min_group_size > max {
                issues.push(ValidationIssue::new(
                    format!("group_discounts[{}].min_group_size", i),
                    format!("'{}': min_group_size exceeds max_group_size", tier.name),
                ));
            }
        }
        if !(0.0..=100.0).contains(&tier.discount_percentage) {
            issues.push(ValidationIssue::new(
                format!("group_discounts[{}].discount_percentage", i),
                format!("'{}': discount must lie within [0, 100]", tier.name),
            ));
        }
        if let Some(price) = tier.price_per_person {
            if price < 0.0 {
                issues.push(ValidationIssue::new(
                    format!("group_discounts[{}].price_per_person", i),
                    format!("'{}': fixed price cannot be negative", tier.name),
                ));
            }
        }
    }
    check(issues)
}

pub fn validate_early_bird_last_minute(
    rule: &EarlyBirdLastMinuteRule,
) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();
    if rule.early_bird_days_before_departure < 0 {
        issues.push(ValidationIssue::new(
            "early_bird_days_before_departure",
            "lead time cannot be negative",
        ));
    }
    if rule.last_minute_days_before_departure < 0 {
        issues.push(ValidationIssue::new(
            "last_minute_days_before_departure",
            "lead time cannot be negative",
        ));
    }
    if !(0.0..=100.0).contains(&rule.early_bird_discount) {
        issues.push(ValidationIssue::new(
            "early_bird_discount",
            "discount must lie within [0, 100]",
        ));
    }
    if !(0.0..=100.0).contains(&rule.last_minute_discount) {
        issues.push(ValidationIssue::new(
            "last_minute_discount",
            "discount must lie within [0, 100]",
        ));
    }
    check(issues)
}

pub fn validate_blackout_period(period: &BlackoutPeriod) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();
    if period.start_date > period.end_date {
        issues.push(ValidationIssue::new(
            "start_date",
            format!("'{}': start_date is after end_date", period.name),
        ));
    }
    if !period.blocks_all_tours && period.tour_ids.is_empty() {
        issues.push(ValidationIssue::new(
            "tour_ids",
            format!("'{}': blocks no tours at all", period.name),
        ));
    }
    check(issues)
}

pub fn validate_capacity_settings(settings: &CapacitySetting) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();
    if settings.min_capacity > settings.max_capacity {
        issues.push(ValidationIssue::new(
            "min_capacity",
            "min_capacity exceeds max_capacity",
        ));
    }
    if settings.blocked_seats.unwrap_or(0) > settings.max_capacity {
        issues.push(ValidationIssue::new(
            "blocked_seats",
            "cannot block more seats than the maximum capacity",
        ));
    }
    if let Some(preferred) = settings.preferred_capacity {
        if preferred > settings.max_capacity {
            issues.push(ValidationIssue::new(
                "preferred_capacity",
                "preferred capacity exceeds max_capacity",
            ));
        }
    }
    check(issues)
}
