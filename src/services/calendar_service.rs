use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::bulk::{BulkPricingUpdate, BulkUpdateStatus};
use crate::models::calendar::{AvailabilityStatus, PriceCalendarEntry};
use crate::models::configuration::PricingConfiguration;
use crate::services::pricing_service::PricingService;

/// Seats already sold for a tour on a departure date. Production wires the
/// booking ledger in here; tests substitute deterministic fixtures.
pub trait OccupancySource: Sync {
    fn booked_seats(&self, tour_id: &str, date: NaiveDate) -> u32;
}

/// Occupancy cutoffs for the calendar status, in percent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityThresholds {
    /// At or above this, a date shows as `full`.
    pub full_threshold: f64,
    /// At or above this (but below full), a date shows as `limited`.
    pub limited_threshold: f64,
}

impl Default for AvailabilityThresholds {
    fn default() -> Self {
        Self {
            full_threshold: 90.0,
            limited_threshold: 70.0,
        }
    }
}

impl AvailabilityThresholds {
    /// Create thresholds from environment variables or use defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            full_threshold: std::env::var("CALENDAR_FULL_THRESHOLD")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.full_threshold),
            limited_threshold: std::env::var("CALENDAR_LIMITED_THRESHOLD")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.limited_threshold),
        }
    }
}

#[derive(Default)]
pub struct CalendarGenerator {
    pub thresholds: AvailabilityThresholds,
}

impl CalendarGenerator {
    pub fn new() -> Self {
        Self {
            thresholds: AvailabilityThresholds::from_env(),
        }
    }

    pub fn with_thresholds(thresholds: AvailabilityThresholds) -> Self {
        Self { thresholds }
    }

    /// Build one `PriceCalendarEntry` per date in `[start, end]` inclusive.
    ///
    /// Each date is an independent pure computation, so the range fans out
    /// over rayon; collect preserves date order. Entry ids are derived from
    /// tour and date, which keeps regeneration idempotent: unchanged rules
    /// and occupancy reproduce byte-identical entries.
    pub fn generate(
        &self,
        config: &PricingConfiguration,
        occupancy: &dyn OccupancySource,
        bulk_updates: &[BulkPricingUpdate],
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Vec<PriceCalendarEntry> {
        if start > end {
            return Vec::new();
        }
        let dates: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= end).collect();

        dates
            .par_iter()
            .map(|&date| self.entry_for(config, occupancy, bulk_updates, date, today))
            .collect()
    }

    fn entry_for(
        &self,
        config: &PricingConfiguration,
        occupancy: &dyn OccupancySource,
        bulk_updates: &[BulkPricingUpdate],
        date: NaiveDate,
        today: NaiveDate,
    ) -> PriceCalendarEntry {
        let booked = occupancy.booked_seats(&config.tour_id, date);

        // Occupancy is measured against max capacity; blocked seats only
        // reduce what is sellable.
        let (occupancy_percentage, available_spots) = match &config.capacity_settings {
            Some(cap) if cap.max_capacity > 0 => {
                let pct = (f64::from(booked) / f64::from(cap.max_capacity) * 100.0).min(100.0);
                (pct, cap.sellable_capacity().saturating_sub(booked))
            }
            _ => (0.0, 0),
        };

        let quote = PricingService::calculate_price(config, date, today, 1, occupancy_percentage);

        let mut applied_rules: Vec<String> = quote
            .breakdown
            .iter()
            .map(|adj| format!("{} ({:+.0})", adj.rule, adj.amount))
            .collect();

        let mut price = quote.final_price;
        for update in bulk_updates
            .iter()
            .filter(|u| u.status == BulkUpdateStatus::Applied && u.covers(&config.tour_id, date))
        {
            price = update.apply_to(price).round();
            applied_rules.push(update.name.clone());
        }

        let status = if quote.blacked_out {
            AvailabilityStatus::Blackout
        } else if occupancy_percentage >= self.thresholds.full_threshold {
            AvailabilityStatus::Full
        } else if occupancy_percentage >= self.thresholds.limited_threshold {
            AvailabilityStatus::Limited
        } else {
            AvailabilityStatus::Available
        };

        let deposit_price = (price * config.base_pricing.deposit_percentage / 100.0).round();

        PriceCalendarEntry {
            id: Uuid::new_v5(
                &Uuid::NAMESPACE_OID,
                format!("{}:{}", config.tour_id, date).as_bytes(),
            ),
            tour_id: config.tour_id.clone(),
            date,
            price,
            deposit_price,
            available_spots,
            status,
            occupancy_percentage,
            applied_rules,
        }
    }
}
