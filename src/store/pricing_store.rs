use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::analytics::{PriceHistoryEntry, PricingAnalytics};
use crate::models::bookings::Booking;
use crate::models::bulk::{BulkPricingUpdate, BulkUpdateStatus};
use crate::models::calendar::{CalendarFilter, PriceCalendarEntry};
use crate::models::configuration::PricingConfiguration;
use crate::models::pricing_rules::{
    BlackoutPeriod, CapacitySetting, DynamicPricingRule, EarlyBirdLastMinuteRule,
    GroupDiscountTier, SeasonalPeriod,
};
use crate::services::analytics_service::AnalyticsService;
use crate::services::calendar_service::{CalendarGenerator, OccupancySource};
use crate::services::pricing_service::{PriceQuote, PricingService};
use crate::services::validation::{self, ValidationIssue};

/// How far ahead the derived calendar reaches, in days.
const CALENDAR_HORIZON_DAYS: i64 = 364;

#[derive(Debug)]
pub enum StoreError {
    NotFound(String),
    Validation(Vec<ValidationIssue>),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(tour_id) => write!(f, "unknown tour: {}", tour_id),
            Self::Validation(issues) => write!(f, "{} invalid rule field(s)", issues.len()),
        }
    }
}

/// Read-side view of recorded bookings; the Calendar Generator's occupancy
/// source in production.
struct BookingLedger<'a>(&'a [Booking]);

impl OccupancySource for BookingLedger<'_> {
    fn booked_seats(&self, tour_id: &str, date: NaiveDate) -> u32 {
        self.0
            .iter()
            .filter(|b| {
                b.tour_id == tour_id
                    && b.departure_date == date
                    && b.status != crate::models::bookings::BookingStatus::Cancelled
            })
            .map(|b| b.seats)
            .sum()
    }
}

struct StoreInner {
    tours: HashMap<String, PricingConfiguration>,
    bookings: Vec<Booking>,
    bulk_updates: Vec<BulkPricingUpdate>,
}

/// Owns every tour's rule set, booking ledger and derived calendar/history.
///
/// Updates replace a whole rule collection at a time and regenerate the
/// calendar before the write lock is released, so a reader can never observe
/// a calendar computed against a half-updated rule set. The calendar is built
/// into a fresh vector and swapped in whole.
pub struct PricingStore {
    inner: RwLock<StoreInner>,
    generator: CalendarGenerator,
}

impl Default for PricingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                tours: HashMap::new(),
                bookings: Vec::new(),
                bulk_updates: Vec::new(),
            }),
            generator: CalendarGenerator::new(),
        }
    }

    /// Register a tour's pricing configuration and build its first calendar.
    pub fn insert_tour(&self, config: PricingConfiguration) {
        let mut inner = self.write();
        let tour_id = config.tour_id.clone();
        inner.tours.insert(tour_id.clone(), config);
        self.regenerate(&mut inner, &tour_id);
    }

    pub fn get_pricing_configuration(
        &self,
        tour_id: &str,
    ) -> Result<PricingConfiguration, StoreError> {
        let inner = self.read();
        inner
            .tours
            .get(tour_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(tour_id.to_string()))
    }

    pub fn update_seasonal_pricing(
        &self,
        tour_id: &str,
        periods: Vec<SeasonalPeriod>,
    ) -> Result<PricingConfiguration, StoreError> {
        validation::validate_seasonal_periods(&periods).map_err(StoreError::Validation)?;
        self.mutate(tour_id, |config| config.seasonal_periods = periods)
    }

    pub fn update_dynamic_rules(
        &self,
        tour_id: &str,
        rules: Vec<DynamicPricingRule>,
    ) -> Result<PricingConfiguration, StoreError> {
        validation::validate_dynamic_rules(&rules).map_err(StoreError::Validation)?;
        self.mutate(tour_id, |config| config.dynamic_rules = rules)
    }

    pub fn update_group_discounts(
        &self,
        tour_id: &str,
        tiers: Vec<GroupDiscountTier>,
    ) -> Result<PricingConfiguration, StoreError> {
        validation::validate_group_tiers(&tiers).map_err(StoreError::Validation)?;
        self.mutate(tour_id, |config| config.group_discounts = tiers)
    }

    pub fn update_early_bird_last_minute(
        &self,
        tour_id: &str,
        rule: EarlyBirdLastMinuteRule,
    ) -> Result<PricingConfiguration, StoreError> {
        validation::validate_early_bird_last_minute(&rule).map_err(StoreError::Validation)?;
        self.mutate(tour_id, |config| config.early_bird_last_minute = Some(rule))
    }

    /// Insert or replace one blackout period, matched by id.
    pub fn update_blackout_period(
        &self,
        tour_id: &str,
        period: BlackoutPeriod,
    ) -> Result<PricingConfiguration, StoreError> {
        validation::validate_blackout_period(&period).map_err(StoreError::Validation)?;
        self.mutate(tour_id, |config| {
            match config.blackout_periods.iter_mut().find(|p| p.id == period.id) {
                Some(existing) => *existing = period,
                None => config.blackout_periods.push(period),
            }
        })
    }

    pub fn delete_blackout_period(
        &self,
        tour_id: &str,
        period_id: Uuid,
    ) -> Result<PricingConfiguration, StoreError> {
        self.mutate(tour_id, |config| {
            config.blackout_periods.retain(|p| p.id != period_id)
        })
    }

    pub fn update_capacity_settings(
        &self,
        tour_id: &str,
        settings: CapacitySetting,
    ) -> Result<PricingConfiguration, StoreError> {
        validation::validate_capacity_settings(&settings).map_err(StoreError::Validation)?;
        self.mutate(tour_id, |config| config.capacity_settings = Some(settings))
    }

    /// Quote one date. The computation is pure; the store's only side effect
    /// is appending the audit record to the tour's price history.
    ///
    /// `occupancy_percentage` overrides the ledger-derived figure when the
    /// caller (e.g. a booking flow holding fresher counts) supplies one.
    pub fn calculate_price(
        &self,
        tour_id: &str,
        date: NaiveDate,
        group_size: u32,
        occupancy_percentage: Option<f64>,
    ) -> Result<PriceQuote, StoreError> {
        let today = Utc::now().date_naive();
        let mut inner = self.write();
        let StoreInner {
            tours, bookings, ..
        } = &mut *inner;
        let config = tours
            .get_mut(tour_id)
            .ok_or_else(|| StoreError::NotFound(tour_id.to_string()))?;

        let occupancy = occupancy_percentage
            .unwrap_or_else(|| derived_occupancy(config, &BookingLedger(bookings), date));

        let quote = PricingService::calculate_price(config, date, today, group_size, occupancy);
        config.price_history.push(PriceHistoryEntry {
            id: Uuid::new_v4(),
            tour_id: tour_id.to_string(),
            date,
            original_price: quote.base_price,
            final_price: quote.final_price,
            price_changes: quote.breakdown.clone(),
            timestamp: Utc::now(),
            changed_by: Some("quote".to_string()),
            notes: None,
            group_size,
        });
        Ok(quote)
    }

    pub fn get_price_calendar(
        &self,
        tour_id: &str,
        filter: &CalendarFilter,
    ) -> Result<Vec<PriceCalendarEntry>, StoreError> {
        let inner = self.read();
        let config = inner
            .tours
            .get(tour_id)
            .ok_or_else(|| StoreError::NotFound(tour_id.to_string()))?;
        Ok(config
            .price_calendar
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }

    pub fn get_pricing_analytics(
        &self,
        tour_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PricingAnalytics, StoreError> {
        let inner = self.read();
        let config = inner
            .tours
            .get(tour_id)
            .ok_or_else(|| StoreError::NotFound(tour_id.to_string()))?;
        let bookings: Vec<Booking> = inner
            .bookings
            .iter()
            .filter(|b| b.tour_id == tour_id)
            .cloned()
            .collect();
        Ok(AnalyticsService::compute(
            tour_id,
            &config.price_history,
            &bookings,
            &config.price_calendar,
            start_date,
            end_date,
        ))
    }

    /// Most recent first.
    pub fn get_price_history(
        &self,
        tour_id: &str,
        limit: usize,
    ) -> Result<Vec<PriceHistoryEntry>, StoreError> {
        let inner = self.read();
        let config = inner
            .tours
            .get(tour_id)
            .ok_or_else(|| StoreError::NotFound(tour_id.to_string()))?;
        Ok(config
            .price_history
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    /// Record a sold booking and refresh the tour's calendar, since the
    /// occupancy it prices against just changed. Bookings that would oversell
    /// the departure are rejected.
    pub fn record_booking(&self, mut booking: Booking) -> Result<Booking, StoreError> {
        let mut inner = self.write();
        let StoreInner {
            tours, bookings, ..
        } = &mut *inner;
        let Some(config) = tours.get(&booking.tour_id) else {
            return Err(StoreError::NotFound(booking.tour_id));
        };

        if let Some(cap) = &config.capacity_settings {
            let already =
                BookingLedger(bookings).booked_seats(&booking.tour_id, booking.departure_date);
            let free = cap.sellable_capacity().saturating_sub(already);
            if booking.seats > free {
                return Err(StoreError::Validation(vec![ValidationIssue {
                    field: "seats".to_string(),
                    message: format!(
                        "only {} seat(s) left on {}",
                        free, booking.departure_date
                    ),
                }]));
            }
        }

        let now = Utc::now();
        booking.id.get_or_insert_with(Uuid::new_v4);
        booking.created_at.get_or_insert(now);
        booking.updated_at = Some(now);
        let tour_id = booking.tour_id.clone();
        bookings.push(booking.clone());
        self.regenerate(&mut inner, &tour_id);
        Ok(booking)
    }

    /// Apply or schedule a bulk price operation across tours and a date
    /// range. Draft updates due now (or with no schedule) are applied
    /// immediately; future-dated ones park as scheduled.
    pub fn apply_bulk_pricing_update(
        &self,
        mut update: BulkPricingUpdate,
    ) -> Result<BulkPricingUpdate, StoreError> {
        if update.start_date > update.end_date {
            return Err(StoreError::Validation(vec![ValidationIssue {
                field: "start_date".to_string(),
                message: "start_date is after end_date".to_string(),
            }]));
        }
        if update.tour_ids.is_empty() {
            return Err(StoreError::Validation(vec![ValidationIssue {
                field: "tour_ids".to_string(),
                message: "bulk update targets no tours".to_string(),
            }]));
        }

        let today = Utc::now().date_naive();
        let mut inner = self.write();
        for tour_id in &update.tour_ids {
            if !inner.tours.contains_key(tour_id) {
                return Err(StoreError::NotFound(tour_id.clone()));
            }
        }

        match update.status {
            BulkUpdateStatus::Cancelled | BulkUpdateStatus::Applied => {}
            BulkUpdateStatus::Draft | BulkUpdateStatus::Scheduled => {
                if update.scheduled_for.is_some_and(|d| d > today) {
                    update.status = BulkUpdateStatus::Scheduled;
                } else {
                    update.status = BulkUpdateStatus::Applied;
                    update.applied_at = Some(Utc::now());
                }
            }
        }

        inner.bulk_updates.push(update.clone());
        if update.status == BulkUpdateStatus::Applied {
            for tour_id in update.tour_ids.clone() {
                self.regenerate(&mut inner, &tour_id);
            }
        }
        Ok(update)
    }

    /// Rebuild one tour's calendar against the current rules and ledger.
    /// Dates whose price moved get an audit entry; the finished snapshot is
    /// swapped in whole.
    fn regenerate(&self, inner: &mut StoreInner, tour_id: &str) {
        let today = Utc::now().date_naive();
        let StoreInner {
            tours,
            bookings,
            bulk_updates,
        } = inner;
        let Some(config) = tours.get_mut(tour_id) else {
            return;
        };

        let ledger = BookingLedger(bookings);
        let fresh = self.generator.generate(
            config,
            &ledger,
            bulk_updates,
            today,
            today + Duration::days(CALENDAR_HORIZON_DAYS),
            today,
        );

        let old_prices: HashMap<NaiveDate, f64> = config
            .price_calendar
            .iter()
            .map(|e| (e.date, e.price))
            .collect();
        let now = Utc::now();
        for entry in &fresh {
            match old_prices.get(&entry.date) {
                Some(&old) if (old - entry.price).abs() < f64::EPSILON => {}
                None => {}
                Some(&old) => {
                    config.price_history.push(PriceHistoryEntry {
                        id: Uuid::new_v4(),
                        tour_id: tour_id.to_string(),
                        date: entry.date,
                        original_price: old,
                        final_price: entry.price,
                        price_changes: Vec::new(),
                        timestamp: now,
                        changed_by: Some("calendar-refresh".to_string()),
                        notes: None,
                        group_size: 0,
                    });
                }
            }
        }

        config.price_calendar = fresh;
        config.updated_at = now;
    }

    fn mutate(
        &self,
        tour_id: &str,
        apply: impl FnOnce(&mut PricingConfiguration),
    ) -> Result<PricingConfiguration, StoreError> {
        let mut inner = self.write();
        let config = inner
            .tours
            .get_mut(tour_id)
            .ok_or_else(|| StoreError::NotFound(tour_id.to_string()))?;
        apply(config);
        self.regenerate(&mut inner, tour_id);
        Ok(inner.tours[tour_id].clone())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, StoreInner> {
        match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, StoreInner> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Ledger-derived occupancy for a single date, against max capacity.
fn derived_occupancy(
    config: &PricingConfiguration,
    ledger: &BookingLedger<'_>,
    date: NaiveDate,
) -> f64 {
    match &config.capacity_settings {
        Some(cap) if cap.max_capacity > 0 => {
            let booked = ledger.booked_seats(&config.tour_id, date);
            (f64::from(booked) / f64::from(cap.max_capacity) * 100.0).min(100.0)
        }
        _ => 0.0,
    }
}
