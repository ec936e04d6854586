use chrono::{Datelike, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::configuration::{BasePricing, PricingConfiguration};
use crate::models::pricing_rules::{
    CapacitySetting, DaysRange, DaysToDepartureRule, DynamicPricingRule, EarlyBirdLastMinuteRule,
    GroupDiscountTier, OccupancyThreshold, SeasonalPeriod,
};
use crate::store::pricing_store::PricingStore;

/// Seed one fully-configured demo tour so a fresh instance has something for
/// the admin console to render. Controlled by SEED_DEMO_TOUR=1.
pub fn seed_demo_tour(store: &PricingStore) {
    let today = Utc::now().date_naive();
    let year = today.year();
    let mut config = PricingConfiguration::new(
        "demo-alpine-trek",
        BasePricing {
            base_price: 2500.0,
            currency: "USD".to_string(),
            deposit_percentage: 20.0,
        },
    );

    config.seasonal_periods = vec![
        season("Summer high season", ymd(year, 6, 1), ymd(year, 8, 31), 1.4),
        season("Shoulder season", ymd(year, 9, 1), ymd(year, 10, 31), 1.1),
        season("Winter low season", ymd(year, 11, 1), ymd(year, 12, 31), 0.8),
    ];

    config.dynamic_rules = vec![DynamicPricingRule {
        id: Uuid::new_v4(),
        name: "Demand pricing".to_string(),
        is_active: true,
        base_price: 2500.0,
        occupancy_thresholds: vec![
            bracket(0.0, 50.0, 1.0),
            bracket(50.0, 75.0, 1.1),
            bracket(75.0, 100.0, 1.3),
        ],
        days_to_departure_rules: vec![
            DaysToDepartureRule {
                days_range: DaysRange { min: 0, max: 7 },
                price_multiplier: 1.2,
            },
            DaysToDepartureRule {
                days_range: DaysRange { min: 8, max: 30 },
                price_multiplier: 1.05,
            },
        ],
        tour_ids: vec![],
    }];

    config.group_discounts = vec![
        tier("Small group", 4, Some(6), 5.0),
        tier("Medium group", 7, Some(12), 10.0),
        tier("Large group", 13, None, 15.0),
    ];

    config.early_bird_last_minute = Some(EarlyBirdLastMinuteRule {
        id: Uuid::new_v4(),
        early_bird_enabled: true,
        early_bird_days_before_departure: 60,
        early_bird_discount: 10.0,
        last_minute_enabled: true,
        last_minute_days_before_departure: 14,
        last_minute_discount: 15.0,
        tour_ids: vec![],
    });

    config.capacity_settings = Some(CapacitySetting {
        id: Uuid::new_v4(),
        tour_id: "demo-alpine-trek".to_string(),
        min_capacity: 4,
        max_capacity: 16,
        preferred_capacity: Some(12),
        auto_release_date: Some(today + Duration::days(200)),
        blocked_seats: Some(2),
        buffer_capacity: Some(2),
    });

    store.insert_tour(config);
    println!("Seeded demo tour 'demo-alpine-trek'");
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    // The demo dates are all valid calendar days.
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn season(name: &str, start: NaiveDate, end: NaiveDate, multiplier: f64) -> SeasonalPeriod {
    SeasonalPeriod {
        id: Uuid::new_v4(),
        name: name.to_string(),
        start_date: start,
        end_date: end,
        price_multiplier: multiplier,
        description: None,
        color: None,
    }
}

fn bracket(min: f64, max: f64, multiplier: f64) -> OccupancyThreshold {
    OccupancyThreshold {
        min_occupancy: min,
        max_occupancy: max,
        price_multiplier: multiplier,
    }
}

fn tier(name: &str, min: u32, max: Option<u32>, discount: f64) -> GroupDiscountTier {
    GroupDiscountTier {
        id: Uuid::new_v4(),
        name: name.to_string(),
        min_group_size: min,
        max_group_size: max,
        discount_percentage: discount,
        price_per_person: None,
        description: None,
    }
}
