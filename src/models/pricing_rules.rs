use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A date range carrying a price multiplier for high/low season.
/// Periods may overlap; the calculator applies the first match in list order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalPeriod {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price_multiplier: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupancyThreshold {
    pub min_occupancy: f64,
    pub max_occupancy: f64,
    pub price_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaysRange {
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaysToDepartureRule {
    pub days_range: DaysRange,
    pub price_multiplier: f64,
}

/// Demand pricing: occupancy brackets and days-to-departure brackets.
/// Brackets are not guaranteed exhaustive; an unmatched input means no
/// adjustment, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicPricingRule {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub base_price: f64,
    pub occupancy_thresholds: Vec<OccupancyThreshold>,
    pub days_to_departure_rules: Vec<DaysToDepartureRule>,
    pub tour_ids: Vec<String>,
}

/// Group-size discount tier. `max_group_size` absent means unbounded.
/// `price_per_person` set overrides the percentage outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDiscountTier {
    pub id: Uuid,
    pub name: String,
    pub min_group_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_group_size: Option<u32>,
    pub discount_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_person: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarlyBirdLastMinuteRule {
    pub id: Uuid,
    pub early_bird_enabled: bool,
    pub early_bird_days_before_departure: i64,
    pub early_bird_discount: f64,
    pub last_minute_enabled: bool,
    pub last_minute_days_before_departure: i64,
    pub last_minute_discount: f64,
    pub tour_ids: Vec<String>,
}

/// A date range where booking is blocked, either globally or per listed tour.
/// `allow_manual_override` is a UI escape hatch; the engine never computes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlackoutPeriod {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub blocks_all_tours: bool,
    pub tour_ids: Vec<String>,
    pub allow_manual_override: bool,
}

impl BlackoutPeriod {
    /// Whether this period blocks the given tour on the given date.
    pub fn blocks(&self, tour_id: &str, date: NaiveDate) -> bool {
        if date < self.start_date || date > self.end_date {
            return false;
        }
        self.blocks_all_tours || self.tour_ids.iter().any(|t| t == tour_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacitySetting {
    pub id: Uuid,
    pub tour_id: String,
    pub min_capacity: u32,
    pub max_capacity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_release_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_seats: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer_capacity: Option<u32>,
}

impl CapacitySetting {
    /// Seats that can actually be sold once blocked seats are held back.
    pub fn sellable_capacity(&self) -> u32 {
        self.max_capacity
            .saturating_sub(self.blocked_seats.unwrap_or(0))
    }
}
