use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which pricing step produced an adjustment. Analytics buckets discounts by
/// mapping these kinds, so the calculator and the aggregator can never drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdjustmentKind {
    Seasonal,
    Occupancy,
    DaysToDeparture,
    EarlyBird,
    LastMinute,
    Group,
}

/// One signed price delta in a quote breakdown: the amount the running price
/// moved when the named rule fired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceAdjustment {
    pub rule: String,
    pub kind: AdjustmentKind,
    pub amount: f64,
}

/// Immutable audit record appended whenever a price is computed or committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    pub id: Uuid,
    pub tour_id: String,
    pub date: NaiveDate,
    pub original_price: f64,
    pub final_price: f64,
    pub price_changes: Vec<PriceAdjustment>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Seats quoted for, so revenue can be derived from history alone.
    pub group_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandTrend {
    Increasing,
    Stable,
    Decreasing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscountType {
    Seasonal,
    Group,
    EarlyBird,
    LastMinute,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountSummary {
    pub discount_type: DiscountType,
    pub count: u64,
    pub total_amount: f64,
    pub average_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Year-month key, e.g. "2026-07".
    pub month: String,
    pub booking_count: u64,
    pub average_price: f64,
    pub total_revenue: f64,
    pub average_occupancy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingAnalytics {
    pub tour_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub average_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub price_range: f64,
    pub occupancy_rate: f64,
    pub booking_count: u64,
    pub total_revenue: f64,
    /// Pearson correlation of monthly average price vs booking volume.
    /// Best effort; absent when fewer than two months of data exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_elasticity: Option<f64>,
    pub demand_trend: DemandTrend,
    pub by_month: Vec<MonthlySummary>,
    pub discounts_applied: Vec<DiscountSummary>,
}
