use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::analytics::{
    AdjustmentKind, DemandTrend, DiscountSummary, DiscountType, MonthlySummary, PriceHistoryEntry,
    PricingAnalytics,
};
use crate::models::bookings::{Booking, BookingStatus};
use crate::models::calendar::PriceCalendarEntry;

/// Relative change in booking velocity below which demand counts as stable.
const TREND_TOLERANCE: f64 = 0.1;

#[derive(Default)]
struct MonthBucket {
    booking_count: u64,
    revenue: f64,
    price_sum: f64,
    price_count: u64,
    occupancy_sum: f64,
    occupancy_count: u64,
}

pub struct AnalyticsService;

impl AnalyticsService {
    /// Summarize price history, bookings and calendar occupancy for a period.
    ///
    /// Discount totals come straight from the breakdown entries the price
    /// calculator recorded into history; they are never recomputed from the
    /// rule set, so calendar, history and analytics cannot disagree.
    pub fn compute(
        tour_id: &str,
        history: &[PriceHistoryEntry],
        bookings: &[Booking],
        calendar: &[PriceCalendarEntry],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> PricingAnalytics {
        let in_range = |d: NaiveDate| d >= start_date && d <= end_date;

        let history: Vec<&PriceHistoryEntry> =
            history.iter().filter(|h| in_range(h.date)).collect();
        let bookings: Vec<&Booking> = bookings
            .iter()
            .filter(|b| b.status != BookingStatus::Cancelled && in_range(b.departure_date))
            .collect();
        let calendar: Vec<&PriceCalendarEntry> =
            calendar.iter().filter(|e| in_range(e.date)).collect();

        let prices: Vec<f64> = history.iter().map(|h| h.final_price).collect();
        let average_price = if prices.is_empty() {
            0.0
        } else {
            prices.iter().sum::<f64>() / prices.len() as f64
        };
        let min_price = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max_price = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let (min_price, max_price) = if prices.is_empty() {
            (0.0, 0.0)
        } else {
            (min_price, max_price)
        };

        let occupancy_rate = if calendar.is_empty() {
            0.0
        } else {
            calendar.iter().map(|e| e.occupancy_percentage).sum::<f64>() / calendar.len() as f64
        };

        let total_revenue: f64 = bookings.iter().map(|b| b.total_amount).sum();

        let mut months: BTreeMap<String, MonthBucket> = BTreeMap::new();
        for h in &history {
            let bucket = months.entry(month_key(h.date)).or_default();
            bucket.price_sum += h.final_price;
            bucket.price_count += 1;
        }
        for b in &bookings {
            let bucket = months.entry(month_key(b.departure_date)).or_default();
            bucket.booking_count += 1;
            bucket.revenue += b.total_amount;
        }
        for e in &calendar {
            let bucket = months.entry(month_key(e.date)).or_default();
            bucket.occupancy_sum += e.occupancy_percentage;
            bucket.occupancy_count += 1;
        }

        let by_month: Vec<MonthlySummary> = months
            .iter()
            .map(|(month, b)| MonthlySummary {
                month: month.clone(),
                booking_count: b.booking_count,
                average_price: if b.price_count > 0 {
                    b.price_sum / b.price_count as f64
                } else {
                    0.0
                },
                total_revenue: b.revenue,
                average_occupancy: if b.occupancy_count > 0 {
                    b.occupancy_sum / b.occupancy_count as f64
                } else {
                    0.0
                },
            })
            .collect();

        let monthly_bookings: Vec<f64> =
            by_month.iter().map(|m| m.booking_count as f64).collect();

        // Elasticity correlates price against demand, so only months holding
        // both observations qualify; a month without quotes would otherwise
        // inject a fake 0.0 price point.
        let (paired_prices, paired_bookings): (Vec<f64>, Vec<f64>) = months
            .values()
            .filter(|b| b.price_count > 0 && b.booking_count > 0)
            .map(|b| (b.price_sum / b.price_count as f64, b.booking_count as f64))
            .unzip();

        PricingAnalytics {
            tour_id: tour_id.to_string(),
            start_date,
            end_date,
            average_price,
            min_price,
            max_price,
            price_range: max_price - min_price,
            occupancy_rate,
            booking_count: bookings.len() as u64,
            total_revenue,
            price_elasticity: pearson(&paired_prices, &paired_bookings),
            demand_trend: demand_trend(&monthly_bookings),
            by_month,
            discounts_applied: Self::aggregate_discounts(&history),
        }
    }

    /// Bucket every negative breakdown amount in the history set by discount
    /// type. Totals are positive magnitudes.
    fn aggregate_discounts(history: &[&PriceHistoryEntry]) -> Vec<DiscountSummary> {
        let mut buckets: BTreeMap<DiscountType, (u64, f64)> = BTreeMap::new();
        for entry in history {
            for adj in entry.price_changes.iter().filter(|a| a.amount < 0.0) {
                let discount_type = match adj.kind {
                    AdjustmentKind::Seasonal => DiscountType::Seasonal,
                    AdjustmentKind::Group => DiscountType::Group,
                    AdjustmentKind::EarlyBird => DiscountType::EarlyBird,
                    AdjustmentKind::LastMinute => DiscountType::LastMinute,
                    AdjustmentKind::Occupancy | AdjustmentKind::DaysToDeparture => {
                        DiscountType::Custom
                    }
                };
                let bucket = buckets.entry(discount_type).or_insert((0, 0.0));
                bucket.0 += 1;
                bucket.1 += -adj.amount;
            }
        }

        buckets
            .into_iter()
            .map(|(discount_type, (count, total_amount))| DiscountSummary {
                discount_type,
                count,
                total_amount,
                average_amount: total_amount / count as f64,
            })
            .collect()
    }
}

fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Month-over-month booking velocity: compare the back half of the period
/// against the front half and classify the slope sign.
fn demand_trend(monthly_bookings: &[f64]) -> DemandTrend {
    if monthly_bookings.len() < 2 {
        return DemandTrend::Stable;
    }
    let mid = monthly_bookings.len() / 2;
    let first: f64 = monthly_bookings[..mid].iter().sum::<f64>() / mid as f64;
    let second: f64 =
        monthly_bookings[mid..].iter().sum::<f64>() / (monthly_bookings.len() - mid) as f64;

    if first == 0.0 {
        return if second > 0.0 {
            DemandTrend::Increasing
        } else {
            DemandTrend::Stable
        };
    }
    let change = (second - first) / first;
    if change > TREND_TOLERANCE {
        DemandTrend::Increasing
    } else if change < -TREND_TOLERANCE {
        DemandTrend::Decreasing
    } else {
        DemandTrend::Stable
    }
}

/// Pearson correlation; `None` when fewer than two points or zero variance.
fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}
