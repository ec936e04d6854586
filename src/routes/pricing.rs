use actix_web::{web, HttpResponse, Responder};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::bookings::{Booking, BookingStatus, PaymentType};
use crate::models::bulk::BulkPricingUpdate;
use crate::models::calendar::CalendarFilter;
use crate::models::pricing_rules::{
    BlackoutPeriod, CapacitySetting, DynamicPricingRule, EarlyBirdLastMinuteRule,
    GroupDiscountTier, SeasonalPeriod,
};
use crate::services::payment_service::{PaymentConfig, PaymentService};
use crate::store::pricing_store::{PricingStore, StoreError};

fn store_error(err: StoreError) -> HttpResponse {
    match err {
        StoreError::NotFound(tour_id) => {
            HttpResponse::NotFound().body(format!("Tour not found: {}", tour_id))
        }
        StoreError::Validation(issues) => HttpResponse::BadRequest().json(serde_json::json!({
            "error": "invalid pricing rules",
            "issues": issues,
        })),
    }
}

pub async fn get_pricing_configuration(
    data: web::Data<PricingStore>,
    path: web::Path<String>,
) -> impl Responder {
    match data.get_pricing_configuration(&path.into_inner()) {
        Ok(config) => HttpResponse::Ok().json(config),
        Err(e) => store_error(e),
    }
}

pub async fn update_seasonal_pricing(
    data: web::Data<PricingStore>,
    path: web::Path<String>,
    input: web::Json<Vec<SeasonalPeriod>>,
) -> impl Responder {
    match data.update_seasonal_pricing(&path.into_inner(), input.into_inner()) {
        Ok(config) => HttpResponse::Ok().json(config),
        Err(e) => store_error(e),
    }
}

pub async fn update_dynamic_rules(
    data: web::Data<PricingStore>,
    path: web::Path<String>,
    input: web::Json<Vec<DynamicPricingRule>>,
) -> impl Responder {
    match data.update_dynamic_rules(&path.into_inner(), input.into_inner()) {
        Ok(config) => HttpResponse::Ok().json(config),
        Err(e) => store_error(e),
    }
}

pub async fn update_group_discounts(
    data: web::Data<PricingStore>,
    path: web::Path<String>,
    input: web::Json<Vec<GroupDiscountTier>>,
) -> impl Responder {
    match data.update_group_discounts(&path.into_inner(), input.into_inner()) {
        Ok(config) => HttpResponse::Ok().json(config),
        Err(e) => store_error(e),
    }
}

pub async fn update_early_bird_last_minute(
    data: web::Data<PricingStore>,
    path: web::Path<String>,
    input: web::Json<EarlyBirdLastMinuteRule>,
) -> impl Responder {
    match data.update_early_bird_last_minute(&path.into_inner(), input.into_inner()) {
        Ok(config) => HttpResponse::Ok().json(config),
        Err(e) => store_error(e),
    }
}

pub async fn update_blackout_period(
    data: web::Data<PricingStore>,
    path: web::Path<String>,
    input: web::Json<BlackoutPeriod>,
) -> impl Responder {
    match data.update_blackout_period(&path.into_inner(), input.into_inner()) {
        Ok(config) => HttpResponse::Ok().json(config),
        Err(e) => store_error(e),
    }
}

pub async fn delete_blackout_period(
    data: web::Data<PricingStore>,
    path: web::Path<(String, Uuid)>,
) -> impl Responder {
    let (tour_id, period_id) = path.into_inner();
    match data.delete_blackout_period(&tour_id, period_id) {
        Ok(config) => HttpResponse::Ok().json(config),
        Err(e) => store_error(e),
    }
}

pub async fn update_capacity_settings(
    data: web::Data<PricingStore>,
    path: web::Path<String>,
    input: web::Json<CapacitySetting>,
) -> impl Responder {
    match data.update_capacity_settings(&path.into_inner(), input.into_inner()) {
        Ok(config) => HttpResponse::Ok().json(config),
        Err(e) => store_error(e),
    }
}

#[derive(Deserialize)]
pub struct QuoteInput {
    pub date: NaiveDate,
    pub group_size: u32,
    /// Caller-supplied occupancy; derived from the booking ledger if absent.
    pub occupancy_percentage: Option<f64>,
}

pub async fn calculate_price(
    data: web::Data<PricingStore>,
    path: web::Path<String>,
    input: web::Json<QuoteInput>,
) -> impl Responder {
    let input = input.into_inner();
    if input.group_size == 0 {
        return HttpResponse::BadRequest().body("group_size must be at least 1");
    }
    match data.calculate_price(
        &path.into_inner(),
        input.date,
        input.group_size,
        input.occupancy_percentage,
    ) {
        Ok(quote) => HttpResponse::Ok().json(quote),
        Err(e) => store_error(e),
    }
}

pub async fn get_price_calendar(
    data: web::Data<PricingStore>,
    path: web::Path<String>,
    filter: web::Query<CalendarFilter>,
) -> impl Responder {
    match data.get_price_calendar(&path.into_inner(), &filter.into_inner()) {
        Ok(entries) => HttpResponse::Ok().json(entries),
        Err(e) => store_error(e),
    }
}

#[derive(Deserialize)]
pub struct AnalyticsQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

pub async fn get_pricing_analytics(
    data: web::Data<PricingStore>,
    path: web::Path<String>,
    query: web::Query<AnalyticsQuery>,
) -> impl Responder {
    match data.get_pricing_analytics(&path.into_inner(), query.start, query.end) {
        Ok(analytics) => HttpResponse::Ok().json(analytics),
        Err(e) => store_error(e),
    }
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

pub async fn get_price_history(
    data: web::Data<PricingStore>,
    path: web::Path<String>,
    query: web::Query<HistoryQuery>,
) -> impl Responder {
    match data.get_price_history(&path.into_inner(), query.limit.unwrap_or(50)) {
        Ok(history) => HttpResponse::Ok().json(history),
        Err(e) => store_error(e),
    }
}

pub async fn apply_bulk_pricing_update(
    data: web::Data<PricingStore>,
    input: web::Json<BulkPricingUpdate>,
) -> impl Responder {
    match data.apply_bulk_pricing_update(input.into_inner()) {
        Ok(update) => HttpResponse::Ok().json(update),
        Err(e) => store_error(e),
    }
}

#[derive(Deserialize)]
pub struct BookingInput {
    pub departure_date: NaiveDate,
    pub seats: u32,
    pub total_amount: f64,
    #[serde(default)]
    pub payment_type: Option<PaymentType>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Record a sold booking; the paid amount follows the payment split for the
/// chosen payment type (full payment when unspecified).
pub async fn record_booking(
    data: web::Data<PricingStore>,
    payment_config: web::Data<PaymentConfig>,
    path: web::Path<String>,
    input: web::Json<BookingInput>,
) -> impl Responder {
    let input = input.into_inner();
    if input.seats == 0 {
        return HttpResponse::BadRequest().body("seats must be at least 1");
    }

    let payment_type = input.payment_type.unwrap_or(PaymentType::Full);
    let split = PaymentService::calculate_payment_amounts(
        input.total_amount,
        payment_type,
        &payment_config,
    );

    let booking = Booking {
        id: None,
        tour_id: path.into_inner(),
        departure_date: input.departure_date,
        seats: input.seats,
        total_amount: input.total_amount,
        paid_amount: split.payable_amount,
        currency: input.currency.unwrap_or_else(|| "USD".to_string()),
        status: BookingStatus::Confirmed,
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
    };

    match data.record_booking(booking) {
        Ok(stored) => HttpResponse::Ok().json(serde_json::json!({
            "booking": stored,
            "payment": split,
        })),
        Err(e) => store_error(e),
    }
}
