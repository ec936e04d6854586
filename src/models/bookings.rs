use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentType {
    Full,
    Advance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
}

/// A confirmed seat reservation, the unit the occupancy ledger counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub tour_id: String,
    pub departure_date: NaiveDate,
    pub seats: u32,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub currency: String,
    pub status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Pure derivation of how a booking total splits into pay-now vs balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentCalculation {
    pub payable_amount: f64,
    pub remaining_balance: f64,
    pub advance_amount: f64,
    pub booking_status: BookingStatus,
    pub payment_status: PaymentStatus,
}
