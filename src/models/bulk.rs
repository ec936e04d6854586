use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkOperation {
    Set,
    Increase,
    Decrease,
    Multiply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkUpdateStatus {
    Draft,
    Scheduled,
    Applied,
    Cancelled,
}

/// One set/increase/decrease/multiply operation across tours and a date
/// range. Lifecycle: draft -> scheduled -> applied | cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkPricingUpdate {
    pub id: Uuid,
    pub name: String,
    pub tour_ids: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub operation: BulkOperation,
    /// Set/increase/decrease interpret this as a currency amount (increase
    /// and decrease as a percentage when `value_is_percentage`), multiply as
    /// a plain factor.
    pub value: f64,
    pub value_is_percentage: bool,
    pub status: BulkUpdateStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
}

impl BulkPricingUpdate {
    /// Resulting per-date price after this update hits `price`. Never goes
    /// below zero: an oversized decrease (or negative set) floors at 0.
    pub fn apply_to(&self, price: f64) -> f64 {
        let adjusted = match self.operation {
            BulkOperation::Set => self.value,
            BulkOperation::Increase => {
                if self.value_is_percentage {
                    price * (1.0 + self.value / 100.0)
                } else {
                    price + self.value
                }
            }
            BulkOperation::Decrease => {
                if self.value_is_percentage {
                    price * (1.0 - self.value / 100.0)
                } else {
                    price - self.value
                }
            }
            BulkOperation::Multiply => price * self.value,
        };
        adjusted.max(0.0)
    }

    pub fn covers(&self, tour_id: &str, date: NaiveDate) -> bool {
        self.tour_ids.iter().any(|t| t == tour_id)
            && date >= self.start_date
            && date <= self.end_date
    }
}
