use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Available,
    Limited,
    Full,
    Blackout,
}

impl std::fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Limited => write!(f, "limited"),
            Self::Full => write!(f, "full"),
            Self::Blackout => write!(f, "blackout"),
        }
    }
}

/// One derived per-date row of the price calendar. Never hand-edited;
/// regenerated whenever rules or bookings change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceCalendarEntry {
    pub id: Uuid,
    pub tour_id: String,
    pub date: NaiveDate,
    pub price: f64,
    pub deposit_price: f64,
    pub available_spots: u32,
    pub status: AvailabilityStatus,
    pub occupancy_percentage: f64,
    pub applied_rules: Vec<String>,
}

/// Optional filter for bulk calendar reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub status: Option<AvailabilityStatus>,
}

impl CalendarFilter {
    pub fn matches(&self, entry: &PriceCalendarEntry) -> bool {
        if let Some(start) = self.start {
            if entry.date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if entry.date > end {
                return false;
            }
        }
        if let Some(status) = self.status {
            if entry.status != status {
                return false;
            }
        }
        true
    }
}
