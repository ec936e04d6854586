pub mod analytics;
pub mod bookings;
pub mod bulk;
pub mod calendar;
pub mod configuration;
pub mod pricing_rules;
