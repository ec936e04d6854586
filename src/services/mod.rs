pub mod analytics_service;
pub mod calendar_service;
pub mod payment;
pub mod payment_service;
pub mod pricing_service;
pub mod validation;
