pub mod payment;
pub mod pricing;
