pub mod pricing_store;
pub mod seed;
