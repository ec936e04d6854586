pub mod models;
pub mod routes;
pub mod services;
pub mod store;
