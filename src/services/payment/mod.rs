pub mod interface;
pub mod sandbox;
