//! Demo e-commerce data warehouse: synthetic data generation, warehouse
//! loading, validation, and a reporting API with an embedded dashboard.

pub mod api;
pub mod app;
pub mod core;
pub mod data;
pub mod domain;
