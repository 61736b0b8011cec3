//! Reporting API and embedded dashboard

pub mod embedded;
pub mod routes;
pub mod server;
pub mod types;

pub use server::ApiServer;
pub use types::ApiError;
