//! Vendor Select - deterministic vendor selection for service requests
//!
//! This library matches a service request to a ranked set of vendors. It runs
//! a six stage pipeline: eligibility and geo filters, performance scoring, an
//! availability gate, an external ranking oracle and a validator that falls
//! back to the top-scored vendor when the oracle's proposal can't be used.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    distance::haversine_distance, OracleError, SelectionError, SelectionOracle, SelectionPipeline,
};
pub use crate::models::{ScoredVendor, SelectionResult, ServiceRequest, Vendor};
