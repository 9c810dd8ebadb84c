use std::time::Duration;

use crate::models::ServiceCategory;
use thiserror::Error;

/// Errors raised by the external ranking oracle
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OracleError {
    /// Network connectivity error (DNS, connection refused, etc.)
    #[error("Network error: {0}")]
    Network(String),

    /// The oracle did not answer within the configured deadline
    #[error("Oracle timed out after {0}ms")]
    Timeout(u64),

    /// The oracle answered with a non-success status
    #[error("Oracle returned error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The response body could not be decoded into a proposal
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The proposal decoded but violates the response contract
    #[error("Malformed proposal: {0}")]
    Malformed(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl OracleError {
    /// Timeout error for a deadline, saturating at `u64::MAX` milliseconds
    pub fn timeout(after: Duration) -> Self {
        OracleError::Timeout(u64::try_from(after.as_millis()).unwrap_or(u64::MAX))
    }
}

/// Conditions that end a selection run early
///
/// Recorded on the pipeline state; once set, later stages pass through.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    #[error("No eligible vendors for {category} within the service area")]
    NoEligibleVendors { category: ServiceCategory },

    #[error("No available vendors found")]
    NoAvailableVendors,

    #[error("Error in oracle selection: {0}")]
    Oracle(#[from] OracleError),

    #[error("Vendor {vendor_id} produced a non-finite score")]
    InvalidScore { vendor_id: String },
}

impl SelectionError {
    /// Oracle failures are recoverable by the validator's top-score fallback
    pub fn is_oracle_failure(&self) -> bool {
        matches!(self, SelectionError::Oracle(_))
    }
}
