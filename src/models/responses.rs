use serde::{Deserialize, Serialize};
use crate::models::domain::SelectionResult;

/// Response for the selection endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectVendorsResponse {
    pub selection_id: String,
    #[serde(flatten)]
    pub result: SelectionResult,
    pub algorithm_version: String,
    pub processing_time: chrono::DateTime<chrono::Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub oracle: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
