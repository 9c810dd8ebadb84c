use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{ServiceRequest, Vendor};

/// Request to select vendors for a service request
///
/// POST /api/v1/selections
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SelectVendorsRequest {
    #[validate(nested)]
    #[serde(alias = "serviceRequest")]
    pub service_request: ServiceRequest,
    #[validate(nested)]
    #[serde(default, alias = "availableVendors")]
    pub available_vendors: Vec<Vendor>,
}
