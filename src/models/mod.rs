// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Candidate, Coordinate, Priority, ScoredVendor, ScoringWeights, SelectionMetadata,
    SelectionResult, ServiceCategory, ServiceRequest, Vendor, VendorStatus, WorkingHours,
};
pub use requests::SelectVendorsRequest;
pub use responses::{ErrorResponse, HealthResponse, SelectVendorsResponse};
