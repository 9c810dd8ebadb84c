use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use validator::Validate;

/// Geographic point in decimal degrees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Coordinate {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[serde(default)]
    pub address: String,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            address: String::new(),
        }
    }
}

/// Service categories a vendor can offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceCategory {
    #[serde(rename = "AC Repair")]
    AcRepair,
    Plumbing,
    Electrical,
    Cleaning,
    Painting,
    Carpentry,
    Landscaping,
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceCategory::AcRepair => "AC Repair",
            ServiceCategory::Plumbing => "Plumbing",
            ServiceCategory::Electrical => "Electrical",
            ServiceCategory::Cleaning => "Cleaning",
            ServiceCategory::Painting => "Painting",
            ServiceCategory::Carpentry => "Carpentry",
            ServiceCategory::Landscaping => "Landscaping",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorStatus {
    #[default]
    Active,
    Busy,
    Offline,
    Blocked,
}

/// A customer's request for a service visit
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServiceRequest {
    #[validate(length(min = 1))]
    pub request_id: String,
    #[validate(length(min = 1))]
    pub user_id: String,
    pub customer_name: String,
    #[validate(nested)]
    pub customer_location: Coordinate,
    pub service_type: ServiceCategory,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    #[validate(range(min = 0.0))]
    pub estimated_value: f64,
    #[serde(default)]
    pub preferred_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub special_requirements: Vec<String>,
}

/// Opening window for a single weekday, e.g. `"09:00"`..`"17:00"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start: String,
    pub end: String,
}

/// Vendor record as supplied by the caller for one selection run
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Vendor {
    #[validate(length(min = 1))]
    pub vendor_id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub services: Vec<ServiceCategory>,
    #[validate(nested)]
    pub location: Coordinate,
    #[serde(default)]
    pub status: VendorStatus,

    #[serde(default)]
    pub total_orders: u32,
    #[serde(default)]
    pub completed_orders: u32,
    #[serde(default)]
    pub cancelled_orders: u32,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0))]
    pub average_rating: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0))]
    pub completion_rate: f64,
    #[serde(default = "default_response_time")]
    #[validate(range(min = 0.0))]
    pub response_time_minutes: f64,

    #[serde(default)]
    pub current_orders: u32,
    #[serde(default = "default_max_concurrent_orders")]
    pub max_concurrent_orders: u32,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default = "Utc::now")]
    pub last_seen: DateTime<Utc>,
    #[serde(default)]
    pub working_hours: HashMap<String, WorkingHours>,
}

fn default_response_time() -> f64 { 60.0 }
fn default_max_concurrent_orders() -> u32 { 3 }

impl Vendor {
    /// Whether the vendor offers the given category
    pub fn offers(&self, category: ServiceCategory) -> bool {
        self.services.contains(&category)
    }

    /// Whether the vendor can take another order right now
    pub fn has_capacity(&self) -> bool {
        self.current_orders < self.max_concurrent_orders
    }
}

/// Working copy of a vendor inside the service radius
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub vendor: Vendor,
    pub distance_km: f64,
}

/// Candidate with its performance score in [0, 100]
#[derive(Debug, Clone, Serialize)]
pub struct ScoredVendor {
    pub vendor: Vendor,
    pub distance_km: f64,
    pub score: f64,
}

impl ScoredVendor {
    pub fn vendor_id(&self) -> &str {
        &self.vendor.vendor_id
    }
}

/// Audit trail attached to every selection result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionMetadata {
    pub reasoning_steps: Vec<String>,
    pub total_vendors_considered: usize,
    pub eligible_vendors: usize,
    pub in_range_vendors: usize,
    pub scored_vendors: usize,
    pub available_vendors: usize,
    pub fallback_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle_error: Option<String>,
    pub selection_timestamp: Option<DateTime<Utc>>,
}

/// Final outcome of a selection run
///
/// An empty `selected_vendors` list together with a zero confidence marks a
/// failed selection; `selection_reasoning` then carries the cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub selected_vendors: Vec<String>,
    pub primary_vendor: String,
    pub fallback_vendors: Vec<String>,
    pub selection_reasoning: String,
    pub confidence_score: f64,
    pub estimated_response_time: u32,
    #[serde(default)]
    pub selection_metadata: SelectionMetadata,
}

impl SelectionResult {
    /// The uniform failure shape
    pub fn failed(reasoning: impl Into<String>) -> Self {
        Self {
            selected_vendors: Vec::new(),
            primary_vendor: String::new(),
            fallback_vendors: Vec::new(),
            selection_reasoning: reasoning.into(),
            confidence_score: 0.0,
            estimated_response_time: 0,
            selection_metadata: SelectionMetadata::default(),
        }
    }

    pub fn is_success(&self) -> bool {
        !self.selected_vendors.is_empty()
    }
}

/// Weights and bonuses of the performance score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub completion: f64,
    pub rating: f64,
    pub response: f64,
    pub online: f64,
    pub workload: f64,
    pub urgent_bonus: f64,
    pub new_vendor_bonus: f64,
    pub response_baseline_minutes: f64,
    pub new_vendor_order_threshold: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            completion: 40.0,
            rating: 25.0,
            response: 15.0,
            online: 10.0,
            workload: 10.0,
            urgent_bonus: 20.0,
            new_vendor_bonus: 15.0,
            response_baseline_minutes: 120.0,
            new_vendor_order_threshold: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_wire_names() {
        let json = serde_json::to_string(&ServiceCategory::AcRepair).unwrap();
        assert_eq!(json, "\"AC Repair\"");

        let parsed: ServiceCategory = serde_json::from_str("\"Plumbing\"").unwrap();
        assert_eq!(parsed, ServiceCategory::Plumbing);
        assert!(serde_json::from_str::<ServiceCategory>("\"Roofing\"").is_err());
    }

    #[test]
    fn test_vendor_defaults() {
        let vendor: Vendor = serde_json::from_value(serde_json::json!({
            "vendor_id": "v-1",
            "name": "Cool Air",
            "services": ["AC Repair"],
            "location": { "latitude": 40.7, "longitude": -74.0 }
        }))
        .unwrap();

        assert_eq!(vendor.status, VendorStatus::Active);
        assert_eq!(vendor.max_concurrent_orders, 3);
        assert_eq!(vendor.response_time_minutes, 60.0);
        assert!(!vendor.is_online);
        assert!(vendor.has_capacity());
        assert!(vendor.offers(ServiceCategory::AcRepair));
    }

    #[test]
    fn test_failed_result_shape() {
        let result = SelectionResult::failed("nothing to pick");
        assert!(!result.is_success());
        assert_eq!(result.confidence_score, 0.0);
        assert_eq!(result.estimated_response_time, 0);
        assert!(result.primary_vendor.is_empty());
    }
}
