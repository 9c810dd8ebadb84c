// Shared fixtures for core unit tests
use chrono::Utc;
use std::collections::HashMap;

use crate::models::{
    Candidate, Coordinate, Priority, ScoredVendor, ServiceCategory, ServiceRequest, Vendor,
    VendorStatus,
};

pub fn test_request(priority: Priority) -> ServiceRequest {
    ServiceRequest {
        request_id: "REQ-001".to_string(),
        user_id: "user-123".to_string(),
        customer_name: "Test Customer".to_string(),
        customer_location: Coordinate::new(40.7128, -74.0060),
        service_type: ServiceCategory::AcRepair,
        description: "AC unit not cooling".to_string(),
        priority,
        estimated_value: 250.0,
        preferred_time: None,
        special_requirements: vec![],
    }
}

pub fn test_vendor(id: &str) -> Vendor {
    Vendor {
        vendor_id: id.to_string(),
        name: format!("Vendor {}", id),
        email: format!("{}@example.com", id),
        phone: "+1-555-0100".to_string(),
        services: vec![ServiceCategory::AcRepair],
        location: Coordinate::new(40.72, -74.01),
        status: VendorStatus::Active,
        total_orders: 20,
        completed_orders: 18,
        cancelled_orders: 1,
        average_rating: 4.5,
        completion_rate: 0.9,
        response_time_minutes: 30.0,
        current_orders: 0,
        max_concurrent_orders: 3,
        is_online: true,
        last_seen: Utc::now(),
        working_hours: HashMap::new(),
    }
}

pub fn candidate(vendor: Vendor, distance_km: f64) -> Candidate {
    Candidate { vendor, distance_km }
}

pub fn scored(id: &str, score: f64) -> ScoredVendor {
    ScoredVendor {
        vendor: test_vendor(id),
        distance_km: 1.0,
        score,
    }
}
