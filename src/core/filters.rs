use crate::core::distance::distance_between;
use crate::core::error::SelectionError;
use crate::core::pipeline::PipelineState;
use crate::models::{Candidate, ServiceRequest, Vendor, VendorStatus};

/// Default service radius around the customer in kilometers
pub const SERVICE_RADIUS_KM: f64 = 25.0;

/// Check whether a vendor can serve the request at all
///
/// A vendor is eligible when it offers the requested category, is not
/// blocked, and has not reached its concurrent order limit.
#[inline]
pub fn is_eligible(vendor: &Vendor, request: &ServiceRequest) -> bool {
    if !vendor.offers(request.service_type) {
        return false;
    }

    if vendor.status == VendorStatus::Blocked {
        return false;
    }

    vendor.has_capacity()
}

/// Stage 1: eligibility filter
///
/// Keeps the input order of the vendor pool.
pub fn filter_eligible(state: &mut PipelineState) {
    if state.has_error() {
        return;
    }

    let request = &state.request;
    let eligible: Vec<Vendor> = state
        .vendors
        .iter()
        .filter(|vendor| is_eligible(vendor, request))
        .cloned()
        .collect();

    let step = format!(
        "Filtered {} vendors from {} based on service type ({}) and availability",
        eligible.len(),
        state.vendors.len(),
        request.service_type
    );

    tracing::info!("Filtered vendors: {} remaining", eligible.len());
    state.eligible = eligible;
    state.record(step);
}

/// Stage 2: geo reachability filter
///
/// Attaches the computed distance to a working copy of every vendor inside
/// `radius_km`. Vendors with non-finite coordinates never compare as in range.
/// Fails the run with `NoEligibleVendors` when none are left.
pub fn filter_in_range(state: &mut PipelineState, radius_km: f64) {
    if state.has_error() {
        return;
    }

    let customer = &state.request.customer_location;
    let in_range: Vec<Candidate> = state
        .eligible
        .iter()
        .filter_map(|vendor| {
            let distance_km = distance_between(customer, &vendor.location);
            (distance_km <= radius_km).then(|| Candidate {
                vendor: vendor.clone(),
                distance_km,
            })
        })
        .collect();

    let step = format!(
        "Location analysis: {} vendors within {}km service area",
        in_range.len(),
        radius_km
    );

    tracing::info!("Location filtered vendors: {}", in_range.len());
    let none_in_range = in_range.is_empty();
    state.in_range = in_range;
    state.record(step);

    if none_in_range {
        let category = state.request.service_type;
        state.fail(SelectionError::NoEligibleVendors { category });
    }
}
