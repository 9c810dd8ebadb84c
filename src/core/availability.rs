use chrono::{DateTime, Duration, Utc};

use crate::core::pipeline::PipelineState;
use crate::models::{Priority, ServiceRequest, Vendor, VendorStatus};

/// How recently a vendor must have been seen to count as reachable
pub const DEFAULT_AVAILABILITY_WINDOW_HOURS: i64 = 24;

/// Check whether a vendor can take the request right now
///
/// Requires an active status, spare capacity, an online flag for urgent
/// requests, and a last-seen timestamp inside `window`.
pub fn is_available(
    vendor: &Vendor,
    request: &ServiceRequest,
    now: DateTime<Utc>,
    window: Duration,
) -> bool {
    if vendor.status != VendorStatus::Active {
        return false;
    }

    if !vendor.has_capacity() {
        return false;
    }

    if request.priority == Priority::Urgent && !vendor.is_online {
        return false;
    }

    now.signed_duration_since(vendor.last_seen) <= window
}

/// Stage 4: availability gate
///
/// Runs after scoring so the ranking stays inspectable on its own; keeps the
/// score order of its input.
pub fn gate_available(state: &mut PipelineState, now: DateTime<Utc>, window: Duration) {
    if state.has_error() {
        return;
    }

    let request = &state.request;
    let available: Vec<_> = state
        .scored
        .iter()
        .filter(|scored| is_available(&scored.vendor, request, now, window))
        .cloned()
        .collect();

    tracing::info!("Available vendors: {}", available.len());
    let step = format!(
        "Availability check: {} vendors currently available",
        available.len()
    );
    state.available = available;
    state.record(step);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SelectionError;
    use crate::core::testing::{scored, test_request, test_vendor};

    fn window() -> Duration {
        Duration::hours(DEFAULT_AVAILABILITY_WINDOW_HOURS)
    }

    #[test]
    fn test_active_vendor_available() {
        let vendor = test_vendor("v1");
        let request = test_request(Priority::Medium);
        assert!(is_available(&vendor, &request, Utc::now(), window()));
    }

    #[test]
    fn test_non_active_statuses_rejected() {
        let request = test_request(Priority::Medium);
        for status in [VendorStatus::Busy, VendorStatus::Offline, VendorStatus::Blocked] {
            let mut vendor = test_vendor("v1");
            vendor.status = status;
            assert!(!is_available(&vendor, &request, Utc::now(), window()));
        }
    }

    #[test]
    fn test_urgent_requires_online() {
        let mut vendor = test_vendor("v1");
        vendor.is_online = false;

        assert!(!is_available(&vendor, &test_request(Priority::Urgent), Utc::now(), window()));
        assert!(is_available(&vendor, &test_request(Priority::High), Utc::now(), window()));
    }

    #[test]
    fn test_stale_vendor_rejected() {
        let now = Utc::now();
        let request = test_request(Priority::Medium);
        let mut vendor = test_vendor("v1");

        vendor.last_seen = now - Duration::hours(24);
        assert!(is_available(&vendor, &request, now, window()));

        vendor.last_seen = now - Duration::hours(24) - Duration::seconds(1);
        assert!(!is_available(&vendor, &request, now, window()));
    }

    #[test]
    fn test_gate_preserves_score_order() {
        let now = Utc::now();
        let mut state = PipelineState::new(test_request(Priority::Medium), vec![]);

        let mut offline = scored("b", 90.0);
        offline.vendor.status = VendorStatus::Offline;
        state.scored = vec![scored("a", 95.0), offline, scored("c", 80.0), scored("d", 70.0)];

        gate_available(&mut state, now, window());

        let ids: Vec<&str> = state.available.iter().map(|s| s.vendor_id()).collect();
        assert_eq!(ids, vec!["a", "c", "d"]);
        assert_eq!(state.scored.len(), 4);
        assert_eq!(
            state.reasoning_steps.last().unwrap(),
            "Availability check: 3 vendors currently available"
        );
    }

    #[test]
    fn test_gate_passes_through_on_error() {
        let mut state = PipelineState::new(test_request(Priority::Medium), vec![]);
        state.scored = vec![scored("a", 95.0), scored("b", 80.0)];
        state.fail(SelectionError::InvalidScore { vendor_id: "a".to_string() });

        gate_available(&mut state, Utc::now(), window());

        assert!(state.available.is_empty());
        assert_eq!(state.scored.len(), 2);
        assert!(state.reasoning_steps.is_empty());
    }
}
