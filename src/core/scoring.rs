use std::cmp::Ordering;

use crate::core::error::SelectionError;
use crate::core::pipeline::PipelineState;
use crate::models::{Candidate, Priority, ScoredVendor, ScoringWeights, ServiceRequest, Vendor};

/// Upper bound of every performance score
pub const MAX_SCORE: f64 = 100.0;

/// Calculate a performance score (0-100) for a vendor
///
/// Scoring formula:
/// score = (
///     completed / total * 40 +                 # Completion history
///     rating / 5 * 25 +                        # Average rating
///     max(0, (120 - response) / 120) * 15 +    # Faster response = higher
///     online * 10 +                            # Online right now
///     (1 - current / max_concurrent) * 10 +    # Workload headroom
///     priority adjustment                      # Urgent / new-vendor boost
/// )
///
/// The priority bonuses are added before the cap, so an already high scoring
/// vendor may gain nothing from them. A non-finite sum is returned as is.
pub fn calculate_performance_score(
    vendor: &Vendor,
    request: &ServiceRequest,
    weights: &ScoringWeights,
) -> f64 {
    let completion_score = calculate_completion_score(vendor.completed_orders, vendor.total_orders);
    let rating_score = vendor.average_rating / 5.0;
    let response_score =
        calculate_response_score(vendor.response_time_minutes, weights.response_baseline_minutes);
    let online_score = if vendor.is_online { 1.0 } else { 0.0 };
    let workload_score =
        calculate_workload_score(vendor.current_orders, vendor.max_concurrent_orders);

    let total_score = completion_score * weights.completion
        + rating_score * weights.rating
        + response_score * weights.response
        + online_score * weights.online
        + workload_score * weights.workload
        + priority_adjustment(vendor, request.priority, weights);

    // f64::min would turn NaN into MAX_SCORE
    if !total_score.is_finite() {
        return total_score;
    }

    total_score.min(MAX_SCORE).max(0.0)
}

/// Completion ratio (0-1), zero for vendors without history
#[inline]
fn calculate_completion_score(completed: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64
}

/// Response speed (0-1), linear down to zero at the baseline
#[inline]
fn calculate_response_score(response_minutes: f64, baseline_minutes: f64) -> f64 {
    if baseline_minutes <= 0.0 {
        return 0.0;
    }
    ((baseline_minutes - response_minutes) / baseline_minutes).max(0.0)
}

/// Remaining capacity (0-1)
#[inline]
fn calculate_workload_score(current_orders: u32, max_concurrent_orders: u32) -> f64 {
    if max_concurrent_orders == 0 {
        return 0.0;
    }
    1.0 - current_orders as f64 / max_concurrent_orders as f64
}

#[inline]
fn priority_adjustment(vendor: &Vendor, priority: Priority, weights: &ScoringWeights) -> f64 {
    match priority {
        Priority::Urgent if vendor.is_online && vendor.current_orders == 0 => weights.urgent_bonus,
        Priority::Low if vendor.total_orders < weights.new_vendor_order_threshold => {
            weights.new_vendor_bonus
        }
        Priority::Low | Priority::Medium | Priority::High | Priority::Urgent => 0.0,
    }
}

/// Ranking order: score descending, then fewer open orders, then vendor id
pub fn compare_scored(a: &ScoredVendor, b: &ScoredVendor) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.vendor.current_orders.cmp(&b.vendor.current_orders))
        .then_with(|| a.vendor.vendor_id.cmp(&b.vendor.vendor_id))
}

/// Score every candidate and return them in ranking order
///
/// Each score depends only on its own candidate; the final sort makes the
/// output independent of evaluation order.
pub fn rank_candidates(
    candidates: &[Candidate],
    request: &ServiceRequest,
    weights: &ScoringWeights,
) -> Vec<ScoredVendor> {
    let mut scored: Vec<ScoredVendor> = candidates
        .iter()
        .map(|candidate| ScoredVendor {
            score: calculate_performance_score(&candidate.vendor, request, weights),
            vendor: candidate.vendor.clone(),
            distance_km: candidate.distance_km,
        })
        .collect();

    scored.sort_by(compare_scored);
    scored
}

/// Stage 3: performance scoring
pub fn score_vendors(state: &mut PipelineState, weights: &ScoringWeights) {
    if state.has_error() {
        return;
    }

    let scored = rank_candidates(&state.in_range, &state.request, weights);

    if let Some(invalid) = scored.iter().find(|s| !s.score.is_finite()) {
        let vendor_id = invalid.vendor_id().to_string();
        state.fail(SelectionError::InvalidScore { vendor_id });
        return;
    }

    tracing::info!("Performance scored vendors: {}", scored.len());
    let step = format!("Performance scoring completed for {} vendors", scored.len());
    state.scored = scored;
    state.record(step);
}
