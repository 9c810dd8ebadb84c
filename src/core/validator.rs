use chrono::Utc;
use std::collections::HashSet;

use crate::core::error::SelectionError;
use crate::core::oracle::OracleProposal;
use crate::core::pipeline::PipelineState;
use crate::models::{ScoredVendor, SelectionMetadata, SelectionResult, Vendor};

/// Appended to the reasoning whenever the top-scored vendor is picked instead
/// of the oracle's proposal
pub const FALLBACK_MARKER: &str = " (Fallback to top-scored vendor)";

/// Default number of runner-up vendors listed after a fallback
pub const DEFAULT_MAX_FALLBACK_VENDORS: usize = 2;

/// Stage 6: validate the proposal and assemble the terminal result
///
/// Reads the state without appending to it, so running it again on the same
/// state yields the same result apart from the completion timestamp.
pub fn validate_selection(state: &mut PipelineState, max_fallback_vendors: usize) {
    let result = build_result(state, max_fallback_vendors);
    state.result = Some(result);
}

/// Decide the final selection for a finished pipeline run
pub fn build_result(state: &PipelineState, max_fallback_vendors: usize) -> SelectionResult {
    let (mut result, fallback_used) = match (&state.error, &state.proposal) {
        (Some(error), _) if !error.is_oracle_failure() => (failure(error), false),
        _ if state.available.is_empty() => {
            (SelectionResult::failed("Selection failed: No available vendors found"), false)
        }
        // The oracle could not be consulted; rank order decides
        (Some(error), _) => (
            fallback(&state.available, error.to_string(), max_fallback_vendors),
            true,
        ),
        (None, None) => (
            SelectionResult::failed("Selection failed: No selection result available"),
            false,
        ),
        (None, Some(proposal)) => accept(proposal, &state.available, max_fallback_vendors),
    };

    if fallback_used {
        tracing::warn!(
            "Falling back to top-scored vendor {} for request {}",
            result.primary_vendor,
            state.request.request_id
        );
    }

    let mut reasoning_steps = state.reasoning_steps.clone();
    if result.is_success() {
        reasoning_steps.push(format!(
            "Selection validated: {} vendors confirmed",
            result.selected_vendors.len()
        ));
    } else {
        reasoning_steps.push(result.selection_reasoning.clone());
    }

    result.selection_metadata = SelectionMetadata {
        reasoning_steps,
        total_vendors_considered: state.vendors.len(),
        eligible_vendors: state.eligible.len(),
        in_range_vendors: state.in_range.len(),
        scored_vendors: state.scored.len(),
        available_vendors: state.available.len(),
        fallback_used,
        oracle_error: state
            .error
            .as_ref()
            .filter(|e| e.is_oracle_failure())
            .map(|e| e.to_string()),
        selection_timestamp: Some(Utc::now()),
    };

    result
}

fn failure(error: &SelectionError) -> SelectionResult {
    tracing::error!("Vendor selection failed: {}", error);
    SelectionResult::failed(format!("Selection failed: {}", error))
}

/// Keep the proposed ids that are actually available, in proposal order
fn accept(
    proposal: &OracleProposal,
    available: &[ScoredVendor],
    max_fallback_vendors: usize,
) -> (SelectionResult, bool) {
    let available_ids: HashSet<&str> = available.iter().map(|s| s.vendor_id()).collect();

    let mut seen = HashSet::new();
    let selected: Vec<String> = proposal
        .selected_vendors
        .iter()
        .filter(|id| available_ids.contains(id.as_str()) && seen.insert(id.as_str()))
        .cloned()
        .collect();

    if selected.is_empty() {
        let reasoning = proposal.selection_reasoning.clone();
        return (fallback(available, reasoning, max_fallback_vendors), true);
    }

    let primary_vendor = if selected.contains(&proposal.primary_vendor) {
        proposal.primary_vendor.clone()
    } else {
        selected[0].clone()
    };

    let fallback_vendors: Vec<String> = proposal
        .fallback_vendors
        .iter()
        .filter(|id| available_ids.contains(id.as_str()) && seen.insert(id.as_str()))
        .cloned()
        .collect();

    let estimated_response_time = available
        .iter()
        .find(|s| s.vendor_id() == primary_vendor)
        .map(|s| estimate_response_time(&s.vendor))
        .unwrap_or(0);

    let result = SelectionResult {
        selected_vendors: selected,
        primary_vendor,
        fallback_vendors,
        selection_reasoning: proposal.selection_reasoning.clone(),
        confidence_score: proposal.confidence_score,
        estimated_response_time,
        selection_metadata: SelectionMetadata::default(),
    };

    (result, false)
}

/// Pick the highest ranked vendor; `available` must be non-empty and ranked
fn fallback(
    available: &[ScoredVendor],
    reasoning: String,
    max_fallback_vendors: usize,
) -> SelectionResult {
    let Some(top) = available.first() else {
        return SelectionResult::failed("Selection failed: No available vendors found");
    };

    SelectionResult {
        selected_vendors: vec![top.vendor_id().to_string()],
        primary_vendor: top.vendor_id().to_string(),
        fallback_vendors: available
            .iter()
            .skip(1)
            .take(max_fallback_vendors)
            .map(|s| s.vendor_id().to_string())
            .collect(),
        selection_reasoning: reasoning + FALLBACK_MARKER,
        confidence_score: (top.score / 100.0).clamp(0.0, 1.0),
        estimated_response_time: estimate_response_time(&top.vendor),
        selection_metadata: SelectionMetadata::default(),
    }
}

/// Expected minutes until the vendor responds, rounded
#[inline]
fn estimate_response_time(vendor: &Vendor) -> u32 {
    vendor.response_time_minutes.max(0.0).round() as u32
}
