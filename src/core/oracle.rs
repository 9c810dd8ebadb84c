//! Selection oracle boundary.
//!
//! The oracle is an external ranker (an LLM in production) that turns the
//! shortlist into a proposed selection. Its answer is advisory: the validator
//! checks it against the available set before anything is returned.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::error::{OracleError, SelectionError};
use crate::core::pipeline::PipelineState;
use crate::models::{Priority, ScoredVendor, ServiceCategory};

/// Default number of candidates shown to the oracle
pub const DEFAULT_MAX_CANDIDATES: usize = 10;

/// Summary of one shortlisted vendor as seen by the oracle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub vendor_id: String,
    pub performance_score: f64,
    pub rating: f64,
    pub completion_rate: f64,
    pub response_time: f64,
    pub current_orders: u32,
    pub is_online: bool,
    pub distance_km: f64,
}

impl From<&ScoredVendor> for CandidateSummary {
    fn from(scored: &ScoredVendor) -> Self {
        Self {
            vendor_id: scored.vendor.vendor_id.clone(),
            performance_score: scored.score,
            rating: scored.vendor.average_rating,
            completion_rate: scored.vendor.completion_rate,
            response_time: scored.vendor.response_time_minutes,
            current_orders: scored.vendor.current_orders,
            is_online: scored.vendor.is_online,
            distance_km: scored.distance_km,
        }
    }
}

/// Payload handed to the oracle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleRequest {
    pub available_vendors: Vec<CandidateSummary>,
    pub priority: Priority,
    pub service_type: ServiceCategory,
    pub estimated_value: f64,
}

/// The oracle's proposed selection
///
/// Every field is required on the wire; a missing one fails decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleProposal {
    pub selected_vendors: Vec<String>,
    pub primary_vendor: String,
    pub fallback_vendors: Vec<String>,
    pub selection_reasoning: String,
    pub confidence_score: f64,
}

impl OracleProposal {
    /// Reject proposals that decoded but break the response contract
    pub fn check(&self) -> Result<(), OracleError> {
        if !self.confidence_score.is_finite() || !(0.0..=1.0).contains(&self.confidence_score) {
            return Err(OracleError::Malformed(format!(
                "confidence_score {} outside [0, 1]",
                self.confidence_score
            )));
        }
        Ok(())
    }
}

/// External ranking capability
///
/// Object-safe so the pipeline can hold an `Arc<dyn SelectionOracle>`.
#[async_trait]
pub trait SelectionOracle: Send + Sync {
    /// Name for logs and the health endpoint
    fn name(&self) -> &str;

    async fn propose(&self, request: &OracleRequest) -> Result<OracleProposal, OracleError>;
}

/// Build the oracle payload from the top `max_candidates` available vendors
pub fn build_oracle_request(state: &PipelineState, max_candidates: usize) -> OracleRequest {
    OracleRequest {
        available_vendors: state
            .available
            .iter()
            .take(max_candidates)
            .map(CandidateSummary::from)
            .collect(),
        priority: state.request.priority,
        service_type: state.request.service_type,
        estimated_value: state.request.estimated_value,
    }
}

/// Call the oracle with a deadline and check the answer
pub async fn request_proposal(
    oracle: &dyn SelectionOracle,
    request: &OracleRequest,
    timeout: Duration,
) -> Result<OracleProposal, OracleError> {
    let proposal = tokio::time::timeout(timeout, oracle.propose(request))
        .await
        .map_err(|_| OracleError::timeout(timeout))??;

    proposal.check()?;
    Ok(proposal)
}

/// Stage 5: oracle adapter
///
/// Records an error instead of invoking the oracle when no vendor passed the
/// availability gate. Oracle failures are recorded, never raised.
pub async fn propose_selection(
    state: &mut PipelineState,
    oracle: &dyn SelectionOracle,
    timeout: Duration,
    max_candidates: usize,
) {
    if state.has_error() {
        return;
    }

    if state.available.is_empty() {
        state.fail(SelectionError::NoAvailableVendors);
        return;
    }

    let request = build_oracle_request(state, max_candidates);
    tracing::debug!(
        "Sending {} candidates to oracle {}",
        request.available_vendors.len(),
        oracle.name()
    );

    match request_proposal(oracle, &request, timeout).await {
        Ok(proposal) => {
            tracing::info!("Oracle selection completed");
            state.proposal = Some(proposal);
            state.record("Oracle vendor selection completed");
        }
        Err(e) => {
            tracing::warn!("Oracle {} failed: {}", oracle.name(), e);
            state.fail(SelectionError::Oracle(e));
        }
    }
}

/// How a [`StaticOracle`] answers
#[derive(Debug, Clone)]
pub enum StaticBehavior {
    Propose(OracleProposal),
    Fail(OracleError),
    Delay(Duration, OracleProposal),
}

/// Oracle double returning a canned answer
#[derive(Debug, Clone)]
pub struct StaticOracle {
    behavior: StaticBehavior,
}

impl StaticOracle {
    pub fn proposing(proposal: OracleProposal) -> Self {
        Self {
            behavior: StaticBehavior::Propose(proposal),
        }
    }

    /// Proposes the given ids in order, first one primary
    pub fn selecting(ids: &[&str], confidence_score: f64) -> Self {
        let selected_vendors: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        Self::proposing(OracleProposal {
            primary_vendor: selected_vendors.first().cloned().unwrap_or_default(),
            selected_vendors,
            fallback_vendors: Vec::new(),
            selection_reasoning: "Canned selection".to_string(),
            confidence_score,
        })
    }

    pub fn empty() -> Self {
        Self::selecting(&[], 0.0)
    }

    pub fn failing(error: OracleError) -> Self {
        Self {
            behavior: StaticBehavior::Fail(error),
        }
    }

    pub fn delayed(delay: Duration, proposal: OracleProposal) -> Self {
        Self {
            behavior: StaticBehavior::Delay(delay, proposal),
        }
    }
}

#[async_trait]
impl SelectionOracle for StaticOracle {
    fn name(&self) -> &str {
        "static"
    }

    async fn propose(&self, _request: &OracleRequest) -> Result<OracleProposal, OracleError> {
        match &self.behavior {
            StaticBehavior::Propose(proposal) => Ok(proposal.clone()),
            StaticBehavior::Fail(error) => Err(error.clone()),
            StaticBehavior::Delay(delay, proposal) => {
                tokio::time::sleep(*delay).await;
                Ok(proposal.clone())
            }
        }
    }
}
