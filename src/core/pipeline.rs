use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::core::{
    availability::{gate_available, DEFAULT_AVAILABILITY_WINDOW_HOURS},
    error::SelectionError,
    filters::{filter_eligible, filter_in_range, SERVICE_RADIUS_KM},
    oracle::{propose_selection, OracleProposal, SelectionOracle, DEFAULT_MAX_CANDIDATES},
    scoring::score_vendors,
    validator::{validate_selection, DEFAULT_MAX_FALLBACK_VENDORS},
};
use crate::models::{
    Candidate, ScoredVendor, ScoringWeights, SelectionResult, ServiceRequest, Vendor,
};

/// Accumulator threaded through the selection stages
///
/// Holds its own copies of the request and vendor pool; the caller's records
/// are never touched. Once `error` is set, stages pass the state through.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub request: ServiceRequest,
    pub vendors: Vec<Vendor>,
    pub eligible: Vec<Vendor>,
    pub in_range: Vec<Candidate>,
    pub scored: Vec<ScoredVendor>,
    pub available: Vec<ScoredVendor>,
    pub proposal: Option<OracleProposal>,
    pub result: Option<SelectionResult>,
    pub reasoning_steps: Vec<String>,
    pub error: Option<SelectionError>,
}

impl PipelineState {
    pub fn new(request: ServiceRequest, vendors: Vec<Vendor>) -> Self {
        Self {
            request,
            vendors,
            eligible: Vec::new(),
            in_range: Vec::new(),
            scored: Vec::new(),
            available: Vec::new(),
            proposal: None,
            result: None,
            reasoning_steps: Vec::new(),
            error: None,
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Record a stage error; the first one wins
    pub fn fail(&mut self, error: SelectionError) {
        if self.error.is_none() {
            tracing::error!("Selection stage failed: {}", error);
            self.error = Some(error);
        }
    }

    /// Append a human-readable step to the audit trail
    pub fn record(&mut self, step: impl Into<String>) {
        self.reasoning_steps.push(step.into());
    }
}

/// Tunables of a selection run
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub service_radius_km: f64,
    pub availability_window: chrono::Duration,
    pub oracle_timeout: Duration,
    pub max_candidates: usize,
    pub max_fallback_vendors: usize,
    pub weights: ScoringWeights,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            service_radius_km: SERVICE_RADIUS_KM,
            availability_window: chrono::Duration::hours(DEFAULT_AVAILABILITY_WINDOW_HOURS),
            oracle_timeout: Duration::from_secs(30),
            max_candidates: DEFAULT_MAX_CANDIDATES,
            max_fallback_vendors: DEFAULT_MAX_FALLBACK_VENDORS,
            weights: ScoringWeights::default(),
        }
    }
}

/// Main selection orchestrator - runs the six stage pipeline
///
/// # Pipeline Stages
/// 1. Eligibility filter
/// 2. Geo reachability filter
/// 3. Performance scoring
/// 4. Availability gate
/// 5. Oracle proposal
/// 6. Validation and fallback
///
/// Runs share nothing mutable, so one pipeline can serve concurrent requests.
#[derive(Clone)]
pub struct SelectionPipeline {
    oracle: Arc<dyn SelectionOracle>,
    settings: PipelineSettings,
}

impl SelectionPipeline {
    pub fn new(oracle: Arc<dyn SelectionOracle>, settings: PipelineSettings) -> Self {
        Self { oracle, settings }
    }

    pub fn with_default_settings(oracle: Arc<dyn SelectionOracle>) -> Self {
        Self::new(oracle, PipelineSettings::default())
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    /// Select vendors for a request as of now
    pub async fn select(&self, request: &ServiceRequest, vendors: &[Vendor]) -> SelectionResult {
        self.select_at(request, vendors, Utc::now()).await
    }

    /// Select vendors for a request, judging availability as of `now`
    ///
    /// Always returns a populated result; failures come back as an empty
    /// selection with zero confidence.
    pub async fn select_at(
        &self,
        request: &ServiceRequest,
        vendors: &[Vendor],
        now: DateTime<Utc>,
    ) -> SelectionResult {
        tracing::info!("Starting vendor selection for request: {}", request.request_id);

        let mut state = self.run(request, vendors, now).await;
        let result = state
            .result
            .take()
            .unwrap_or_else(|| SelectionResult::failed("No selection result generated"));

        tracing::info!(
            "Vendor selection finished for request {}: {} selected (from {} vendors)",
            request.request_id,
            result.selected_vendors.len(),
            vendors.len()
        );

        result
    }

    /// Run every stage and return the final state
    pub async fn run(
        &self,
        request: &ServiceRequest,
        vendors: &[Vendor],
        now: DateTime<Utc>,
    ) -> PipelineState {
        let settings = &self.settings;
        let mut state = PipelineState::new(request.clone(), vendors.to_vec());

        filter_eligible(&mut state);
        filter_in_range(&mut state, settings.service_radius_km);
        score_vendors(&mut state, &settings.weights);
        gate_available(&mut state, now, settings.availability_window);
        propose_selection(
            &mut state,
            self.oracle.as_ref(),
            settings.oracle_timeout,
            settings.max_candidates,
        )
        .await;
        validate_selection(&mut state, settings.max_fallback_vendors);

        state
    }
}

impl std::fmt::Debug for SelectionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionPipeline")
            .field("oracle", &self.oracle.name())
            .field("settings", &self.settings)
            .finish()
    }
}
