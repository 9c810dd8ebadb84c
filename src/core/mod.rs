// Core algorithm exports
pub mod availability;
pub mod distance;
pub mod error;
pub mod filters;
pub mod oracle;
pub mod pipeline;
pub mod scoring;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;

pub use availability::{gate_available, is_available};
pub use distance::{distance_between, haversine_distance};
pub use error::{OracleError, SelectionError};
pub use filters::{filter_eligible, filter_in_range, is_eligible};
pub use oracle::{
    CandidateSummary, OracleProposal, OracleRequest, SelectionOracle, StaticOracle,
};
pub use pipeline::{PipelineSettings, PipelineState, SelectionPipeline};
pub use scoring::{calculate_performance_score, compare_scored, rank_candidates, score_vendors};
pub use validator::{build_result, validate_selection, FALLBACK_MARKER};
