// Service exports
pub mod llm_oracle;

pub use llm_oracle::LlmOracle;
