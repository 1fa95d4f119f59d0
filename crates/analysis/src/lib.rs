//! AI analysis pipeline: semantic indexing and search over ingested
//! records, retrieval-augmented Q&A, canned analyses, multi-section
//! informes, and LLM-assisted field validation.

pub mod agent;
pub mod client;
pub mod error;
pub mod indexer;
pub mod informe;
pub mod validacion;

pub use client::{LlmClient, LlmConfig};
pub use error::AnalysisError;
