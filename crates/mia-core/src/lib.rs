//! MIA Core Library
//!
//! Market-intelligence analysis pipeline: category-driven web research,
//! result aggregation, and cited report synthesis.

pub mod analysis;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod search;
pub mod synth;
pub mod template;
pub mod testing;

pub use analysis::{AnalysisCategory, AnalysisReport, AnalysisRequest, ResultSet, SearchResult};
pub use config::Config;
pub use error::{MiaError, MiaResult};
pub use pipeline::{AnalysisPipeline, AnalysisStream, ProgressEvent, StreamFrame};
