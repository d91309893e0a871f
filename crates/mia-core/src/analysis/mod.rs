//! Analysis domain: categories and the state threaded through a run.

pub mod category;
pub mod model;

pub use category::AnalysisCategory;
pub use model::{AnalysisReport, AnalysisRequest, AnalysisState, ResultSet, SearchResult};
