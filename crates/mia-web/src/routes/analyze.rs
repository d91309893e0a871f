//! Analysis route handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::{Stream, StreamExt};
use mia_core::{AnalysisCategory, AnalysisRequest};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::{api_error, json_rejection, ApiError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub company_name: String,
    pub analysis_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub report: String,
    pub sources: Vec<String>,
    pub company_name: String,
    pub analysis_type: String,
}

/// Reject unknown categories and blank names before the pipeline runs.
fn validate(req: &AnalyzeRequest) -> Result<AnalysisRequest, ApiError> {
    let category = AnalysisCategory::try_from(req.analysis_type.as_str()).map_err(api_error)?;
    AnalysisRequest::new(req.company_name.clone(), category).map_err(api_error)
}

pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(req) = payload.map_err(json_rejection)?;
    let request = validate(&req)?;
    info!(company = %req.company_name, category = %req.analysis_type, "Analysis requested");

    let result = state.pipeline.run(&request).await.map_err(|e| {
        error!(error = %e, "Analysis failed");
        api_error(e)
    })?;

    Ok(Json(AnalyzeResponse {
        report: result.report,
        sources: result.sources,
        company_name: req.company_name,
        analysis_type: req.analysis_type,
    }))
}

pub async fn analyze_stream(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let Json(req) = payload.map_err(json_rejection)?;
    let request = validate(&req)?;
    info!(company = %req.company_name, category = %req.analysis_type, "Streaming analysis requested");

    let events = state
        .pipeline
        .stream(request)
        .into_stream()
        .map(|event| Event::default().json_data(event.to_frame()));

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
