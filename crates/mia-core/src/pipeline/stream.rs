//! Step-by-step pipeline execution with progress events.
//!
//! A successful run yields exactly four events:
//! `ResearchStarted`, `ResearchComplete`, `AnalysisStarted`, `Complete`.
//! A fatal error yields a single `Failed` event in place of the remaining
//! ones, after which the stream ends.

use futures::Stream;
use serde::{Deserialize, Serialize};
use tracing::{error, Instrument, Span};

use super::AnalysisPipeline;
use crate::analysis::{AnalysisReport, AnalysisRequest, AnalysisState};
use crate::error::MiaError;

/// Where a streaming run is. Transitions are strictly linear; the only
/// branch is into `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Started,
    Searching,
    SearchDone,
    Analyzing,
    Complete,
    Failed,
}

impl PipelineStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

/// One checkpoint of a streaming run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    ResearchStarted,
    ResearchComplete { source_count: usize },
    AnalysisStarted,
    Complete(AnalysisReport),
    Failed { message: String },
}

impl ProgressEvent {
    pub fn phase(&self) -> Phase {
        match self {
            Self::ResearchStarted | Self::ResearchComplete { .. } => Phase::Research,
            Self::AnalysisStarted => Phase::Analyze,
            Self::Complete(_) => Phase::Complete,
            Self::Failed { .. } => Phase::Error,
        }
    }

    /// Human readable progress message, if the event carries one.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::ResearchStarted => Some("Searching for information...".to_string()),
            Self::ResearchComplete { source_count } => Some(format!("Found {source_count} sources")),
            Self::AnalysisStarted => Some("Analyzing data...".to_string()),
            Self::Complete(_) => None,
            Self::Failed { message } => Some(message.clone()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete(_) | Self::Failed { .. })
    }

    /// Wire representation.
    pub fn to_frame(&self) -> StreamFrame {
        let (report, sources) = match self {
            Self::Complete(r) => (Some(r.report.clone()), Some(r.sources.clone())),
            _ => (None, None),
        };
        StreamFrame {
            phase: self.phase(),
            message: self.message(),
            report,
            sources,
        }
    }
}

/// Phase tag carried by every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Research,
    Analyze,
    Complete,
    Error,
}

/// JSON body of one server-sent event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamFrame {
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

/// A pull-driven pipeline run. Each call to [`AnalysisStream::next_event`]
/// performs at most one stage.
pub struct AnalysisStream {
    pipeline: AnalysisPipeline,
    state: AnalysisState,
    stage: PipelineStage,
    span: Span,
}

impl AnalysisStream {
    pub(super) fn new(pipeline: AnalysisPipeline, request: AnalysisRequest, span: Span) -> Self {
        Self {
            pipeline,
            state: AnalysisState::new(request.company_name, request.category),
            stage: PipelineStage::Started,
            span,
        }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Advance to the next checkpoint. Returns `None` once the run has ended.
    pub async fn next_event(&mut self) -> Option<ProgressEvent> {
        let span = self.span.clone();
        self.advance().instrument(span).await
    }

    async fn advance(&mut self) -> Option<ProgressEvent> {
        match self.stage {
            PipelineStage::Started => {
                self.stage = PipelineStage::Searching;
                Some(ProgressEvent::ResearchStarted)
            }
            PipelineStage::Searching => match self.pipeline.research(&mut self.state).await {
                Ok(()) => {
                    self.stage = PipelineStage::SearchDone;
                    Some(ProgressEvent::ResearchComplete {
                        source_count: self.state.sources().len(),
                    })
                }
                Err(e) => Some(self.fail(e)),
            },
            PipelineStage::SearchDone => {
                self.stage = PipelineStage::Analyzing;
                Some(ProgressEvent::AnalysisStarted)
            }
            PipelineStage::Analyzing => match self.pipeline.analyze(&mut self.state).await {
                Ok(()) => {
                    self.stage = PipelineStage::Complete;
                    Some(ProgressEvent::Complete(AnalysisReport {
                        report: self.state.report().to_string(),
                        sources: self.state.sources().to_vec(),
                    }))
                }
                Err(e) => Some(self.fail(e)),
            },
            PipelineStage::Complete | PipelineStage::Failed => None,
        }
    }

    fn fail(&mut self, e: MiaError) -> ProgressEvent {
        error!(stage = ?self.stage, error = %e, "Streaming analysis failed");
        self.stage = PipelineStage::Failed;
        ProgressEvent::Failed {
            message: e.to_string(),
        }
    }

    /// Adapt into a [`Stream`]. Stages still run only when polled.
    pub fn into_stream(self) -> impl Stream<Item = ProgressEvent> + Send + 'static {
        futures::stream::unfold(self, |mut run| async move {
            let event = run.next_event().await?;
            Some((event, run))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisCategory, SearchResult};
    use crate::search::AggregatorSettings;
    use crate::synth::SynthesizerSettings;
    use crate::testing::{StubGenerator, StubSearchProvider};
    use futures::StreamExt;
    use std::sync::Arc;

    fn pipeline_with(search: Arc<StubSearchProvider>, generator: Arc<StubGenerator>) -> AnalysisPipeline {
        AnalysisPipeline::new(
            search,
            generator,
            AggregatorSettings {
                reference_year: 2026,
                require_sources: true,
                ..AggregatorSettings::default()
            },
            SynthesizerSettings::default(),
        )
    }

    fn populated_search() -> StubSearchProvider {
        let queries = AnalysisCategory::Competition.queries("Acme", 2026);
        StubSearchProvider::new()
            .with_results(&queries[0], vec![SearchResult::new("https://a.example")])
            .with_results(
                &queries[1],
                vec![SearchResult::new("https://a.example"), SearchResult::new("https://b.example")],
            )
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest::new("Acme", AnalysisCategory::Competition).unwrap()
    }

    #[tokio::test]
    async fn test_success_yields_four_ordered_events() {
        let pipeline = pipeline_with(Arc::new(populated_search()), Arc::new(StubGenerator::new("# Report")));
        let events: Vec<ProgressEvent> = pipeline.stream(request()).into_stream().collect().await;

        assert_eq!(
            events,
            vec![
                ProgressEvent::ResearchStarted,
                ProgressEvent::ResearchComplete { source_count: 2 },
                ProgressEvent::AnalysisStarted,
                ProgressEvent::Complete(AnalysisReport {
                    report: "# Report".to_string(),
                    sources: vec!["https://a.example".to_string(), "https://b.example".to_string()],
                }),
            ]
        );
    }

    #[tokio::test]
    async fn test_stream_is_lazy() {
        let search = Arc::new(populated_search());
        let generator = Arc::new(StubGenerator::new("r"));
        let mut run = pipeline_with(search.clone(), generator.clone()).stream(request());

        assert_eq!(run.stage(), PipelineStage::Started);
        assert!(search.calls().is_empty());

        assert_eq!(run.next_event().await, Some(ProgressEvent::ResearchStarted));
        assert!(search.calls().is_empty());
        assert_eq!(run.stage(), PipelineStage::Searching);

        assert!(matches!(run.next_event().await, Some(ProgressEvent::ResearchComplete { .. })));
        assert_eq!(search.calls().len(), 3);
        assert_eq!(run.stage(), PipelineStage::SearchDone);

        assert_eq!(run.next_event().await, Some(ProgressEvent::AnalysisStarted));
        assert!(generator.requests().is_empty());

        assert!(matches!(run.next_event().await, Some(ProgressEvent::Complete(_))));
        assert_eq!(generator.requests().len(), 1);
        assert!(run.stage().is_terminal());

        assert_eq!(run.next_event().await, None);
        assert_eq!(run.next_event().await, None);
    }

    #[tokio::test]
    async fn test_synthesis_failure_emits_error_and_ends() {
        let pipeline = pipeline_with(Arc::new(populated_search()), Arc::new(StubGenerator::failing("quota exceeded")));
        let events: Vec<ProgressEvent> = pipeline.stream(request()).into_stream().collect().await;

        assert_eq!(events.len(), 4);
        assert_eq!(events[2], ProgressEvent::AnalysisStarted);
        match &events[3] {
            ProgressEvent::Failed { message } => assert!(message.contains("quota exceeded")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(!events.iter().any(|e| matches!(e, ProgressEvent::Complete(_))));
    }

    #[tokio::test]
    async fn test_required_sources_failure_stops_after_research() {
        let queries = AnalysisCategory::Competition.queries("Acme", 2026);
        let mut search = StubSearchProvider::new();
        for q in &queries {
            search = search.with_failure(q);
        }
        let generator = Arc::new(StubGenerator::new("unused"));
        let events: Vec<ProgressEvent> = pipeline_with(Arc::new(search), generator.clone())
            .stream(request())
            .into_stream()
            .collect()
            .await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0], ProgressEvent::ResearchStarted);
        assert_eq!(events[1].phase(), Phase::Error);
        assert!(generator.requests().is_empty());
    }

    #[test]
    fn test_frames_serialize_to_wire_shape() {
        let started = serde_json::to_value(ProgressEvent::ResearchStarted.to_frame()).unwrap();
        assert_eq!(
            started,
            serde_json::json!({"phase": "research", "message": "Searching for information..."})
        );

        let found = serde_json::to_value(ProgressEvent::ResearchComplete { source_count: 7 }.to_frame()).unwrap();
        assert_eq!(found, serde_json::json!({"phase": "research", "message": "Found 7 sources"}));

        let analyzing = serde_json::to_value(ProgressEvent::AnalysisStarted.to_frame()).unwrap();
        assert_eq!(analyzing, serde_json::json!({"phase": "analyze", "message": "Analyzing data..."}));

        let complete = serde_json::to_value(
            ProgressEvent::Complete(AnalysisReport {
                report: "# R".to_string(),
                sources: vec!["https://a.example".to_string()],
            })
            .to_frame(),
        )
        .unwrap();
        assert_eq!(
            complete,
            serde_json::json!({"phase": "complete", "report": "# R", "sources": ["https://a.example"]})
        );

        let failed = serde_json::to_value(ProgressEvent::Failed { message: "x".into() }.to_frame()).unwrap();
        assert_eq!(failed, serde_json::json!({"phase": "error", "message": "x"}));
    }
}
