//! Pipeline orchestration: research, then analysis.
//!
//! [`AnalysisPipeline::run`] drives both stages to completion.
//! [`AnalysisPipeline::stream`] returns an [`AnalysisStream`] that performs
//! the same stages one pull at a time, yielding a progress event at each
//! checkpoint.

pub mod stream;

use std::sync::Arc;
use tracing::{info, info_span, Instrument, Span};
use uuid::Uuid;

use crate::analysis::{AnalysisReport, AnalysisRequest, AnalysisState};
use crate::config::Config;
use crate::error::MiaResult;
use crate::search::{AggregatorSettings, SearchAggregator, SearchProvider, TavilyClient};
use crate::synth::{AnthropicClient, ReportSynthesizer, SynthesizerSettings, TextGenerator};
use crate::template::TemplateRegistry;

pub use stream::{AnalysisStream, Phase, PipelineStage, ProgressEvent, StreamFrame};

/// The two-stage analysis pipeline. Cheap to clone; holds only shared
/// provider handles and settings.
#[derive(Clone)]
pub struct AnalysisPipeline {
    aggregator: SearchAggregator,
    synthesizer: ReportSynthesizer,
}

impl AnalysisPipeline {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        generator: Arc<dyn TextGenerator>,
        aggregator: AggregatorSettings,
        synthesizer: SynthesizerSettings,
    ) -> Self {
        Self {
            aggregator: SearchAggregator::new(search, aggregator),
            synthesizer: ReportSynthesizer::new(generator, synthesizer),
        }
    }

    /// Build a pipeline backed by Tavily and Claude.
    pub fn from_config(config: &Config) -> MiaResult<Self> {
        TemplateRegistry::global().validate()?;

        let search = TavilyClient::from_config(&config.search)?;
        let generator = AnthropicClient::from_config(&config.llm)?;

        Ok(Self::new(
            Arc::new(search),
            Arc::new(generator),
            AggregatorSettings::from(&config.search),
            SynthesizerSettings::from(&config.llm),
        ))
    }

    pub fn aggregator(&self) -> &SearchAggregator {
        &self.aggregator
    }

    pub fn synthesizer(&self) -> &ReportSynthesizer {
        &self.synthesizer
    }

    /// Run both stages and return the report with its sources.
    pub async fn run(&self, request: &AnalysisRequest) -> MiaResult<AnalysisReport> {
        self.run_to_completion(request)
            .instrument(run_span(request))
            .await
    }

    async fn run_to_completion(&self, request: &AnalysisRequest) -> MiaResult<AnalysisReport> {
        let mut state = AnalysisState::new(&request.company_name, request.category);
        self.research(&mut state).await?;
        self.analyze(&mut state).await?;
        info!(sources = state.sources().len(), "Analysis complete");
        Ok(state.into_report())
    }

    /// Start a step-by-step run. Nothing executes until the first pull.
    pub fn stream(&self, request: AnalysisRequest) -> AnalysisStream {
        let span = run_span(&request);
        AnalysisStream::new(self.clone(), request, span)
    }

    pub(crate) async fn research(&self, state: &mut AnalysisState) -> MiaResult<()> {
        let results = self
            .aggregator
            .aggregate(&state.company_name, state.category)
            .await?;
        state.apply_research(results);
        Ok(())
    }

    pub(crate) async fn analyze(&self, state: &mut AnalysisState) -> MiaResult<()> {
        let report = self
            .synthesizer
            .synthesize(&state.company_name, state.category, state.results())
            .await?;
        state.apply_report(report);
        Ok(())
    }
}

fn run_span(request: &AnalysisRequest) -> Span {
    info_span!(
        "analysis",
        run_id = %Uuid::new_v4(),
        company = %request.company_name,
        category = %request.category,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisCategory, SearchResult};
    use crate::error::MiaError;
    use crate::testing::{StubGenerator, StubSearchProvider};

    fn pipeline(search: StubSearchProvider, generator: Arc<StubGenerator>) -> AnalysisPipeline {
        AnalysisPipeline::new(
            Arc::new(search),
            generator,
            AggregatorSettings {
                reference_year: 2026,
                ..AggregatorSettings::default()
            },
            SynthesizerSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_market_trends_end_to_end() {
        let queries = AnalysisCategory::MarketTrends.queries("Acme", 2026);
        let mut search = StubSearchProvider::new();
        for (i, q) in queries.iter().enumerate() {
            search = search.with_results(
                q,
                vec![
                    SearchResult::new(format!("https://q{i}.example/a")),
                    SearchResult::new(format!("https://q{i}.example/b")),
                ],
            );
        }
        let generator = Arc::new(StubGenerator::new("# Acme trends"));
        let pipeline = pipeline(search, generator.clone());

        let request = AnalysisRequest::new("Acme", AnalysisCategory::MarketTrends).unwrap();
        let report = pipeline.run(&request).await.unwrap();

        assert_eq!(report.report, "# Acme trends");
        assert_eq!(
            report.sources,
            vec![
                "https://q0.example/a",
                "https://q0.example/b",
                "https://q1.example/a",
                "https://q1.example/b",
                "https://q2.example/a",
                "https://q2.example/b",
            ]
        );

        let prompt = &generator.requests()[0].user_prompt;
        for n in 1..=6 {
            assert!(prompt.contains(&format!("[Source {n}] ")));
        }
        assert!(!prompt.contains("[Source 7]"));
        assert!(prompt.contains("URL: https://q2.example/b"));
    }

    #[tokio::test]
    async fn test_unknown_category_matches_default() {
        let queries = AnalysisCategory::Competition.queries("Acme", 2026);
        let canned = || {
            StubSearchProvider::new()
                .with_results(&queries[0], vec![SearchResult::new("https://x.example")])
                .with_results(&queries[2], vec![SearchResult::new("https://y.example")])
        };

        let default_gen = Arc::new(StubGenerator::new("report"));
        let fallback_gen = Arc::new(StubGenerator::new("report"));

        let default_report = pipeline(canned(), default_gen.clone())
            .run(&AnalysisRequest::new("Acme", AnalysisCategory::Competition).unwrap())
            .await
            .unwrap();
        let fallback_report = pipeline(canned(), fallback_gen.clone())
            .run(&AnalysisRequest::from_key("Acme", "not_a_category").unwrap())
            .await
            .unwrap();

        assert_eq!(default_report, fallback_report);
        assert_eq!(default_gen.requests(), fallback_gen.requests());
    }

    #[tokio::test]
    async fn test_sources_never_exceed_cap() {
        let queries = AnalysisCategory::PaymentProcessorComparison.queries("Acme", 2026);
        let mut search = StubSearchProvider::new();
        for (i, q) in queries.iter().enumerate() {
            search = search.with_results(
                q,
                (0..10).map(|j| SearchResult::new(format!("https://{i}-{j}.example"))).collect(),
            );
        }
        let generator = Arc::new(StubGenerator::new("r"));
        let report = pipeline(search, generator.clone())
            .run(&AnalysisRequest::new("Acme", AnalysisCategory::PaymentProcessorComparison).unwrap())
            .await
            .unwrap();

        let expected: Vec<String> = (0..3)
            .flat_map(|i| (0..5).map(move |j| format!("https://{i}-{j}.example")))
            .collect();
        assert_eq!(report.sources, expected);
        assert!(generator.requests()[0].user_prompt.contains("[Source 15]"));
        assert!(generator.requests()[0]
            .user_prompt
            .contains("[Source 15] Untitled\nURL: https://2-4.example\n"));
        assert!(!generator.requests()[0].user_prompt.contains("[Source 16]"));
    }

    #[tokio::test]
    async fn test_synthesis_failure_is_fatal() {
        let generator = Arc::new(StubGenerator::failing("boom"));
        let err = pipeline(StubSearchProvider::new(), generator)
            .run(&AnalysisRequest::new("Acme", AnalysisCategory::DueDiligence).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, MiaError::ProviderApi { .. }));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_from_config_builds_real_clients() {
        let pipeline = AnalysisPipeline::from_config(&Config::default()).unwrap();
        assert_eq!(pipeline.aggregator().settings().max_results, 15);
    }
}
