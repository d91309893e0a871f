//! Turns a result set into a cited markdown report.

use std::sync::Arc;
use tracing::{debug, info};

use super::anthropic::DEFAULT_MODEL;
use super::{GenerationRequest, TextGenerator};
use crate::analysis::{AnalysisCategory, ResultSet};
use crate::config::LlmConfig;
use crate::error::{MiaError, MiaResult};
use crate::template::TemplateRegistry;

/// Fixed system instruction for every report.
pub const SYSTEM_PROMPT: &str = "You are an expert market intelligence analyst.
Your reports are thorough, well-structured, and actionable.
Always cite your sources using [Source N] notation.
Use markdown formatting for clear structure.
Be direct and avoid filler language.";

const RESEARCH_HEADER: &str = "## Research Data";

const CLOSING_INSTRUCTION: &str = "Generate a comprehensive markdown report based on the research above.
Cite sources where applicable using [Source N] notation.";

const CONTEXT_SEPARATOR: &str = "\n---\n";

/// Default bound on generated output.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizerSettings {
    pub model: String,
    pub max_tokens: u32,
}

impl Default for SynthesizerSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl From<&LlmConfig> for SynthesizerSettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

/// Format results as numbered citation blocks.
///
/// Indices are 1-based and match the `[Source N]` citations the model is
/// asked to produce.
pub fn format_context(results: &ResultSet) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "[Source {}] {}\nURL: {}\nContent: {}\n",
                i + 1,
                r.display_title(),
                r.url,
                r.display_content()
            )
        })
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Builds the synthesis prompt and calls the generator.
#[derive(Clone)]
pub struct ReportSynthesizer {
    generator: Arc<dyn TextGenerator>,
    templates: &'static TemplateRegistry,
    settings: SynthesizerSettings,
}

impl ReportSynthesizer {
    pub fn new(generator: Arc<dyn TextGenerator>, settings: SynthesizerSettings) -> Self {
        Self {
            generator,
            templates: TemplateRegistry::global(),
            settings,
        }
    }

    /// The user-turn prompt for a run.
    pub fn build_prompt(&self, company: &str, category: AnalysisCategory, results: &ResultSet) -> String {
        let instructions = self.templates.template_for(category).fill(company);
        let context = format_context(results);

        format!("{instructions}\n\n{RESEARCH_HEADER}\n\n{context}\n\n---\n\n{CLOSING_INSTRUCTION}")
    }

    /// Generate the report. Provider failures are returned as-is.
    pub async fn synthesize(
        &self,
        company: &str,
        category: AnalysisCategory,
        results: &ResultSet,
    ) -> MiaResult<String> {
        let request = GenerationRequest {
            model: self.settings.model.clone(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: self.build_prompt(company, category, results),
            max_tokens: self.settings.max_tokens,
        };

        debug!(
            generator = self.generator.name(),
            sources = results.len(),
            prompt_chars = request.user_prompt.len(),
            "Submitting synthesis prompt"
        );

        let segments = self.generator.generate(&request).await?;
        let report = segments
            .into_iter()
            .next()
            .ok_or_else(|| MiaError::synthesis("model returned no text content"))?;

        info!(company, category = %category, report_chars = report.len(), "Report generated");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SearchResult;
    use crate::testing::StubGenerator;

    fn set_of(results: Vec<SearchResult>) -> ResultSet {
        let mut set = ResultSet::default();
        set.extend(results);
        set
    }

    #[test]
    fn test_context_placeholders() {
        let context = format_context(&set_of(vec![SearchResult::new("https://bare.example")]));
        assert_eq!(
            context,
            "[Source 1] Untitled\nURL: https://bare.example\nContent: No content\n"
        );
    }

    #[test]
    fn test_context_numbering_and_separator() {
        let context = format_context(&set_of(vec![
            SearchResult::new("https://a.example").with_title("A").with_content("alpha"),
            SearchResult::new("https://b.example").with_title("B").with_content("beta"),
        ]));
        assert_eq!(
            context,
            "[Source 1] A\nURL: https://a.example\nContent: alpha\n\
             \n---\n\
             [Source 2] B\nURL: https://b.example\nContent: beta\n"
        );
    }

    #[test]
    fn test_context_empty() {
        assert_eq!(format_context(&ResultSet::default()), "");
    }

    #[test]
    fn test_prompt_layout() {
        let synth = ReportSynthesizer::new(Arc::new(StubGenerator::new("r")), SynthesizerSettings::default());
        let results = set_of(vec![SearchResult::new("https://a.example")]);
        let prompt = synth.build_prompt("Acme", AnalysisCategory::MarketTrends, &results);

        let template = TemplateRegistry::global()
            .template_for(AnalysisCategory::MarketTrends)
            .fill("Acme");
        assert!(prompt.starts_with(&template));
        assert!(prompt.contains("\n\n## Research Data\n\n[Source 1] Untitled\n"));
        assert!(prompt.ends_with(
            "\n\n---\n\nGenerate a comprehensive markdown report based on the research above.\n\
             Cite sources where applicable using [Source N] notation."
        ));
    }

    #[tokio::test]
    async fn test_synthesize_sends_system_prompt_and_bounds() {
        let generator = Arc::new(StubGenerator::new("# Acme report"));
        let synth = ReportSynthesizer::new(
            generator.clone(),
            SynthesizerSettings {
                model: "test-model".to_string(),
                max_tokens: 1024,
            },
        );

        let report = synth
            .synthesize("Acme", AnalysisCategory::Competition, &ResultSet::default())
            .await
            .unwrap();
        assert_eq!(report, "# Acme report");

        let requests = generator.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system_prompt, SYSTEM_PROMPT);
        assert_eq!(requests[0].model, "test-model");
        assert_eq!(requests[0].max_tokens, 1024);
        assert!(requests[0].user_prompt.contains("competitive landscape for Acme"));
    }

    #[tokio::test]
    async fn test_only_first_segment_is_returned() {
        let generator = Arc::new(StubGenerator::with_segments(vec!["first".into(), "second".into()]));
        let synth = ReportSynthesizer::new(generator, SynthesizerSettings::default());
        let report = synth
            .synthesize("Acme", AnalysisCategory::Competition, &ResultSet::default())
            .await
            .unwrap();
        assert_eq!(report, "first");
    }

    #[tokio::test]
    async fn test_no_segments_is_a_synthesis_error() {
        let generator = Arc::new(StubGenerator::with_segments(Vec::new()));
        let synth = ReportSynthesizer::new(generator, SynthesizerSettings::default());
        let err = synth
            .synthesize("Acme", AnalysisCategory::Competition, &ResultSet::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MiaError::Synthesis(_)));
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let generator = Arc::new(StubGenerator::failing("overloaded"));
        let synth = ReportSynthesizer::new(generator.clone(), SynthesizerSettings::default());
        let err = synth
            .synthesize("Acme", AnalysisCategory::DueDiligence, &ResultSet::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("overloaded"));
        assert_eq!(generator.requests().len(), 1);
    }
}
