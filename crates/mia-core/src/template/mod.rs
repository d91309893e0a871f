//! Prompt template registry.
//!
//! Maps each [`AnalysisCategory`] to the instructions that open the
//! synthesis prompt: an analyst persona, a numbered checklist of required
//! report sections, and a closing line of guidance.

mod builtin;

use std::sync::LazyLock;

use crate::analysis::AnalysisCategory;
use crate::error::{MiaError, MiaResult};

/// Substitution point for the company name.
pub const COMPANY_PLACEHOLDER: &str = "{company}";

static REGISTRY: LazyLock<TemplateRegistry> = LazyLock::new(TemplateRegistry::builtin);

/// One required section of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSection {
    pub title: &'static str,
    pub guidance: &'static str,
}

/// Instructions for one analysis category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub category: AnalysisCategory,
    pub intro: &'static str,
    pub sections: &'static [ReportSection],
    pub closing: &'static str,
}

impl PromptTemplate {
    /// Render with the placeholder left in place.
    pub fn render(&self) -> String {
        let checklist = self
            .sections
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. **{}** - {}", i + 1, s.title, s.guidance))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{}\n\nYour report MUST include:\n{}\n\n{}",
            self.intro, checklist, self.closing
        )
    }

    /// Render with `company` substituted for the placeholder.
    pub fn fill(&self, company: &str) -> String {
        self.render().replace(COMPANY_PLACEHOLDER, company)
    }

    pub fn section_titles(&self) -> Vec<&'static str> {
        self.sections.iter().map(|s| s.title).collect()
    }
}

/// Read-only lookup from category to template.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: Vec<PromptTemplate>,
}

impl TemplateRegistry {
    /// Build the registry from the built-in templates.
    pub fn builtin() -> Self {
        let templates = AnalysisCategory::ALL
            .into_iter()
            .map(builtin::template)
            .collect();
        Self { templates }
    }

    /// Process-wide registry.
    pub fn global() -> &'static TemplateRegistry {
        &REGISTRY
    }

    /// Template for a category.
    pub fn template_for(&self, category: AnalysisCategory) -> &PromptTemplate {
        self.templates
            .iter()
            .find(|t| t.category == category)
            .unwrap_or(&self.templates[0])
    }

    /// Template for a raw key, falling back to the default category.
    pub fn template_for_key(&self, key: &str) -> &PromptTemplate {
        self.template_for(AnalysisCategory::resolve(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PromptTemplate> {
        self.templates.iter()
    }

    /// Check that every category has a usable template and query list.
    pub fn validate(&self) -> MiaResult<()> {
        if self.templates.first().map(|t| t.category) != Some(AnalysisCategory::default()) {
            return Err(MiaError::Config(
                "default category must be the first registered template".to_string(),
            ));
        }

        for category in AnalysisCategory::ALL {
            let Some(template) = self.templates.iter().find(|t| t.category == category) else {
                return Err(MiaError::Config(format!("no template for '{category}'")));
            };
            if !template.intro.contains(COMPANY_PLACEHOLDER) {
                return Err(MiaError::Config(format!(
                    "template for '{category}' has no {COMPANY_PLACEHOLDER} placeholder"
                )));
            }
            if template.sections.is_empty() {
                return Err(MiaError::Config(format!(
                    "template for '{category}' lists no required sections"
                )));
            }
            let queries = category.queries(COMPANY_PLACEHOLDER, 2000).len();
            if !(3..=4).contains(&queries) {
                return Err(MiaError::Config(format!(
                    "category '{category}' has {queries} search queries, expected 3-4"
                )));
            }
        }
        Ok(())
    }
}
