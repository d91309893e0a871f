//! Analysis categories and the search queries each one issues.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MiaError;

/// The kind of report requested for a company.
///
/// A category selects both the search queries (see [`AnalysisCategory::queries`])
/// and the prompt template (see [`crate::template::TemplateRegistry`]).
/// Unknown keys resolve to [`AnalysisCategory::Competition`] in both places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisCategory {
    #[default]
    Competition,
    DueDiligence,
    MarketTrends,
    BnplMerchantRisk,
    PaymentProcessorComparison,
}

impl AnalysisCategory {
    /// Every recognized category, in display order.
    pub const ALL: [AnalysisCategory; 5] = [
        Self::Competition,
        Self::DueDiligence,
        Self::MarketTrends,
        Self::BnplMerchantRisk,
        Self::PaymentProcessorComparison,
    ];

    /// Parse an exact category key.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Resolve a key leniently, falling back to the default category.
    pub fn resolve(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            tracing::debug!(category = s, "Unknown category, using default");
            Self::default()
        })
    }

    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Competition => "competition",
            Self::DueDiligence => "due_diligence",
            Self::MarketTrends => "market_trends",
            Self::BnplMerchantRisk => "bnpl_merchant_risk",
            Self::PaymentProcessorComparison => "payment_processor_comparison",
        }
    }

    /// Human readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Competition => "Competitive Landscape",
            Self::DueDiligence => "Due Diligence",
            Self::MarketTrends => "Market Trends",
            Self::BnplMerchantRisk => "BNPL Merchant Risk",
            Self::PaymentProcessorComparison => "Payment Processor Comparison",
        }
    }

    /// Comma separated list of valid keys, used in error messages.
    pub fn valid_keys() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Search queries for `company`, in the order they are issued.
    ///
    /// `year` fills the time-sensitive trend query.
    pub fn queries(&self, company: &str, year: i32) -> Vec<String> {
        match self {
            Self::Competition => vec![
                format!("{company} competitors market share"),
                format!("{company} pricing strategy business model"),
                format!("{company} vs competitors comparison"),
            ],
            Self::DueDiligence => vec![
                format!("{company} company background leadership"),
                format!("{company} reviews complaints issues"),
                format!("{company} funding revenue financials"),
            ],
            Self::MarketTrends => vec![
                format!("{company} industry trends {year}"),
                format!("{company} market growth forecast"),
                format!("{company} sector regulation news"),
            ],
            Self::BnplMerchantRisk => vec![
                format!("{company} chargebacks fraud disputes"),
                format!("{company} customer complaints refunds delivery"),
                format!("{company} financial stability funding layoffs"),
                format!("{company} buy now pay later merchant partners"),
            ],
            Self::PaymentProcessorComparison => vec![
                format!("{company} payment processing fees pricing"),
                format!("{company} vs Stripe Adyen PayPal comparison"),
                format!("{company} merchant reviews payouts support"),
                format!("{company} supported payment methods countries integrations"),
            ],
        }
    }
}

impl TryFrom<&str> for AnalysisCategory {
    type Error = MiaError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s).ok_or_else(|| MiaError::InvalidCategory {
            given: s.to_string(),
            valid: Self::valid_keys(),
        })
    }
}

impl fmt::Display for AnalysisCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_keys() {
        for category in AnalysisCategory::ALL {
            assert_eq!(AnalysisCategory::parse(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_resolve_unknown_falls_back_to_competition() {
        assert_eq!(AnalysisCategory::resolve("astrology"), AnalysisCategory::Competition);
        assert_eq!(AnalysisCategory::resolve(""), AnalysisCategory::Competition);
        assert_eq!(AnalysisCategory::resolve("due_diligence"), AnalysisCategory::DueDiligence);
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(AnalysisCategory::parse("Competition"), None);
        assert_eq!(AnalysisCategory::parse(" market_trends"), None);
    }

    #[test]
    fn test_try_from_lists_valid_keys() {
        let err = AnalysisCategory::try_from("nope").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("nope"));
        for category in AnalysisCategory::ALL {
            assert!(msg.contains(category.as_str()));
        }
    }

    #[test]
    fn test_query_lists() {
        for category in AnalysisCategory::ALL {
            let queries = category.queries("Acme", 2026);
            assert!((3..=4).contains(&queries.len()), "{category} has {} queries", queries.len());
            assert!(queries.iter().all(|q| q.starts_with("Acme ")));
        }
    }

    #[test]
    fn test_market_trends_uses_year() {
        let queries = AnalysisCategory::MarketTrends.queries("Klarna", 2025);
        assert_eq!(queries[0], "Klarna industry trends 2025");
        assert_eq!(queries[1], "Klarna market growth forecast");
        assert_eq!(queries[2], "Klarna sector regulation news");
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&AnalysisCategory::BnplMerchantRisk).unwrap();
        assert_eq!(json, "\"bnpl_merchant_risk\"");
    }
}
