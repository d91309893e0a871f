//! Built-in report templates, one per analysis category.

use super::{PromptTemplate, ReportSection};
use crate::analysis::AnalysisCategory;

const fn section(title: &'static str, guidance: &'static str) -> ReportSection {
    ReportSection { title, guidance }
}

const COMPETITION_SECTIONS: &[ReportSection] = &[
    section("Executive Summary", "Key findings in 3-4 bullet points"),
    section("Key Competitors", "Identify top 5 competitors with brief profiles"),
    section("Market Positioning", "How does {company} position itself vs competitors?"),
    section("Pricing & Business Model", "Compare pricing strategies"),
    section("Strengths & Weaknesses", "SWOT-style analysis"),
    section("Strategic Recommendations", "3-5 actionable insights"),
];

const DUE_DILIGENCE_SECTIONS: &[ReportSection] = &[
    section("Company Overview", "Background, founding, leadership"),
    section("Business Model Assessment", "How they make money, sustainability"),
    section("Red Flags & Concerns", "Any warning signs from news/reviews"),
    section("Reputation Analysis", "Customer sentiment, industry standing"),
    section("Financial Health Indicators", "Any public financial signals"),
    section("Risk Score", "Low/Medium/High with justification"),
    section("Recommendation", "Partner/Caution/Avoid with reasoning"),
];

const MARKET_TRENDS_SECTIONS: &[ReportSection] = &[
    section("Industry Overview", "Current state and size of the market"),
    section("Growth Trends", "Historical and projected growth rates"),
    section("Key Drivers", "What's fueling industry changes?"),
    section("Emerging Trends", "New technologies, business models, consumer behaviors"),
    section("Regulatory Landscape", "Current and upcoming regulations"),
    section("Competitive Dynamics", "How is the market structure evolving?"),
    section("Future Outlook", "3-5 year forecast and key uncertainties"),
];

const BNPL_MERCHANT_RISK_SECTIONS: &[ReportSection] = &[
    section("Merchant Profile", "What they sell, sales channels, typical order values"),
    section("Fraud & Chargeback Exposure", "Dispute patterns, fraud reports, card network issues"),
    section("Fulfilment & Refund Practices", "Delivery reliability, return and refund policies"),
    section("Customer Sentiment", "Review trends and recurring complaints"),
    section("Financial Stability", "Funding, layoffs, signs of distress"),
    section("Regulatory & Compliance Flags", "Enforcement actions, licensing, consumer-protection issues"),
    section("Risk Rating", "Low/Medium/High with justification"),
    section("Underwriting Recommendation", "Approve/Approve with limits/Decline with reasoning"),
];

const PAYMENT_PROCESSOR_SECTIONS: &[ReportSection] = &[
    section("Executive Summary", "Key findings in 3-4 bullet points"),
    section("Processor Overview", "Who {company} serves and how it is positioned"),
    section("Pricing & Fees", "Transaction fees, FX, payouts, hidden costs vs alternatives"),
    section("Coverage", "Payment methods, currencies, and geographies supported"),
    section("Developer Experience & Integrations", "APIs, SDKs, platform plugins"),
    section("Reliability & Support", "Uptime reputation, payout holds, support quality"),
    section("Best Fit", "Which merchant profiles suit {company} vs alternatives"),
];

/// Template for `category`.
pub(super) fn template(category: AnalysisCategory) -> PromptTemplate {
    match category {
        AnalysisCategory::Competition => PromptTemplate {
            category,
            intro: "You are a senior competitive intelligence analyst. \
                    Analyze the competitive landscape for {company}.",
            sections: COMPETITION_SECTIONS,
            closing: "Be specific, cite data where available, and focus on actionable intelligence.",
        },
        AnalysisCategory::DueDiligence => PromptTemplate {
            category,
            intro: "You are a risk analyst conducting merchant due diligence. \
                    Assess {company} thoroughly.",
            sections: DUE_DILIGENCE_SECTIONS,
            closing: "Be objective and evidence-based. Flag uncertainties clearly.",
        },
        AnalysisCategory::MarketTrends => PromptTemplate {
            category,
            intro: "You are a market research analyst. \
                    Analyze macro trends affecting {company} and its sector.",
            sections: MARKET_TRENDS_SECTIONS,
            closing: "Support claims with data. Distinguish between established trends and speculation.",
        },
        AnalysisCategory::BnplMerchantRisk => PromptTemplate {
            category,
            intro: "You are a BNPL credit and merchant risk analyst. \
                    Assess {company} as a prospective buy-now-pay-later merchant.",
            sections: BNPL_MERCHANT_RISK_SECTIONS,
            closing: "Weigh evidence by recency and source credibility. State clearly where data is missing.",
        },
        AnalysisCategory::PaymentProcessorComparison => PromptTemplate {
            category,
            intro: "You are a payments industry analyst. \
                    Compare {company} against the leading payment processors.",
            sections: PAYMENT_PROCESSOR_SECTIONS,
            closing: "Use concrete fee figures where available and note when pricing is negotiated or undisclosed.",
        },
    }
}
