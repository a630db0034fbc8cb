use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structured summary of a historical market event, as produced by the LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub event: String,
    pub date: String,
    pub influencers: Vec<String>,
    pub description: String,
    pub reason: String,
    pub impact: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why_this_matters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simplified_explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_analysis: Option<MarketAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub economic_indicators: Option<EconomicIndicators>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investor_lessons: Option<InvestorLessons>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glossary: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_events: Option<Vec<RelatedEvent>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketAnalysis {
    pub short_term: Option<String>,
    pub medium_term: Option<String>,
    pub long_term: Option<String>,
    pub simplified_explanation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EconomicIndicators {
    pub gdp_impact: Option<String>,
    pub employment_impact: Option<String>,
    pub interest_rates: Option<String>,
    pub inflation: Option<String>,
    pub simplified_explanation: Option<String>,
}

// Models return the lessons either as prose or as a bullet list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InvestorLessons {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelatedEvent {
    pub event: String,
    pub date: Option<String>,
    pub note: Option<String>,
    pub comparison: Option<String>,
    pub simplified_explanation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventQueryParams {
    pub query: Option<String>,
}
