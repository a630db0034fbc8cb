use tracing::{error, info};

use crate::errors::AppError;
use crate::models::EventRecord;
use crate::services::llm_service::LlmProvider;

pub const SYSTEM_INSTRUCTION: &str = "You are a financial historian and market analyst. \
You return accurate, structured data about specific U.S. historical events and their market impact. \
Pair professional analysis with plain-language explanations a beginner can follow, \
give the exact date (YYYY-MM-DD) on which the event happened or began, \
and always answer with a single valid JSON object and nothing else.";

const RESPONSE_SHAPE: &str = r#"{
  "event": "Short name of the event the query refers to",
  "date": "YYYY-MM-DD on which the event happened or began",
  "influencers": ["Key person", "Key person"],
  "description": "What happened",
  "reason": "Why this event answers the query",
  "impact": "Effect on markets and the economy from that date",
  "whyThisMatters": "One sentence on why markets cared",
  "simplifiedExplanation": "The event explained without jargon",
  "marketAnalysis": {
    "shortTerm": "Market reaction in the first days",
    "mediumTerm": "How markets evolved over the following weeks and months",
    "longTerm": "Lasting market and policy consequences",
    "simplifiedExplanation": "The market reaction in plain words"
  },
  "economicIndicators": {
    "gdpImpact": "Effect on GDP growth",
    "employmentImpact": "Effect on employment",
    "interestRates": "Resulting interest rate policy",
    "inflation": "Effect on inflation or deflation",
    "simplifiedExplanation": "The economic effects in plain words"
  },
  "investorLessons": "Two or three lessons investors still apply",
  "glossary": { "Term": "Plain definition of a financial term used above" },
  "relatedEvents": [
    {
      "event": "Comparable historical event",
      "date": "YYYY-MM-DD",
      "note": "How it relates to the main event",
      "comparison": "How the market impact compares",
      "simplifiedExplanation": "The comparison in plain words"
    }
  ],
  "source": "General historical source or 'Historical records'"
}"#;

/// User instruction sent for a search query.
pub fn build_prompt(query: &str) -> String {
    format!(
        "Find the specific historical event named by the search query \"{query}\", \
or else the most closely related significant U.S. historical event. \
When the query names an event (for example \"black monday\" or \"2008 financial crisis\"), describe exactly that event.\n\n\
The date field must be as precise as possible, ideally the exact day in YYYY-MM-DD form. Examples:\n\
- Black Monday: \"1987-10-19\"\n\
- 2008 Financial Crisis: \"2008-09-15\" (Lehman Brothers bankruptcy)\n\
- Great Depression: \"1929-10-29\" (Black Tuesday)\n\n\
Answer with ONLY a JSON object of this shape:\n\n{RESPONSE_SHAPE}\n\n\
No text before or after the JSON."
    )
}

/// Looks up one historical event through the LLM and parses its answer.
pub async fn fetch_historical_event(
    provider: &dyn LlmProvider,
    query: &str,
) -> Result<EventRecord, AppError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput("Query parameter is required".to_string()));
    }

    info!("Fetching historical event for query: {}", query);

    let content = provider
        .generate_completion(SYSTEM_INSTRUCTION, &build_prompt(query))
        .await
        .map_err(|e| {
            error!("LLM provider error for query '{}': {}", query, e);
            AppError::from(e)
        })?;

    parse_event_record(&content)
}

/// Parses the completion text into an [`EventRecord`].
///
/// A surrounding Markdown code fence is tolerated; anything else that is not
/// the expected JSON object is an upstream parse error.
pub fn parse_event_record(content: &str) -> Result<EventRecord, AppError> {
    let json = strip_code_fence(content.trim());
    serde_json::from_str::<EventRecord>(json).map_err(|e| {
        error!("Failed to parse LLM response ({}): {}", e, content);
        AppError::UpstreamParse(format!("historical event data: {}", e))
    })
}

fn strip_code_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };
    // Drop the info string ("json") on the opening fence line.
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}
