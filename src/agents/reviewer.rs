//! Reviewer agent: quality assessment and concrete improvement suggestions.

use super::required_str;
use maestro_core::{Agent, Error};
use maestro_llm::TextGenerator;
use serde_json::Value;
use std::sync::Arc;

const REVIEW_SYSTEM: &str = "You are an expert content reviewer and quality assurance specialist.

Your role:
1. **Quality Assessment**: Evaluate accuracy, clarity, completeness, and logic
2. **Error Detection**: Identify factual errors, inconsistencies, or gaps
3. **Structure Analysis**: Review organization, flow, and coherence
4. **Improvement Suggestions**: Provide specific, actionable recommendations

Output format:
- Strengths (2-3 points done well)
- Problems found (errors, unclear passages, omissions)
- Concrete improvement suggestions (which sentence/paragraph, and how)
- Overall assessment (score or grade plus a one-line summary)";

/// Build the reviewer agent.
pub fn reviewer_agent(llm: Arc<dyn TextGenerator>) -> Agent {
    Agent::builder(
        "reviewer",
        "Reviewer Agent",
        "Evaluates content quality, finds errors, and proposes concrete improvements",
    )
    .capability(
        "quality_review",
        "Review a draft and provide actionable feedback",
        move |params: Value| {
            let llm = llm.clone();
            async move {
                let draft = required_str(&params, "draft")?;
                let user = format!("Review the following draft thoroughly:\n\n{draft}");
                let feedback = llm
                    .generate(REVIEW_SYSTEM, &user)
                    .await
                    .map_err(Error::from)?;
                Ok(Value::String(feedback))
            }
        },
    )
    .build()
}
