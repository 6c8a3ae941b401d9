//! Research agent: deep topic research backed by a text-generation model.

use super::required_str;
use maestro_core::{Agent, Error};
use maestro_llm::TextGenerator;
use serde_json::Value;
use std::sync::Arc;

const RESEARCH_SYSTEM: &str = "You are an expert AI researcher specializing in information gathering and analysis.

Your role:
1. **Information Collection**: Gather relevant facts, concepts, and data
2. **Multi-perspective Analysis**: Examine the topic from various angles
3. **Reference & Sources**: Suggest key references or areas to explore
4. **Fact-based Insights**: Provide objective, data-driven insights

Output format:
- Core concepts and definitions (2-3 bullet points)
- Multi-angle analysis
- Keywords or fields worth exploring
- Major trends and recent developments";

/// Build the research agent.
pub fn research_agent(llm: Arc<dyn TextGenerator>) -> Agent {
    Agent::builder(
        "research",
        "Research Agent",
        "In-depth topic research, multi-angle analysis, and reference suggestions",
    )
    .capability(
        "deep_research",
        "Research a topic in depth from multiple angles",
        move |params: Value| {
            let llm = llm.clone();
            async move {
                let query = required_str(&params, "query")?;
                let user =
                    format!("Topic: {query}\n\nPerform deep research in the format above.");
                let findings = llm
                    .generate(RESEARCH_SYSTEM, &user)
                    .await
                    .map_err(Error::from)?;
                Ok(Value::String(findings))
            }
        },
    )
    .build()
}
