//! Writer agent: drafting and feedback-driven revision.

use super::required_str;
use maestro_core::{Agent, Error};
use maestro_llm::TextGenerator;
use serde_json::Value;
use std::sync::Arc;

const WRITE_SYSTEM: &str = "You are a professional technical writer.
Transform bullet points into engaging, well-structured paragraphs.
Make it clear, informative, and reader-friendly.";

const REVISE_SYSTEM: &str = "You are a professional technical writer who excels at revising content based on feedback.

Your role:
1. **Carefully read** the original draft and the reviewer's feedback
2. **Address all issues** pointed out in the feedback
3. **Implement improvements** suggested by the reviewer
4. **Maintain the original structure** while enhancing quality
5. **Produce a polished final version** that incorporates all suggestions

Output: the revised text, improved based on the feedback.";

/// Build the writer agent. Provides both drafting and revision.
pub fn writer_agent(llm: Arc<dyn TextGenerator>) -> Agent {
    let write_llm = llm.clone();
    Agent::builder(
        "writer",
        "Writer Agent",
        "Writes drafts from research material and revises them from feedback",
    )
    .capability(
        "write",
        "Write structured prose from bullet points",
        move |params: Value| {
            let llm = write_llm.clone();
            async move {
                let bullets = required_str(&params, "bullets")?;
                let user = format!(
                    "Turn the following bullets into 2-3 natural paragraphs:\n\n{bullets}"
                );
                let draft = llm.generate(WRITE_SYSTEM, &user).await.map_err(Error::from)?;
                Ok(Value::String(draft))
            }
        },
    )
    .capability(
        "revise",
        "Revise a draft according to review feedback",
        move |params: Value| {
            let llm = llm.clone();
            async move {
                let draft = required_str(&params, "draft")?;
                let feedback = required_str(&params, "review_feedback")?;
                let user = format!(
                    "Here are a draft and its review feedback. Rewrite the draft so every \
                     suggestion in the feedback is addressed.\n\n\
                     [Draft]\n{draft}\n\n[Review feedback]\n{feedback}"
                );
                let revised = llm
                    .generate(REVISE_SYSTEM, &user)
                    .await
                    .map_err(Error::from)?;
                Ok(Value::String(revised))
            }
        },
    )
    .build()
}
