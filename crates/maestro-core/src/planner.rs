//! Goal-to-plan translation
//!
//! Two stages: an optional text-generation delegate is asked to produce a
//! structured plan as JSON; when the delegate is absent, fails, or replies
//! with something unparsable, a deterministic keyword analysis takes over.
//! The fallback is pure and never fails, so [`TaskPlanner::plan`] always
//! returns a plan.

use crate::capability::{
    DEEP_RESEARCH, QUALITY_REVIEW, REVISE, SAVE_TO_FILE, SEND_EMAIL, WRITE,
};
use crate::error::{Error, Result};
use maestro_llm::TextGenerator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One pipeline step: which capability runs at which position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanStep {
    /// 1-based position in the pipeline
    pub step: usize,
    /// Capability name to invoke
    pub skill: String,
    /// Human-readable step description
    pub description: String,
}

/// An ordered execution plan for a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPlan {
    /// Coarse task classification
    pub task_type: String,
    /// Capabilities the pipeline needs, first-use order, no duplicates
    pub required_skills: Vec<String>,
    /// The steps to run, in order
    pub pipeline: Vec<PlanStep>,
    /// One-line plan summary
    pub description: String,
}

impl TaskPlan {
    /// Capability names in pipeline order.
    #[must_use]
    pub fn skills(&self) -> Vec<&str> {
        self.pipeline.iter().map(|s| s.skill.as_str()).collect()
    }
}

const PLANNING_SYSTEM_PROMPT: &str = r#"You are a task analyzer for a multi-agent orchestration system.

Analyze the user goal and determine what tasks need to be performed.

Available agent skills:
- deep_research: Research and analyze topics in depth
- write: Write articles, documents, or content
- revise: Revise and improve existing text
- quality_review: Review content quality and provide feedback
- save_to_file: Save results to files (markdown/html)
- send_email: Send results via email

Respond ONLY with a JSON object (no markdown, no explanation):
{
  "task_type": "research_and_write|review_only|write_only|full_pipeline|custom",
  "required_skills": ["skill1", "skill2"],
  "pipeline": [
    {"step": 1, "skill": "deep_research", "description": "Research the topic"},
    {"step": 2, "skill": "write", "description": "Write content"}
  ],
  "description": "Brief description of the plan"
}

Examples:
- "analyze quantum computing" -> research + write
- "review this draft" -> quality_review only
- "write a report and email it" -> research + write + send_email
- "summarize this" -> write only
"#;

/// Translates a free-form goal into a [`TaskPlan`].
pub struct TaskPlanner {
    delegate: Option<Arc<dyn TextGenerator>>,
}

impl TaskPlanner {
    /// A planner that only uses the keyword analysis.
    #[must_use]
    pub fn new() -> Self {
        Self { delegate: None }
    }

    /// A planner that asks `delegate` first and falls back to keywords.
    #[must_use]
    pub fn with_delegate(delegate: Arc<dyn TextGenerator>) -> Self {
        Self {
            delegate: Some(delegate),
        }
    }

    /// Produce a plan for `goal`. Infallible: any delegate problem is
    /// logged and answered by the keyword analysis instead.
    pub async fn plan(&self, goal: &str) -> TaskPlan {
        if let Some(delegate) = &self.delegate {
            let user = format!("Query: {goal}\n\nProvide the task analysis in JSON format.");
            match delegate.generate(PLANNING_SYSTEM_PROMPT, &user).await {
                Ok(reply) => match parse_plan_reply(&reply) {
                    Ok(plan) => {
                        info!(
                            task_type = %plan.task_type,
                            skills = ?plan.skills(),
                            "Planned via delegate"
                        );
                        return plan;
                    }
                    Err(e) => {
                        warn!(error = %e, "Delegate reply unusable, falling back to keyword analysis");
                    }
                },
                Err(e) => {
                    warn!(error = %e, "Delegate failed, falling back to keyword analysis");
                }
            }
        }
        let plan = keyword_plan(goal);
        debug!(task_type = %plan.task_type, skills = ?plan.skills(), "Planned via keywords");
        plan
    }
}

impl Default for TaskPlanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse and normalize a delegate reply into a [`TaskPlan`].
///
/// Accepts the raw JSON object or the same wrapped in a Markdown code
/// fence. After parsing, step numbers are reindexed from 1 and
/// `required_skills` is rebuilt from the pipeline (first-use order, no
/// duplicates) so downstream code never sees an inconsistent plan.
pub fn parse_plan_reply(reply: &str) -> Result<TaskPlan> {
    let body = strip_code_fence(reply);
    let mut plan: TaskPlan = serde_json::from_str(body)
        .map_err(|e| Error::InvalidPlan(format!("unparsable plan JSON: {e}")))?;

    if plan.pipeline.is_empty() {
        return Err(Error::InvalidPlan("plan has no steps".to_string()));
    }
    for (index, step) in plan.pipeline.iter_mut().enumerate() {
        step.step = index + 1;
        if step.skill.is_empty() {
            return Err(Error::InvalidPlan(format!(
                "step {} has no skill",
                index + 1
            )));
        }
    }
    plan.required_skills = dedup_in_order(plan.pipeline.iter().map(|s| s.skill.clone()));
    Ok(plan)
}

fn dedup_in_order(skills: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = Vec::new();
    for skill in skills {
        if !seen.contains(&skill) {
            seen.push(skill);
        }
    }
    seen
}

/// Strip a surrounding Markdown code fence, with or without a `json` tag.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Deterministic keyword analysis. Pure, side-effect free, and total:
/// every goal maps to a plan, with the full five-step pipeline as the
/// default when nothing more specific matches.
///
/// Understands Korean and English task vocabulary.
#[must_use]
pub fn keyword_plan(goal: &str) -> TaskPlan {
    let goal_lower = goal.to_lowercase();

    // Review-only requests win over everything else.
    if contains_any(
        &goal_lower,
        &["검토", "리뷰", "review", "피드백", "평가", "feedback", "evaluate"],
    ) {
        return TaskPlan {
            task_type: "review_only".to_string(),
            required_skills: vec![QUALITY_REVIEW.to_string()],
            pipeline: vec![PlanStep {
                step: 1,
                skill: QUALITY_REVIEW.to_string(),
                description: "Review content quality".to_string(),
            }],
            description: "Content review task".to_string(),
        };
    }

    // Pure writing or summarizing, with no research vocabulary.
    if contains_any(&goal_lower, &["요약", "작성", "써줘", "write", "summarize"])
        && !contains_any(&goal_lower, &["분석", "조사", "research", "analyze"])
    {
        return TaskPlan {
            task_type: "write_only".to_string(),
            required_skills: vec![WRITE.to_string()],
            pipeline: vec![PlanStep {
                step: 1,
                skill: WRITE.to_string(),
                description: "Write content".to_string(),
            }],
            description: "Content writing task".to_string(),
        };
    }

    let wants_email = contains_any(&goal_lower, &["이메일", "메일", "email", "보내"]);
    let wants_file = contains_any(&goal_lower, &["저장", "파일", "save", "file"]);

    // Research plus writing, optionally finished by delivery or storage.
    if contains_any(
        &goal_lower,
        &["분석", "조사", "연구", "research", "알아봐", "analyze", "investigate"],
    ) {
        let mut pipeline = vec![
            PlanStep {
                step: 1,
                skill: DEEP_RESEARCH.to_string(),
                description: "Research the topic in depth".to_string(),
            },
            PlanStep {
                step: 2,
                skill: WRITE.to_string(),
                description: "Write content".to_string(),
            },
        ];
        let mut skills = vec![DEEP_RESEARCH.to_string(), WRITE.to_string()];

        if wants_email {
            pipeline.push(PlanStep {
                step: 3,
                skill: SEND_EMAIL.to_string(),
                description: "Send the result via email".to_string(),
            });
            skills.push(SEND_EMAIL.to_string());
        } else if wants_file {
            pipeline.push(PlanStep {
                step: 3,
                skill: SAVE_TO_FILE.to_string(),
                description: "Save the result to a file".to_string(),
            });
            skills.push(SAVE_TO_FILE.to_string());
        }

        return TaskPlan {
            task_type: "research_and_write".to_string(),
            required_skills: skills,
            pipeline,
            description: "Research and writing task".to_string(),
        };
    }

    // Default: the full research-to-report pipeline.
    TaskPlan {
        task_type: "full_pipeline".to_string(),
        required_skills: vec![
            DEEP_RESEARCH.to_string(),
            WRITE.to_string(),
            QUALITY_REVIEW.to_string(),
            REVISE.to_string(),
            SAVE_TO_FILE.to_string(),
        ],
        pipeline: vec![
            PlanStep {
                step: 1,
                skill: DEEP_RESEARCH.to_string(),
                description: "Research the topic in depth".to_string(),
            },
            PlanStep {
                step: 2,
                skill: WRITE.to_string(),
                description: "Write a draft".to_string(),
            },
            PlanStep {
                step: 3,
                skill: QUALITY_REVIEW.to_string(),
                description: "Review draft quality".to_string(),
            },
            PlanStep {
                step: 4,
                skill: REVISE.to_string(),
                description: "Apply review feedback".to_string(),
            },
            PlanStep {
                step: 5,
                skill: SAVE_TO_FILE.to_string(),
                description: "Save the report to a file".to_string(),
            },
        ],
        description: "Full pipeline execution".to_string(),
    }
}

#[cfg(test)]
mod tests;
