//! Sequential pipeline execution
//!
//! Runs a [`TaskPlan`](crate::planner::TaskPlan) against the registry:
//! assign a provider to every required capability up front, refuse to start
//! when anything is uncoverable, then invoke the steps strictly in order,
//! threading each output into the shared result context the next steps read
//! from. A step failure aborts the run; the report still carries everything
//! that completed before it.

use crate::capability::{CapabilityKind, Role};
use crate::error::{Error, Result};
use crate::planner::TaskPlan;
use crate::registry::AgentRegistry;
use crate::selection::build_selection_map;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{info, warn};

/// Knobs for the terminal report steps.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Title passed to save steps (filename stem)
    pub title: String,
    /// Format passed to save steps
    pub format: String,
    /// Recipient for email steps; absent means email steps are skipped
    pub recipient: Option<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "maestro_report".to_string(),
            format: "markdown".to_string(),
            recipient: None,
        }
    }
}

/// Lifecycle of a single step within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    /// Not reached (a prior step aborted the run)
    Pending,
    /// Invocation in flight
    Running,
    /// Finished successfully
    Completed,
    /// Invocation failed; the run aborted here
    Failed,
    /// Deliberately not executed (email with no configured recipient)
    Skipped,
}

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Every step completed or was deliberately skipped
    Done,
    /// A step failed and later steps were not attempted
    Aborted,
}

/// Where and how a run aborted.
#[derive(Debug, Clone)]
pub struct StepFailure {
    /// 1-based step position
    pub step: usize,
    /// Capability that failed
    pub capability: String,
    /// Endpoint of the agent that was invoked
    pub endpoint: String,
    /// Remote or transport error message
    pub message: String,
}

/// The per-step record in a [`RunReport`].
#[derive(Debug, Clone)]
pub struct StepRecord {
    /// 1-based step position
    pub step: usize,
    /// Capability name
    pub capability: String,
    /// Step description from the plan
    pub description: String,
    /// Name of the selected agent
    pub agent_name: String,
    /// Endpoint of the selected agent
    pub endpoint: String,
    /// Final state
    pub state: StepState,
    /// Raw invocation output, present when completed
    pub output: Option<Value>,
}

/// What happened during one pipeline run.
#[derive(Debug)]
pub struct RunReport {
    /// The goal the pipeline ran for
    pub goal: String,
    /// Task type from the plan
    pub task_type: String,
    /// Per-step records, plan order
    pub steps: Vec<StepRecord>,
    /// Overall outcome
    pub state: RunState,
    /// Populated when the run aborted
    pub failure: Option<StepFailure>,
}

impl RunReport {
    /// Whether every step completed or was deliberately skipped.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state == RunState::Done
    }

    /// Distinct agent names that executed at least one step, first-use order.
    #[must_use]
    pub fn agents_used(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for record in &self.steps {
            if record.state == StepState::Completed && !names.contains(&record.agent_name.as_str())
            {
                names.push(&record.agent_name);
            }
        }
        names
    }
}

/// Flatten an invocation output into the text later steps consume.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The final content for terminal steps: the revised draft when it exists,
/// otherwise the draft, otherwise the goal itself.
fn final_content<'a>(context: &'a HashMap<Role, String>, goal: &'a str) -> &'a str {
    context
        .get(&Role::Revision)
        .or_else(|| context.get(&Role::Draft))
        .map_or(goal, String::as_str)
}

/// Build the named arguments for a step. `None` means the step should be
/// skipped rather than invoked.
fn step_params(
    kind: CapabilityKind,
    goal: &str,
    context: &HashMap<Role, String>,
    options: &ReportOptions,
) -> Option<Value> {
    let params = match kind {
        CapabilityKind::Research => json!({ "query": goal }),
        CapabilityKind::Write => {
            let bullets = context.get(&Role::Research).map_or(goal, String::as_str);
            json!({ "bullets": bullets })
        }
        CapabilityKind::Review => {
            let draft = context.get(&Role::Draft).map_or(goal, String::as_str);
            json!({ "draft": draft })
        }
        CapabilityKind::Revise => {
            let draft = context.get(&Role::Draft).map_or(goal, String::as_str);
            let feedback = context.get(&Role::Review).map_or("", String::as_str);
            json!({ "draft": draft, "review_feedback": feedback })
        }
        CapabilityKind::Save => json!({
            "content": final_content(context, goal),
            "title": options.title,
            "format": options.format,
        }),
        CapabilityKind::Email => {
            let recipient = options.recipient.as_deref()?;
            json!({
                "content": final_content(context, goal),
                "to_email": recipient,
                "subject": format!("[Maestro Report] {goal}"),
            })
        }
        CapabilityKind::Other => json!({
            "query": goal,
            "context": final_content(context, goal),
        }),
    };
    Some(params)
}

/// Executes plans against a registry.
pub struct PipelineExecutor<'a> {
    registry: &'a AgentRegistry,
    options: ReportOptions,
}

impl<'a> PipelineExecutor<'a> {
    /// An executor with default report options.
    #[must_use]
    pub fn new(registry: &'a AgentRegistry) -> Self {
        Self {
            registry,
            options: ReportOptions::default(),
        }
    }

    /// Override the report options.
    #[must_use]
    pub fn with_options(mut self, options: ReportOptions) -> Self {
        self.options = options;
        self
    }

    /// Run `plan` for `goal`.
    ///
    /// Errors before anything executes when a required capability has no
    /// provider ([`Error::MissingCapabilities`] lists every uncovered
    /// capability, not just the first). A mid-run step failure is not an
    /// `Err`: the report comes back [`RunState::Aborted`] with the failing
    /// step recorded and later steps left [`StepState::Pending`].
    pub async fn run(&self, plan: &TaskPlan, goal: &str) -> Result<RunReport> {
        // Capability gate. Score against the union of declared and
        // pipeline skills so a hand-built plan cannot slip past it.
        let mut required = plan.required_skills.clone();
        for step in &plan.pipeline {
            if !required.contains(&step.skill) {
                required.push(step.skill.clone());
            }
        }
        let selection = build_selection_map(self.registry.list(), &required);
        let missing = selection.missing(&required);
        if !missing.is_empty() {
            return Err(Error::MissingCapabilities {
                capabilities: missing,
            });
        }

        let mut context: HashMap<Role, String> = HashMap::new();
        let mut steps: Vec<StepRecord> = Vec::new();
        let mut failure: Option<StepFailure> = None;

        for plan_step in &plan.pipeline {
            let agent = selection
                .provider(&plan_step.skill)
                .ok_or_else(|| Error::Internal(format!("no provider for {}", plan_step.skill)))?;

            let mut record = StepRecord {
                step: plan_step.step,
                capability: plan_step.skill.clone(),
                description: plan_step.description.clone(),
                agent_name: agent.name.clone(),
                endpoint: agent.endpoint.clone(),
                state: StepState::Pending,
                output: None,
            };

            if failure.is_some() {
                steps.push(record);
                continue;
            }

            let kind = CapabilityKind::classify(&plan_step.skill);
            let Some(params) = step_params(kind, goal, &context, &self.options) else {
                warn!(
                    step = plan_step.step,
                    capability = %plan_step.skill,
                    "No recipient configured, skipping delivery step"
                );
                record.state = StepState::Skipped;
                steps.push(record);
                continue;
            };

            info!(
                step = plan_step.step,
                capability = %plan_step.skill,
                agent = %agent.name,
                "Executing step"
            );
            record.state = StepState::Running;

            match self
                .registry
                .invoke(&agent.endpoint, &plan_step.skill, params)
                .await
            {
                Ok(output) => {
                    context.insert(kind.output_role(), value_to_text(&output));
                    record.state = StepState::Completed;
                    record.output = Some(output);
                }
                Err(e) => {
                    warn!(
                        step = plan_step.step,
                        capability = %plan_step.skill,
                        agent = %agent.name,
                        error = %e,
                        "Step failed, aborting run"
                    );
                    record.state = StepState::Failed;
                    failure = Some(StepFailure {
                        step: plan_step.step,
                        capability: plan_step.skill.clone(),
                        endpoint: agent.endpoint.clone(),
                        message: e.to_string(),
                    });
                }
            }
            steps.push(record);
        }

        let state = if failure.is_some() {
            RunState::Aborted
        } else {
            RunState::Done
        };
        Ok(RunReport {
            goal: goal.to_string(),
            task_type: plan.task_type.clone(),
            steps,
            state,
            failure,
        })
    }
}
