//! The `run` command: discover, plan, execute, report.

use crate::config::Config;
use maestro_core::executor::{PipelineExecutor, ReportOptions, RunReport, StepState};
use maestro_core::planner::{TaskPlan, TaskPlanner};
use maestro_core::registry::AgentRegistry;
use maestro_llm::gemini::GeminiClient;
use maestro_llm::TextGenerator;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

const DEFAULT_GOAL: &str = "The impact of eating malatang every day on our health";

pub async fn run(
    goal: Option<String>,
    title: String,
    format: String,
    recipient: Option<String>,
    no_delegate: bool,
    endpoints: Vec<String>,
) -> anyhow::Result<()> {
    let config = Config::from_env();
    let goal = goal.unwrap_or_else(|| DEFAULT_GOAL.to_string());
    let endpoints = if endpoints.is_empty() {
        config.agent_endpoints.clone()
    } else {
        endpoints
    };

    let mut registry = AgentRegistry::new()?;
    let registered = registry.register_many(&endpoints).await;
    if registered.is_empty() {
        anyhow::bail!(
            "no agents could be discovered at {} (is the fleet running? try `maestro serve`)",
            endpoints.join(", ")
        );
    }

    println!("Discovered {} agent(s):", registered.len());
    for record in &registered {
        println!(
            "  - {} ({}) [{}]",
            record.name,
            record.endpoint,
            record.capability_names().join(", ")
        );
    }
    println!();

    let planner = build_planner(no_delegate);
    let plan = planner.plan(&goal).await;
    print_plan(&goal, &plan);

    let options = ReportOptions {
        title,
        format,
        recipient: recipient.or(config.report_recipient),
    };
    let report = PipelineExecutor::new(&registry)
        .with_options(options)
        .run(&plan, &goal)
        .await?;
    print_report(&report);

    if let Some(failure) = report.failure {
        return Err(maestro_core::Error::StepInvocation {
            step: failure.step,
            capability: failure.capability,
            endpoint: failure.endpoint,
            message: failure.message,
        }
        .into());
    }
    Ok(())
}

fn build_planner(no_delegate: bool) -> TaskPlanner {
    if no_delegate {
        return TaskPlanner::new();
    }
    match GeminiClient::from_env() {
        Ok(client) => {
            info!(model = %client.model(), "Planning with delegate");
            let delegate: Arc<dyn TextGenerator> = Arc::new(client);
            TaskPlanner::with_delegate(delegate)
        }
        Err(e) => {
            info!(reason = %e, "Planning delegate unavailable, using keyword analysis");
            TaskPlanner::new()
        }
    }
}

fn print_plan(goal: &str, plan: &TaskPlan) {
    println!("Goal: {goal}");
    println!("Task type: {} ({})", plan.task_type, plan.description);
    println!("Required capabilities: {}", plan.required_skills.join(", "));
    println!("Steps:");
    for step in &plan.pipeline {
        println!("  {}. {}: {}", step.step, step.skill, step.description);
    }
    println!();
}

fn print_report(report: &RunReport) {
    for record in &report.steps {
        let marker = match record.state {
            StepState::Completed => "ok",
            StepState::Failed => "FAILED",
            StepState::Skipped => "skipped",
            StepState::Pending | StepState::Running => "not run",
        };
        println!(
            "[{marker}] step {} {} via {} ({})",
            record.step, record.capability, record.agent_name, record.endpoint
        );
        if let Some(output) = &record.output {
            println!("{}", summarize_output(output));
        }
    }
    println!();
    println!(
        "Run {}: {} step(s), {} agent(s) used",
        if report.is_done() { "complete" } else { "aborted" },
        report.steps.len(),
        report.agents_used().len()
    );
}

/// Keep terminal output readable for long model outputs.
fn summarize_output(output: &Value) -> String {
    let text = match output {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    const LIMIT: usize = 2000;
    if text.chars().count() > LIMIT {
        let truncated: String = text.chars().take(LIMIT).collect();
        format!("{truncated}\n... (truncated)")
    } else {
        text
    }
}
