//! End-to-end pipeline tests against in-process agent servers.

use maestro_core::agent::Agent;
use maestro_core::error::Error;
use maestro_core::executor::{PipelineExecutor, ReportOptions, RunState, StepState};
use maestro_core::planner::keyword_plan;
use maestro_core::registry::AgentRegistry;
use maestro_core::server::AgentServer;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

async fn spawn(agent: Agent) -> String {
    let server = AgentServer::bind(Arc::new(agent), "127.0.0.1:0".parse().unwrap())
        .await
        .unwrap();
    let url = server.url().to_string();
    tokio::spawn(server.serve());
    url
}

fn text_capability(
    builder: maestro_core::agent::AgentBuilder,
    name: &str,
    description: &str,
    reply_prefix: &'static str,
    input_key: &'static str,
) -> maestro_core::agent::AgentBuilder {
    builder.capability(name, description, move |params: Value| async move {
        let input = params
            .get(input_key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Ok(Value::String(format!("{reply_prefix}: {input}")))
    })
}

/// A four-agent fleet mirroring the research / writer / reviewer / reporter
/// split, each capability echoing a tagged version of its input so the
/// threading between steps is observable.
async fn spawn_fleet() -> Vec<String> {
    let research = text_capability(
        Agent::builder("research", "Research Agent", "Researches topics"),
        "deep_research",
        "Research a topic",
        "findings",
        "query",
    )
    .build();

    let mut writer = Agent::builder("writer", "Writer Agent", "Writes and revises drafts");
    writer = text_capability(writer, "write", "Write a draft", "draft", "bullets");
    writer = writer.capability(
        "revise",
        "Revise a draft",
        |params: Value| async move {
            let draft = params.get("draft").and_then(Value::as_str).unwrap_or_default();
            let feedback = params
                .get("review_feedback")
                .and_then(Value::as_str)
                .unwrap_or_default();
            Ok(Value::String(format!("revised[{draft} | {feedback}]")))
        },
    );
    let writer = writer.build();

    let reviewer = text_capability(
        Agent::builder("reviewer", "Reviewer Agent", "Reviews drafts"),
        "quality_review",
        "Review a draft",
        "feedback",
        "draft",
    )
    .build();

    let reporter = Agent::builder("reporter", "Reporter Agent", "Delivers results")
        .capability("save_to_file", "Save content to a file", |params: Value| async move {
            let content = params.get("content").and_then(Value::as_str).unwrap_or_default();
            Ok(json!({
                "filename": format!("{}.md", params["title"].as_str().unwrap_or("report")),
                "size_bytes": content.len(),
            }))
        })
        .capability("send_email", "Send content via email", |params: Value| async move {
            Ok(json!({
                "status": "success",
                "to": params["to_email"],
            }))
        })
        .build();

    let mut urls = Vec::new();
    for agent in [research, writer, reviewer, reporter] {
        urls.push(spawn(agent).await);
    }
    urls
}

#[tokio::test]
async fn test_full_pipeline_threads_results() {
    let urls = spawn_fleet().await;
    let mut registry = AgentRegistry::new().unwrap();
    let registered = registry.register_many(&urls).await;
    assert_eq!(registered.len(), 4);

    let goal = "the history of the espresso machine";
    let plan = keyword_plan(goal);
    assert_eq!(plan.task_type, "full_pipeline");

    let report = PipelineExecutor::new(&registry)
        .run(&plan, goal)
        .await
        .unwrap();

    assert_eq!(report.state, RunState::Done);
    assert_eq!(report.steps.len(), 5);
    assert!(report.steps.iter().all(|s| s.state == StepState::Completed));

    // Each step consumed the previous step's output.
    let draft = report.steps[1].output.as_ref().unwrap().as_str().unwrap();
    assert_eq!(draft, format!("draft: findings: {goal}"));
    let review = report.steps[2].output.as_ref().unwrap().as_str().unwrap();
    assert_eq!(review, format!("feedback: {draft}"));
    let revised = report.steps[3].output.as_ref().unwrap().as_str().unwrap();
    assert_eq!(revised, format!("revised[{draft} | {review}]"));

    // The save step received the revision.
    let saved = report.steps[4].output.as_ref().unwrap();
    assert_eq!(saved["size_bytes"], json!(revised.len()));

    assert_eq!(
        report.agents_used(),
        vec!["Research Agent", "Writer Agent", "Reviewer Agent", "Reporter Agent"]
    );
}

#[tokio::test]
async fn test_missing_capability_blocks_execution() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = calls.clone();
    let research = Agent::builder("research", "Research Agent", "Researches topics")
        .capability("deep_research", "Research a topic", move |_params: Value| {
            let counted = counted.clone();
            async move {
                counted.fetch_add(1, Ordering::SeqCst);
                Ok(Value::String("findings".to_string()))
            }
        })
        .build();

    let url = spawn(research).await;
    let mut registry = AgentRegistry::new().unwrap();
    registry.register(&url).await.unwrap();

    let plan = keyword_plan("anything at all");
    let err = PipelineExecutor::new(&registry)
        .run(&plan, "anything at all")
        .await
        .unwrap_err();

    // Every uncovered capability is reported, and nothing ran.
    match err {
        Error::MissingCapabilities { capabilities } => {
            assert_eq!(
                capabilities,
                vec!["write", "quality_review", "revise", "save_to_file"]
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_step_failure_aborts_remaining_steps() {
    let later_calls = Arc::new(AtomicUsize::new(0));

    let research = text_capability(
        Agent::builder("research", "Research Agent", "Researches topics"),
        "deep_research",
        "Research a topic",
        "findings",
        "query",
    )
    .build();

    let writer = Agent::builder("writer", "Writer Agent", "Writes drafts")
        .capability("write", "Write a draft", |_params: Value| async move {
            Err(Error::Capability("model quota exhausted".to_string()))
        })
        .build();

    let counted = later_calls.clone();
    let reporter = Agent::builder("reporter", "Reporter Agent", "Delivers results")
        .capability("save_to_file", "Save content", move |_params: Value| {
            let counted = counted.clone();
            async move {
                counted.fetch_add(1, Ordering::SeqCst);
                Ok(json!({"filename": "never.md"}))
            }
        })
        .build();

    let mut urls = Vec::new();
    for agent in [research, writer, reporter] {
        urls.push(spawn(agent).await);
    }
    let mut registry = AgentRegistry::new().unwrap();
    registry.register_many(&urls).await;

    let plan = keyword_plan("research rust and save it to a file");
    let report = PipelineExecutor::new(&registry)
        .run(&plan, "research rust and save it to a file")
        .await
        .unwrap();

    assert_eq!(report.state, RunState::Aborted);
    assert_eq!(report.steps[0].state, StepState::Completed);
    assert_eq!(report.steps[1].state, StepState::Failed);
    assert_eq!(report.steps[2].state, StepState::Pending);

    let failure = report.failure.unwrap();
    assert_eq!(failure.step, 2);
    assert_eq!(failure.capability, "write");
    assert!(failure.message.contains("model quota exhausted"));

    // The save step was never attempted.
    assert_eq!(later_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_email_step_skipped_without_recipient() {
    let urls = spawn_fleet().await;
    let mut registry = AgentRegistry::new().unwrap();
    registry.register_many(&urls).await;

    let goal = "analyze the rust ecosystem and email me the result";
    let plan = keyword_plan(goal);
    assert_eq!(plan.skills(), vec!["deep_research", "write", "send_email"]);

    let report = PipelineExecutor::new(&registry)
        .run(&plan, goal)
        .await
        .unwrap();

    assert_eq!(report.state, RunState::Done);
    assert_eq!(report.steps[2].state, StepState::Skipped);
    assert!(report.steps[2].output.is_none());
}

#[tokio::test]
async fn test_email_step_runs_with_recipient() {
    let urls = spawn_fleet().await;
    let mut registry = AgentRegistry::new().unwrap();
    registry.register_many(&urls).await;

    let goal = "analyze the rust ecosystem and email me the result";
    let plan = keyword_plan(goal);

    let options = ReportOptions {
        recipient: Some("ops@example.com".to_string()),
        ..ReportOptions::default()
    };
    let report = PipelineExecutor::new(&registry)
        .with_options(options)
        .run(&plan, goal)
        .await
        .unwrap();

    assert_eq!(report.state, RunState::Done);
    let email = report.steps[2].output.as_ref().unwrap();
    assert_eq!(email["status"], json!("success"));
    assert_eq!(email["to"], json!("ops@example.com"));
}

#[tokio::test]
async fn test_specialist_preferred_end_to_end() {
    // A generalist and a specialist both provide quality_review; the run
    // uses the specialist for it.
    let generalist = {
        let mut b = Agent::builder("generalist", "Generalist", "Does a bit of everything");
        b = text_capability(b, "write", "Write a draft", "gen-draft", "bullets");
        b = text_capability(b, "quality_review", "Review a draft", "gen-review", "draft");
        text_capability(b, "deep_research", "Research a topic", "gen-findings", "query").build()
    };
    let specialist = text_capability(
        Agent::builder("specialist", "Specialist Reviewer", "Only reviews"),
        "quality_review",
        "Review a draft",
        "niche-review",
        "draft",
    )
    .build();

    let mut urls = Vec::new();
    for agent in [generalist, specialist] {
        urls.push(spawn(agent).await);
    }
    let mut registry = AgentRegistry::new().unwrap();
    registry.register_many(&urls).await;

    let plan = keyword_plan("please review this draft");
    let report = PipelineExecutor::new(&registry)
        .run(&plan, "please review this draft")
        .await
        .unwrap();

    assert_eq!(report.state, RunState::Done);
    assert_eq!(report.steps[0].agent_name, "Specialist Reviewer");
}

#[tokio::test]
async fn test_reregistration_keeps_single_record() {
    let urls = spawn_fleet().await;
    let mut registry = AgentRegistry::new().unwrap();
    registry.register_many(&urls).await;
    assert_eq!(registry.len(), 4);

    // Registering the same fleet again must not duplicate records or
    // change selection.
    registry.register_many(&urls).await;
    assert_eq!(registry.len(), 4);

    let goal = "the history of the espresso machine";
    let report = PipelineExecutor::new(&registry)
        .run(&keyword_plan(goal), goal)
        .await
        .unwrap();
    assert_eq!(report.state, RunState::Done);
}
