use super::*;
use maestro_llm::TextGenerator;

/// A delegate with a canned reply (or a canned failure).
struct StubDelegate {
    reply: std::result::Result<String, String>,
}

impl StubDelegate {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
        })
    }
}

#[async_trait::async_trait]
impl TextGenerator for StubDelegate {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate(&self, _system: &str, _user: &str) -> maestro_llm::Result<String> {
        self.reply
            .clone()
            .map_err(maestro_llm::Error::InvalidResponse)
    }
}

#[test]
fn test_keyword_review_only() {
    let plan = keyword_plan("please review this draft");
    assert_eq!(plan.task_type, "review_only");
    assert_eq!(plan.skills(), vec!["quality_review"]);

    let plan = keyword_plan("이 글 검토해줘");
    assert_eq!(plan.task_type, "review_only");
}

#[test]
fn test_keyword_review_beats_research() {
    // Review vocabulary takes priority even when research words appear.
    let plan = keyword_plan("review my analysis of rust async research");
    assert_eq!(plan.task_type, "review_only");
}

#[test]
fn test_keyword_write_only() {
    let plan = keyword_plan("summarize this article");
    assert_eq!(plan.task_type, "write_only");
    assert_eq!(plan.skills(), vec!["write"]);

    let plan = keyword_plan("요약해줘");
    assert_eq!(plan.task_type, "write_only");
}

#[test]
fn test_keyword_write_with_research_is_not_write_only() {
    let plan = keyword_plan("research quantum computing and write about it");
    assert_eq!(plan.task_type, "research_and_write");
    assert_eq!(plan.skills(), vec!["deep_research", "write"]);
}

#[test]
fn test_keyword_research_with_email() {
    let plan = keyword_plan("analyze the rust ecosystem and email me the result");
    assert_eq!(plan.task_type, "research_and_write");
    assert_eq!(plan.skills(), vec!["deep_research", "write", "send_email"]);
}

#[test]
fn test_keyword_research_with_file() {
    let plan = keyword_plan("조사해서 파일로 저장해줘");
    assert_eq!(plan.task_type, "research_and_write");
    assert_eq!(plan.skills(), vec!["deep_research", "write", "save_to_file"]);
}

#[test]
fn test_keyword_default_is_full_pipeline() {
    let plan = keyword_plan("the history of the espresso machine");
    assert_eq!(plan.task_type, "full_pipeline");
    assert_eq!(
        plan.skills(),
        vec!["deep_research", "write", "quality_review", "revise", "save_to_file"]
    );
    let steps: Vec<usize> = plan.pipeline.iter().map(|s| s.step).collect();
    assert_eq!(steps, vec![1, 2, 3, 4, 5]);
    assert_eq!(plan.required_skills, plan.skills());
}

#[test]
fn test_parse_plain_json_reply() {
    let reply = r#"{
        "task_type": "research_and_write",
        "required_skills": ["deep_research", "write"],
        "pipeline": [
            {"step": 1, "skill": "deep_research", "description": "Research"},
            {"step": 2, "skill": "write", "description": "Write"}
        ],
        "description": "Research then write"
    }"#;
    let plan = parse_plan_reply(reply).unwrap();
    assert_eq!(plan.task_type, "research_and_write");
    assert_eq!(plan.skills(), vec!["deep_research", "write"]);
}

#[test]
fn test_parse_fenced_reply() {
    let reply = "```json\n{\"task_type\": \"write_only\", \"required_skills\": [], \"pipeline\": [{\"step\": 7, \"skill\": \"write\", \"description\": \"Write\"}], \"description\": \"d\"}\n```";
    let plan = parse_plan_reply(reply).unwrap();
    // Steps are reindexed and required skills rebuilt from the pipeline.
    assert_eq!(plan.pipeline[0].step, 1);
    assert_eq!(plan.required_skills, vec!["write"]);
}

#[test]
fn test_parse_rebuilds_required_skills_without_duplicates() {
    let reply = r#"{
        "task_type": "custom",
        "required_skills": ["bogus"],
        "pipeline": [
            {"step": 1, "skill": "write", "description": "a"},
            {"step": 2, "skill": "quality_review", "description": "b"},
            {"step": 3, "skill": "write", "description": "c"}
        ],
        "description": "d"
    }"#;
    let plan = parse_plan_reply(reply).unwrap();
    assert_eq!(plan.required_skills, vec!["write", "quality_review"]);
}

#[test]
fn test_parse_rejects_empty_pipeline() {
    let reply = r#"{"task_type": "custom", "required_skills": [], "pipeline": [], "description": "d"}"#;
    assert!(matches!(
        parse_plan_reply(reply),
        Err(Error::InvalidPlan(_))
    ));
}

#[tokio::test]
async fn test_delegate_plan_is_used() {
    let delegate = StubDelegate::replying(
        r#"{"task_type": "write_only", "required_skills": ["write"], "pipeline": [{"step": 1, "skill": "write", "description": "Write"}], "description": "d"}"#,
    );
    let planner = TaskPlanner::with_delegate(delegate);
    // Without the delegate this goal would default to the full pipeline.
    let plan = planner.plan("the history of the espresso machine").await;
    assert_eq!(plan.task_type, "write_only");
}

#[tokio::test]
async fn test_delegate_failure_falls_back() {
    let planner = TaskPlanner::with_delegate(StubDelegate::failing("backend down"));
    let plan = planner.plan("summarize this article").await;
    assert_eq!(plan.task_type, "write_only");
}

#[tokio::test]
async fn test_delegate_garbage_falls_back() {
    let planner = TaskPlanner::with_delegate(StubDelegate::replying("I cannot help with that."));
    let plan = planner.plan("review this").await;
    assert_eq!(plan.task_type, "review_only");
}

#[tokio::test]
async fn test_no_delegate_uses_keywords() {
    let planner = TaskPlanner::new();
    let plan = planner.plan("research rust and save it to a file").await;
    assert_eq!(plan.skills(), vec!["deep_research", "write", "save_to_file"]);
}
