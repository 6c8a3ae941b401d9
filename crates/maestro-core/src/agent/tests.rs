use super::*;
use serde_json::json;

fn echo_agent() -> Agent {
    Agent::builder("echo", "Echo Agent", "Repeats its input")
        .capability("echo", "Echo the input back", |params: Value| async move {
            Ok(json!({ "echoed": params }))
        })
        .capability("shout", "Echo in upper case", |params: Value| async move {
            let text = params
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default();
            Ok(Value::String(text.to_uppercase()))
        })
        .build()
}

#[test]
fn test_capability_table_is_inspectable() {
    let agent = echo_agent();
    let decls = agent.capabilities();
    assert_eq!(decls.len(), 2);
    // Registration order is preserved
    assert_eq!(decls[0].name, "echo");
    assert_eq!(decls[1].name, "shout");
    assert!(agent.has_capability("echo"));
    assert!(!agent.has_capability("whisper"));
}

#[tokio::test]
async fn test_invoke_dispatches_by_name() {
    let agent = echo_agent();
    let result = agent
        .invoke("shout", json!({ "text": "quiet" }))
        .await
        .unwrap();
    assert_eq!(result, json!("QUIET"));
}

#[tokio::test]
async fn test_invoke_unknown_capability() {
    let agent = echo_agent();
    let err = agent.invoke("whisper", json!({})).await.unwrap_err();
    assert!(matches!(err, Error::CapabilityNotFound(name) if name == "whisper"));
}

#[test]
fn test_card_advertises_skills() {
    let agent = echo_agent();
    let card = agent.parsed_card("http://localhost:9000").unwrap();
    assert_eq!(card.name, "Echo Agent");
    assert_eq!(card.url, "http://localhost:9000");
    assert_eq!(card.capabilities.len(), 2);
    assert_eq!(card.capabilities[0].name, "echo");
    assert_eq!(card.capabilities[0].description, "Echo the input back");
}
