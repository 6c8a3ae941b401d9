//! Reporter agent: persists final content and delivers it.
//!
//! Delivery writes the message to a local outbox directory rather than
//! talking to a mail server, which keeps the demo self-contained. The
//! outbox file carries the recipient, subject, and body, so a real mailer
//! can be pointed at it later.

use super::{required_str, str_or};
use maestro_core::{Agent, Error};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

fn timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

fn render_markdown(title: &str, content: &str) -> String {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("# {title}\n\n{content}\n\n---\n*Generated by Maestro Multi-Agent System*  \n*{now}*\n")
}

fn render_html(title: &str, content: &str) -> String {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{ font-family: 'Segoe UI', Arial, sans-serif; max-width: 800px; margin: 50px auto; padding: 20px; line-height: 1.8; }}
        h1 {{ color: #2c3e50; border-bottom: 3px solid #3498db; padding-bottom: 10px; }}
        .content {{ color: #333; white-space: pre-wrap; }}
        .footer {{ margin-top: 40px; padding-top: 20px; border-top: 1px solid #eee; color: #7f8c8d; font-size: 0.9em; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    <div class="content">{content}</div>
    <div class="footer">Generated by Maestro Multi-Agent System | {now}</div>
</body>
</html>
"#
    )
}

fn save_to_file(output_dir: &Path, params: &Value) -> maestro_core::Result<Value> {
    let content = required_str(params, "content")?;
    let title = str_or(params, "title", "report");
    let format = str_or(params, "format", "markdown");

    let stamp = timestamp();
    let (filename, body) = if format == "html" {
        (format!("{title}_{stamp}.html"), render_html(title, content))
    } else {
        (format!("{title}_{stamp}.md"), render_markdown(title, content))
    };

    let path = output_dir.join(&filename);
    std::fs::create_dir_all(output_dir)
        .and_then(|()| std::fs::write(&path, &body))
        .map_err(|e| Error::Capability(format!("failed to write {}: {e}", path.display())))?;

    Ok(json!({
        "status": "success",
        "filename": path.display().to_string(),
        "format": format,
        "size_bytes": content.len(),
        "timestamp": stamp,
    }))
}

fn send_email(output_dir: &Path, params: &Value) -> maestro_core::Result<Value> {
    let content = required_str(params, "content")?;
    let to_email = required_str(params, "to_email")?;
    let subject = str_or(params, "subject", "Maestro Agent Report");

    let outbox = output_dir.join("outbox");
    let path = outbox.join(format!("email_{}.txt", timestamp()));
    let message = format!("To: {to_email}\nSubject: {subject}\n\n{content}\n");
    std::fs::create_dir_all(&outbox)
        .and_then(|()| std::fs::write(&path, &message))
        .map_err(|e| Error::Capability(format!("failed to write {}: {e}", path.display())))?;

    Ok(json!({
        "status": "success",
        "to": to_email,
        "subject": subject,
        "outbox_file": path.display().to_string(),
    }))
}

/// Build the reporter agent. Files and outbox messages land under
/// `output_dir`.
pub fn reporter_agent(output_dir: PathBuf) -> Agent {
    let save_dir = output_dir.clone();
    Agent::builder(
        "reporter",
        "Reporter Agent",
        "Saves final content to files and delivers it to recipients",
    )
    .capability(
        "save_to_file",
        "Save final content as a markdown or html file",
        move |params: Value| {
            let dir = save_dir.clone();
            async move { save_to_file(&dir, &params) }
        },
    )
    .capability(
        "send_email",
        "Deliver final content to a recipient",
        move |params: Value| {
            let dir = output_dir.clone();
            async move { send_email(&dir, &params) }
        },
    )
    .build()
}
