//! The `serve` command: run the demo agents.
//!
//! Without `--mode` the whole four-agent fleet binds consecutive ports;
//! with `--mode` a single agent binds its conventional port (or `--port`).

use crate::agents::{reporter_agent, research_agent, reviewer_agent, writer_agent};
use crate::cli::AgentMode;
use anyhow::Context;
use maestro_core::agent::Agent;
use maestro_core::server::AgentServer;
use maestro_llm::gemini::GeminiClient;
use maestro_llm::TextGenerator;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

const FLEET_BASE_PORT: u16 = 9201;

const FLEET_MODES: [AgentMode; 4] = [
    AgentMode::Research,
    AgentMode::Writer,
    AgentMode::Reviewer,
    AgentMode::Reporter,
];

/// Assign consecutive ports from `base` to the fleet agents. Fails when the
/// base leaves too little room below the top of the port range.
fn fleet_assignments(base: u16) -> anyhow::Result<Vec<(AgentMode, u16)>> {
    FLEET_MODES
        .into_iter()
        .enumerate()
        .map(|(offset, mode)| {
            let port = base.checked_add(offset as u16).with_context(|| {
                format!(
                    "base port {base} leaves no room for {} consecutive agent ports",
                    FLEET_MODES.len()
                )
            })?;
            Ok((mode, port))
        })
        .collect()
}

fn build_agent(mode: AgentMode, llm: &Arc<dyn TextGenerator>, output_dir: &PathBuf) -> Agent {
    match mode {
        AgentMode::Research => research_agent(llm.clone()),
        AgentMode::Writer => writer_agent(llm.clone()),
        AgentMode::Reviewer => reviewer_agent(llm.clone()),
        AgentMode::Reporter => reporter_agent(output_dir.clone()),
    }
}

pub async fn run(
    mode: Option<AgentMode>,
    port: Option<u16>,
    output_dir: PathBuf,
) -> anyhow::Result<()> {
    let client = GeminiClient::from_env()
        .context("the demo fleet needs a text-generation backend; set GEMINI_API_KEY")?;
    info!(model = %client.model(), "Text-generation backend ready");
    let llm: Arc<dyn TextGenerator> = Arc::new(client);

    let assignments: Vec<(AgentMode, u16)> = match mode {
        Some(mode) => vec![(mode, port.unwrap_or_else(|| mode.default_port()))],
        None => fleet_assignments(port.unwrap_or(FLEET_BASE_PORT))?,
    };

    for (mode, port) in assignments {
        let agent = build_agent(mode, &llm, &output_dir);
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let server = AgentServer::bind(Arc::new(agent), addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!(url = %server.url(), "Agent up");
        tokio::spawn(server.serve());
    }

    info!("Agents are running; press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fleet_ports_are_consecutive() {
        let assignments = fleet_assignments(FLEET_BASE_PORT).unwrap();
        let ports: Vec<u16> = assignments.iter().map(|(_, port)| *port).collect();
        assert_eq!(ports, vec![9201, 9202, 9203, 9204]);
    }

    #[test]
    fn test_fleet_ports_reject_base_near_range_top() {
        let err = fleet_assignments(u16::MAX - 1).unwrap_err();
        assert!(err.to_string().contains("leaves no room"));
    }

    #[test]
    fn test_fleet_ports_accept_highest_valid_base() {
        let assignments = fleet_assignments(u16::MAX - 3).unwrap();
        assert_eq!(assignments.last().map(|(_, port)| *port), Some(u16::MAX));
    }
}
