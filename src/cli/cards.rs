//! The `cards` command: dump the fleet's agent cards.

use crate::config::Config;
use maestro_core::registry::AgentRegistry;

pub async fn run(endpoints: Vec<String>) -> anyhow::Result<()> {
    let endpoints = if endpoints.is_empty() {
        Config::from_env().agent_endpoints
    } else {
        endpoints
    };
    let mut registry = AgentRegistry::new()?;
    let records = registry.register_many(&endpoints).await;
    if records.is_empty() {
        anyhow::bail!("no agents could be discovered at {}", endpoints.join(", "));
    }

    for record in records {
        println!("== {} ({}) ==", record.name, record.endpoint);
        println!("{}", serde_json::to_string_pretty(&record.manifest)?);
        println!();
    }
    Ok(())
}
