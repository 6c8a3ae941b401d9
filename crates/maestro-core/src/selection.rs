//! Capability-based agent selection
//!
//! For each required capability, the orchestrator picks one provider with a
//! greedy score: prefer the agent covering the most of the full required
//! set, break ties toward the agent with the fewest total capabilities (the
//! specialist), then toward earlier registration. Favoring coverage tends
//! to reuse one generalist across several steps, but the score is local per
//! capability and never computes a globally optimal assignment.

use crate::registry::AgentRecord;
use std::collections::HashMap;
use tracing::debug;

/// How many of the required capabilities an agent covers.
fn coverage(agent: &AgentRecord, required: &[String]) -> usize {
    required
        .iter()
        .filter(|cap| agent.has_capability(cap))
        .count()
}

/// Pick the best provider for `capability` among `agents`, scoring against
/// the full `required` set. Returns `None` when no agent advertises the
/// capability.
///
/// Deterministic: score is (coverage desc, total capabilities asc,
/// registration order asc), and `agents` is iterated in registration order.
#[must_use]
pub fn select_best<'a>(
    agents: &'a [AgentRecord],
    capability: &str,
    required: &[String],
) -> Option<&'a AgentRecord> {
    agents
        .iter()
        .filter(|a| a.has_capability(capability))
        .enumerate()
        .min_by_key(|(index, a)| {
            (
                std::cmp::Reverse(coverage(a, required)),
                a.capabilities.len(),
                *index,
            )
        })
        .map(|(_, a)| a)
}

/// The capability-to-provider assignment for one pipeline run.
#[derive(Debug, Default)]
pub struct SelectionMap<'a> {
    assignments: HashMap<String, &'a AgentRecord>,
}

impl<'a> SelectionMap<'a> {
    /// The provider assigned to a capability, if any.
    #[must_use]
    pub fn provider(&self, capability: &str) -> Option<&'a AgentRecord> {
        self.assignments.get(capability).copied()
    }

    /// Required capabilities with no assigned provider, in `required` order.
    #[must_use]
    pub fn missing(&self, required: &[String]) -> Vec<String> {
        required
            .iter()
            .filter(|cap| !self.assignments.contains_key(*cap))
            .cloned()
            .collect()
    }

    /// Number of assigned capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether nothing was assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Assign a provider to every coverable capability in `required`.
/// Uncoverable capabilities are simply absent from the map; callers gate on
/// [`SelectionMap::missing`] before executing anything.
#[must_use]
pub fn build_selection_map<'a>(
    agents: &'a [AgentRecord],
    required: &[String],
) -> SelectionMap<'a> {
    let mut assignments = HashMap::new();
    for capability in required {
        if let Some(agent) = select_best(agents, capability, required) {
            debug!(capability = %capability, agent = %agent.name, "Selected provider");
            assignments.insert(capability.clone(), agent);
        } else {
            debug!(capability = %capability, "No provider advertises capability");
        }
    }
    SelectionMap { assignments }
}
