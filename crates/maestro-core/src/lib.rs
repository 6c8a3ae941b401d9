//! maestro-core: dynamic multi-agent orchestration
//!
//! Agents advertise capabilities through a card at a well-known HTTP path
//! and serve them over JSON-RPC 2.0. The orchestrator discovers agents at
//! runtime, translates a free-form goal into an ordered plan, assigns each
//! required capability to the best-scoring provider, and executes the steps
//! sequentially, threading outputs into later inputs.
//!
//! The moving parts:
//! - [`agent`]: the capability table and its builder
//! - [`server`]: serving an agent over HTTP (card + RPC)
//! - [`registry`]: discovery client and invocation transport
//! - [`planner`]: goal-to-plan translation (delegate + keyword fallback)
//! - [`selection`]: greedy capability-to-provider assignment
//! - [`executor`]: sequential pipeline execution and run reporting

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod agent;
pub mod capability;
pub mod error;
pub mod executor;
pub mod planner;
pub mod protocol;
pub mod registry;
pub mod selection;
pub mod server;

pub use agent::{Agent, AgentBuilder, CapabilityHandler};
pub use error::{Error, Result};
pub use executor::{PipelineExecutor, ReportOptions, RunReport, RunState, StepState};
pub use planner::{keyword_plan, TaskPlan, TaskPlanner};
pub use protocol::{AgentCard, CapabilityDecl, AGENT_CARD_PATH, RPC_PATH};
pub use registry::{AgentRecord, AgentRegistry};
pub use selection::{build_selection_map, select_best, SelectionMap};
pub use server::AgentServer;
