//! CLI module for Maestro
//!
//! Commands:
//! - `run`: discover agents, plan a pipeline for a goal, and execute it
//! - `serve`: start the demo agent fleet
//! - `cards`: fetch and print the fleet's agent cards

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod cards;
pub mod run;
pub mod serve;

/// Maestro orchestrator CLI
#[derive(Parser, Debug)]
#[command(name = "maestro")]
#[command(about = "Dynamic multi-agent pipeline orchestrator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plan and run a pipeline for a goal
    Run {
        /// The goal to accomplish
        goal: Option<String>,

        /// Filename stem for saved reports
        #[arg(long, default_value = "maestro_report")]
        title: String,

        /// Saved report format (markdown or html)
        #[arg(long, default_value = "markdown")]
        format: String,

        /// Recipient for email steps (overrides REPORT_RECIPIENT_EMAIL)
        #[arg(long)]
        recipient: Option<String>,

        /// Use the keyword analysis only, never the planning delegate
        #[arg(long)]
        no_delegate: bool,

        /// Agent endpoints to discover (overrides MAESTRO_AGENT_ENDPOINTS)
        #[arg(long = "endpoints", value_delimiter = ',')]
        endpoints: Vec<String>,
    },
    /// Start the demo agent fleet (or a single agent with --mode)
    Serve {
        /// Run only this agent instead of the whole fleet
        #[arg(long, value_enum)]
        mode: Option<AgentMode>,

        /// Port to bind; without --mode the four agents bind consecutive
        /// ports from here (default 9201)
        #[arg(long)]
        port: Option<u16>,

        /// Directory for saved reports and the delivery outbox
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Fetch and print the agent cards of the configured fleet
    Cards {
        /// Agent endpoints to query (overrides MAESTRO_AGENT_ENDPOINTS)
        #[arg(long = "endpoints", value_delimiter = ',')]
        endpoints: Vec<String>,
    },
}

/// Which demo agent to run in single-agent serve mode.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum AgentMode {
    Research,
    Writer,
    Reviewer,
    Reporter,
}

impl AgentMode {
    /// The port this agent conventionally binds in the demo fleet.
    pub fn default_port(self) -> u16 {
        match self {
            Self::Research => 9201,
            Self::Writer => 9202,
            Self::Reviewer => 9203,
            Self::Reporter => 9204,
        }
    }
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Run {
            goal,
            title,
            format,
            recipient,
            no_delegate,
            endpoints,
        }) => run::run(goal, title, format, recipient, no_delegate, endpoints).await,
        Some(Commands::Serve {
            mode,
            port,
            output_dir,
        }) => serve::run(mode, port, output_dir).await,
        Some(Commands::Cards { endpoints }) => cards::run(endpoints).await,
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}
