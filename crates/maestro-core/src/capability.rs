//! Shared capability vocabulary
//!
//! Well-known capability names, the pipeline role each output plays, and a
//! classifier that maps arbitrary advertised names onto the kinds the
//! executor knows how to wire.

/// Research a topic and return findings.
pub const DEEP_RESEARCH: &str = "deep_research";
/// Write a draft from bullets or findings.
pub const WRITE: &str = "write";
/// Review a draft and return feedback.
pub const QUALITY_REVIEW: &str = "quality_review";
/// Revise a draft according to feedback.
pub const REVISE: &str = "revise";
/// Persist content to a file.
pub const SAVE_TO_FILE: &str = "save_to_file";
/// Deliver content to a recipient.
pub const SEND_EMAIL: &str = "send_email";

/// The kind of work a capability performs, as far as pipeline wiring is
/// concerned. Unrecognized capabilities are [`CapabilityKind::Other`] and
/// receive the goal plus accumulated context as generic parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityKind {
    /// Gathers information about the goal
    Research,
    /// Produces a draft from findings or bullets
    Write,
    /// Evaluates a draft and produces feedback
    Review,
    /// Rewrites a draft according to feedback
    Revise,
    /// Persists content to a file
    Save,
    /// Delivers content to a recipient
    Email,
    /// Anything the wiring rules do not know
    Other,
}

impl CapabilityKind {
    /// Classify a capability name. Exact well-known names first, then a
    /// substring fallback so close variants (`web_research`,
    /// `review_draft`) wire the same way.
    ///
    /// `revise` is checked before `review` in the fallback: both contain
    /// `revi`, and a name matching `revise` exactly must never be wired as
    /// a review step.
    #[must_use]
    pub fn classify(name: &str) -> Self {
        match name {
            DEEP_RESEARCH => return Self::Research,
            WRITE => return Self::Write,
            QUALITY_REVIEW => return Self::Review,
            REVISE => return Self::Revise,
            SAVE_TO_FILE => return Self::Save,
            SEND_EMAIL => return Self::Email,
            _ => {}
        }

        let lower = name.to_lowercase();
        if lower.contains("research") || lower.contains("analyze") {
            Self::Research
        } else if lower.contains("revise") {
            Self::Revise
        } else if lower.contains("review") || lower.contains("feedback") {
            Self::Review
        } else if lower.contains("write") || lower.contains("summar") {
            Self::Write
        } else if lower.contains("email") || lower.contains("mail") || lower.contains("send") {
            Self::Email
        } else if lower.contains("save") || lower.contains("file") {
            Self::Save
        } else {
            Self::Other
        }
    }
}

/// The slot a step's output occupies in the shared result context. Later
/// steps read earlier slots by role, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Research findings
    Research,
    /// The written draft
    Draft,
    /// Review feedback
    Review,
    /// The revised draft
    Revision,
    /// A terminal artifact (file path, delivery receipt)
    Artifact,
}

impl CapabilityKind {
    /// The context slot this kind of step writes.
    #[must_use]
    pub fn output_role(self) -> Role {
        match self {
            Self::Research => Role::Research,
            Self::Write => Role::Draft,
            Self::Review => Role::Review,
            Self::Revise => Role::Revision,
            Self::Save | Self::Email | Self::Other => Role::Artifact,
        }
    }
}
