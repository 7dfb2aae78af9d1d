//! Upload state machine.
//!
//! ```text
//! Received -> Parsing -> Validating -> Publishing -> Attaching -> Succeeded
//!                |            |             |            |
//!                +------------+             |            |
//!                      v                    v            v
//!            RejectedValidation      RejectedPublish  RejectedAttach
//! ```
//!
//! Every terminal state is final; nothing is retried.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadState {
    Received,
    Parsing,
    Validating,
    Publishing,
    Attaching,
    Succeeded,
    RejectedValidation,
    RejectedPublish,
    RejectedAttach,
}

impl UploadState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Parsing => "parsing",
            Self::Validating => "validating",
            Self::Publishing => "publishing",
            Self::Attaching => "attaching",
            Self::Succeeded => "succeeded",
            Self::RejectedValidation => "rejected_validation",
            Self::RejectedPublish => "rejected_publish",
            Self::RejectedAttach => "rejected_attach",
        }
    }

    pub fn valid_transitions(self) -> &'static [UploadState] {
        use UploadState::*;
        match self {
            Received => &[Parsing],
            // Size caps are enforced while the body streams in.
            Parsing => &[Validating, RejectedValidation],
            Validating => &[Publishing, RejectedValidation],
            Publishing => &[Attaching, RejectedPublish],
            Attaching => &[Succeeded, RejectedAttach],
            Succeeded | RejectedValidation | RejectedPublish | RejectedAttach => &[],
        }
    }

    pub fn can_transition(self, to: UploadState) -> bool {
        self.valid_transitions().contains(&to)
    }

    pub fn is_terminal(self) -> bool {
        self.valid_transitions().is_empty()
    }

    /// The rejection state reached by failing while in `self`.
    pub fn rejection(self) -> UploadState {
        match self {
            Self::Publishing => Self::RejectedPublish,
            Self::Attaching => Self::RejectedAttach,
            _ => Self::RejectedValidation,
        }
    }
}

impl std::fmt::Display for UploadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Transition {
    pub state: UploadState,
    pub at: DateTime<Utc>,
}

/// Ordered record of the states one upload went through.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct StateTrail {
    steps: Vec<Transition>,
}

impl StateTrail {
    /// A trail starting in `Received`.
    pub fn new() -> Self {
        Self {
            steps: vec![Transition {
                state: UploadState::Received,
                at: Utc::now(),
            }],
        }
    }

    pub fn current(&self) -> UploadState {
        self.steps
            .last()
            .map_or(UploadState::Received, |step| step.state)
    }

    /// Move to `to`. Illegal moves are ignored and logged; the trail only
    /// ever holds legal sequences.
    pub fn advance(&mut self, to: UploadState) {
        let from = self.current();
        if !from.can_transition(to) {
            tracing::warn!(from = %from, to = %to, "Ignoring invalid upload transition");
            return;
        }
        tracing::debug!(from = %from, state = %to, "Upload state changed");
        self.steps.push(Transition { state: to, at: Utc::now() });
    }

    /// Move to the rejection state matching the current state.
    pub fn reject(&mut self) -> UploadState {
        let terminal = self.current().rejection();
        self.advance(terminal);
        terminal
    }

    pub fn states(&self) -> Vec<UploadState> {
        self.steps.iter().map(|step| step.state).collect()
    }

    pub fn steps(&self) -> &[Transition] {
        &self.steps
    }
}

impl Default for StateTrail {
    fn default() -> Self {
        Self::new()
    }
}
