use serde::Serialize;
use std::collections::BTreeMap;
use strum_macros::Display;

/// Slot id -> label currently shown in that slot.
pub type Placements = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SessionId(pub u64);

/// One draggable instance of a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: String,
    pub label: String,
    /// Penalty duplicate created by a wrong move; worth fewer points.
    pub is_clone: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SlotStatus {
    #[default]
    Neutral,
    Correct,
    Wrong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Active,
    SettlePending,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum IgnoreReason {
    SessionCompleted,
    UnknownSlot,
    SpacerSlot,
    SlotOccupied,
    UnknownToken,
    NoSelection,
    OutsideQuestion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum RejectReason {
    LabelNotAccepted,
    DuplicateInGroup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// Precondition failed; nothing changed.
    Ignored(IgnoreReason),
    Accepted {
        label: String,
        points: u32,
        excess: bool,
    },
    Rejected {
        reason: RejectReason,
        clones: usize,
    },
}

impl PlacementOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }
}

/// Effects of scheduled tasks that passed their precondition check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    WrongReverted { slot: String },
    ExcessCleared { slot: String },
    SettleStarted,
    Completed,
}

/// Proof that a session completed. Issued once; consumed by the reporter.
#[derive(Debug, PartialEq, Eq)]
pub struct CompletionToken {
    pub session: SessionId,
    pub level_index: usize,
    pub score: u32,
    pub elapsed_secs: u64,
}

impl CompletionToken {
    /// 1-based level number as shown to learners.
    pub fn level_number(&self) -> usize {
        self.level_index + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionProgress {
    /// 0-based position in the shuffled queue.
    pub position: usize,
    pub total: usize,
    /// Row of the level structure being asked.
    pub row: usize,
    pub ready_for_next: bool,
}

/// Everything a renderer needs. Building it never mutates the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub level_index: usize,
    pub phase: Phase,
    pub score: u32,
    pub mistakes: u32,
    pub placements: Placements,
    pub statuses: BTreeMap<String, SlotStatus>,
    pub pool: Vec<Token>,
    pub selected: Option<String>,
    pub question: Option<QuestionProgress>,
}
