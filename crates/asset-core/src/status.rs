//! Status state machine
//!
//! Statuses are not restricted: any value may follow any other. The machine
//! only maps a status to a display [`Treatment`] and to a [`SideEffect`].
//! Treatment is a pure function of the status and is re-derived wherever a
//! row is materialized.

use crate::error::RecordError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Record status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    /// Freshly submitted; pinned to the top of the table
    #[default]
    New,
    /// Work started
    InProgress,
    /// Waiting on client sign-off
    AwaitingApproval,
    /// Signed off
    Approved,
    /// At the printer
    InProduction,
    /// On site
    Delivered,
    /// Paused
    OnHold,
    /// Needs someone to look at it; triggers a notification
    RequiresAttention,
    /// Any other value typed into the sheet
    Custom(String),
}

impl Status {
    /// Built-in statuses, in workflow order
    pub const KNOWN: [Status; 8] = [
        Status::New,
        Status::InProgress,
        Status::AwaitingApproval,
        Status::Approved,
        Status::InProduction,
        Status::Delivered,
        Status::OnHold,
        Status::RequiresAttention,
    ];

    /// Parse a cell value. Unknown values are kept verbatim as [`Status::Custom`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let key: String = value
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "" | "new" => Status::New,
            "inprogress" => Status::InProgress,
            "awaitingapproval" => Status::AwaitingApproval,
            "approved" => Status::Approved,
            "inproduction" => Status::InProduction,
            "delivered" => Status::Delivered,
            "onhold" => Status::OnHold,
            "requiresattention" => Status::RequiresAttention,
            _ => Status::Custom(value.trim().to_string()),
        }
    }

    /// Sheet label
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Status::New => "New",
            Status::InProgress => "In Progress",
            Status::AwaitingApproval => "Awaiting Approval",
            Status::Approved => "Approved",
            Status::InProduction => "In Production",
            Status::Delivered => "Delivered",
            Status::OnHold => "On Hold",
            Status::RequiresAttention => "Requires Attention",
            Status::Custom(s) => s,
        }
    }

    /// Member of the pinned group
    #[inline]
    #[must_use]
    pub fn is_new(&self) -> bool {
        matches!(self, Status::New)
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        Status::parse(&value)
    }
}

impl From<Status> for String {
    fn from(value: Status) -> Self {
        value.label().to_string()
    }
}

/// Highlight slot; the palette maps slots to colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Highlight {
    /// New rows
    A,
    /// Rows requiring attention
    B,
    /// Delivered rows
    C,
    /// Rows on hold
    D,
}

/// How a row is painted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Treatment {
    /// Default background
    Plain,
    /// Highlighted background
    Highlight(Highlight),
}

/// Side effect of entering a status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideEffect {
    /// Nothing to do
    None,
    /// Collect a comment and send an attention notification
    NotifyAttention,
}

/// Result of evaluating a status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Treatment for the new status
    pub treatment: Treatment,
    /// Effect to run after the change is committed
    pub effect: SideEffect,
}

/// Maps statuses to treatments and side effects
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusStateMachine;

impl StatusStateMachine {
    /// Create the machine
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Display treatment for a status
    #[must_use]
    pub fn treatment(status: &Status) -> Treatment {
        match status {
            Status::New => Treatment::Highlight(Highlight::A),
            Status::RequiresAttention => Treatment::Highlight(Highlight::B),
            Status::Delivered => Treatment::Highlight(Highlight::C),
            Status::OnHold => Treatment::Highlight(Highlight::D),
            _ => Treatment::Plain,
        }
    }

    /// Side effect attached to a status
    #[must_use]
    pub fn side_effect(status: &Status) -> SideEffect {
        match status {
            Status::RequiresAttention => SideEffect::NotifyAttention,
            _ => SideEffect::None,
        }
    }

    /// Evaluate moving from `from` (absent for a new record) to `to`.
    ///
    /// Every move is permitted. The effect fires only when the status is
    /// entered, not when a row already in that status is saved again.
    #[must_use]
    pub fn transition(&self, from: Option<&Status>, to: &Status) -> Transition {
        let effect = if from == Some(to) {
            SideEffect::None
        } else {
            Self::side_effect(to)
        };
        Transition {
            treatment: Self::treatment(to),
            effect,
        }
    }
}

/// Non-empty comment attached to an attention notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttentionComment(String);

impl AttentionComment {
    /// Validate a comment
    ///
    /// # Errors
    /// `RecordError::EmptyComment` if the comment is blank
    pub fn new(text: impl Into<String>) -> Result<Self, RecordError> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(RecordError::EmptyComment);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Comment text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AttentionComment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_labels_leniently() {
        assert_eq!(Status::parse("In Progress"), Status::InProgress);
        assert_eq!(Status::parse("InProgress"), Status::InProgress);
        assert_eq!(Status::parse("requires attention"), Status::RequiresAttention);
        assert_eq!(Status::parse(""), Status::New);
    }

    #[test]
    fn custom_status_kept_verbatim() {
        let status = Status::parse("  Waiting on vendor ");
        assert_eq!(status, Status::Custom("Waiting on vendor".to_string()));
        assert_eq!(status.label(), "Waiting on vendor");
        assert_eq!(StatusStateMachine::treatment(&status), Treatment::Plain);
    }

    #[test]
    fn label_parse_roundtrip_for_known() {
        for status in Status::KNOWN {
            assert_eq!(Status::parse(status.label()), status);
        }
    }

    #[test]
    fn treatment_table() {
        use Highlight::*;
        assert_eq!(StatusStateMachine::treatment(&Status::New), Treatment::Highlight(A));
        assert_eq!(
            StatusStateMachine::treatment(&Status::RequiresAttention),
            Treatment::Highlight(B)
        );
        assert_eq!(StatusStateMachine::treatment(&Status::Delivered), Treatment::Highlight(C));
        assert_eq!(StatusStateMachine::treatment(&Status::OnHold), Treatment::Highlight(D));
        assert_eq!(StatusStateMachine::treatment(&Status::Approved), Treatment::Plain);
    }

    #[test]
    fn attention_effect_only_on_entry() {
        let machine = StatusStateMachine::new();
        let entering = machine.transition(Some(&Status::InProgress), &Status::RequiresAttention);
        assert_eq!(entering.effect, SideEffect::NotifyAttention);

        let staying =
            machine.transition(Some(&Status::RequiresAttention), &Status::RequiresAttention);
        assert_eq!(staying.effect, SideEffect::None);
        assert_eq!(staying.treatment, Treatment::Highlight(Highlight::B));

        let leaving = machine.transition(Some(&Status::RequiresAttention), &Status::Delivered);
        assert_eq!(leaving.effect, SideEffect::None);
    }

    #[test]
    fn any_transition_is_permitted() {
        let machine = StatusStateMachine::new();
        for from in Status::KNOWN {
            for to in Status::KNOWN {
                let t = machine.transition(Some(&from), &to);
                assert_eq!(t.treatment, StatusStateMachine::treatment(&to));
            }
        }
    }

    #[test]
    fn comment_must_not_be_blank() {
        assert_eq!(AttentionComment::new("   "), Err(RecordError::EmptyComment));
        assert_eq!(AttentionComment::new(" check alignment ").unwrap().as_str(), "check alignment");
    }

    #[test]
    fn status_serializes_as_label() {
        let json = serde_json::to_string(&Status::OnHold).unwrap();
        assert_eq!(json, "\"On Hold\"");
        let back: Status = serde_json::from_str("\"Requires Attention\"").unwrap();
        assert_eq!(back, Status::RequiresAttention);
    }
}
