use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{
    answer::Answer,
    puzzle::{Priority, Puzzle},
    status::{Status, Transition},
};
use crate::dto::format_timestamp;

/// Placeholder substituted for spoilery fields when the viewer is unspoiled.
pub const SPOILER_HIDDEN: &str = "[spoiler hidden]";

/// Request body for creating a puzzle. The acting user becomes the lead
/// author.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePuzzleRequest {
    /// Real title (spoilery).
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    /// Spoiler-free codename; generated when omitted.
    #[serde(default)]
    #[validate(length(max = 64))]
    pub codename: Option<String>,
    /// Spoiler-free summary.
    #[serde(default)]
    pub summary: String,
    /// Full description (spoilery).
    #[serde(default)]
    pub description: String,
    /// Editor notes (spoilery).
    #[serde(default)]
    pub notes: String,
    /// Scheduling priority.
    #[serde(default)]
    pub priority: Priority,
}

/// Request body for changing a puzzle's status.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangeStatusRequest {
    /// Two-letter status code from the registry.
    #[validate(length(min = 1, max = 4))]
    pub status: String,
}

/// Request body for spoiling users on a puzzle or round. An empty list
/// spoils the acting user.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SpoilRequest {
    /// Users to spoil; defaults to the actor.
    #[serde(default)]
    pub user_ids: Vec<Uuid>,
}

/// Request body for the privileged unspoil operation.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UnspoilRequest {
    /// User to remove from the spoiled set.
    pub user_id: Uuid,
}

/// Request body for registering a partial-credit answer pattern.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePseudoAnswerRequest {
    /// The pattern text.
    #[validate(length(min = 1, max = 256))]
    pub answer: String,
    /// Canned response shown when a guess matches.
    #[validate(length(min = 1, max = 1024))]
    pub response: String,
    /// Keep casing as-is when matching.
    #[serde(default)]
    pub case_sensitive: bool,
    /// Keep whitespace when matching.
    #[serde(default)]
    pub whitespace_sensitive: bool,
    /// Keep punctuation when matching.
    #[serde(default)]
    pub special_sensitive: bool,
}

/// One registry entry in the `/statuses` listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusView {
    /// Two-letter code.
    pub code: String,
    /// Human-readable label.
    pub display: String,
    /// Status emoji.
    pub emoji: String,
    /// Who the puzzle is waiting on.
    pub blockers: Vec<String>,
    /// Whether the status sits after testsolving.
    pub past_testsolving: bool,
}

impl From<Status> for StatusView {
    fn from(status: Status) -> Self {
        Self {
            code: status.code().to_owned(),
            display: status.display().to_owned(),
            emoji: status.emoji().to_owned(),
            blockers: status
                .blockers()
                .into_iter()
                .map(|b| b.display().to_owned())
                .collect(),
            past_testsolving: status.past_testsolving(),
        }
    }
}

/// One advisory transition in the `/puzzles/{id}/transitions` listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransitionView {
    /// Target status code.
    pub status: String,
    /// Target status label.
    pub display: String,
    /// Button-length description of the step.
    pub description: String,
}

impl From<Transition> for TransitionView {
    fn from(transition: Transition) -> Self {
        Self {
            status: transition.target.code().to_owned(),
            display: transition.target.display().to_owned(),
            description: transition.description.to_owned(),
        }
    }
}

/// A puzzle as returned by the API, redacted for unspoiled viewers.
#[derive(Debug, Serialize, ToSchema)]
pub struct PuzzleView {
    /// Puzzle id.
    pub id: Uuid,
    /// Real title, or the codename handle when redacted.
    pub title: String,
    /// Spoiler-free codename.
    pub codename: String,
    /// Current status code.
    pub status: String,
    /// Current status label.
    pub status_display: String,
    /// Current status emoji.
    pub status_emoji: String,
    /// When the status last changed, RFC 3339.
    pub status_mtime: String,
    /// When anything last changed, RFC 3339.
    pub last_updated: String,
    /// Spoiler-free summary, always visible.
    pub summary: String,
    /// Full description, redacted for unspoiled viewers.
    pub description: String,
    /// Editor notes, redacted for unspoiled viewers.
    pub notes: String,
    /// Assigned answers, redacted for unspoiled viewers.
    pub answers: Vec<String>,
    /// Author ids.
    pub authors: Vec<Uuid>,
    /// Editor ids.
    pub editors: Vec<Uuid>,
    /// Postprodder ids.
    pub postprodders: Vec<Uuid>,
    /// Factchecker ids.
    pub factcheckers: Vec<Uuid>,
    /// Scheduling priority.
    pub priority: Priority,
    /// Whether the requesting viewer is spoiled.
    pub spoiled: bool,
}

impl PuzzleView {
    /// Build a view of a puzzle for a viewer, substituting the codename
    /// handle and spoiler placeholders when the viewer is unspoiled.
    pub fn build(puzzle: &Puzzle, answers: &[Answer], viewer_spoiled: bool) -> Self {
        let (title, description, notes, answers) = if viewer_spoiled {
            (
                puzzle.spoilery_title().to_owned(),
                puzzle.description.clone(),
                puzzle.notes.clone(),
                answers.iter().map(|a| a.text.clone()).collect(),
            )
        } else {
            (
                puzzle.spoiler_free_title(),
                SPOILER_HIDDEN.to_owned(),
                SPOILER_HIDDEN.to_owned(),
                answers.iter().map(|_| SPOILER_HIDDEN.to_owned()).collect(),
            )
        };
        Self {
            id: puzzle.id,
            title,
            codename: puzzle.codename.clone(),
            status: puzzle.status.code().to_owned(),
            status_display: puzzle.status.display().to_owned(),
            status_emoji: puzzle.status.emoji().to_owned(),
            status_mtime: format_timestamp(puzzle.status_mtime),
            last_updated: format_timestamp(puzzle.last_updated),
            summary: puzzle.summary.clone(),
            description,
            notes,
            answers,
            authors: puzzle.authors.clone(),
            editors: puzzle.editors.clone(),
            postprodders: puzzle.postprodders.clone(),
            factcheckers: puzzle.factcheckers.clone(),
            priority: puzzle.priority,
            spoiled: viewer_spoiled,
        }
    }
}
