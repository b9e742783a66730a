use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::answer::{Answer, Round};
use crate::dto::puzzle::SPOILER_HIDDEN;

/// Request body for creating a round.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoundRequest {
    /// Round name (spoilery).
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Editors assigned to the round.
    #[serde(default)]
    pub editors: Vec<Uuid>,
}

/// Request body for creating an answer inside a round.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAnswerRequest {
    /// The answer text.
    #[validate(length(min = 1, max = 256))]
    pub text: String,
    /// Editor notes.
    #[serde(default)]
    pub notes: String,
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

/// One answer inside a round view.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnswerView {
    /// Answer id.
    pub id: Uuid,
    /// Answer text, redacted for unspoiled viewers.
    pub text: String,
    /// Puzzles the answer is assigned to.
    pub puzzles: Vec<Uuid>,
}

impl AnswerView {
    fn build(answer: &Answer, viewer_spoiled: bool) -> Self {
        Self {
            id: answer.id,
            text: if viewer_spoiled {
                answer.text.clone()
            } else {
                SPOILER_HIDDEN.to_owned()
            },
            puzzles: answer.puzzles.clone(),
        }
    }
}

/// A round as returned by the API, redacted for unspoiled viewers.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoundView {
    /// Round id.
    pub id: Uuid,
    /// Round name, redacted for unspoiled viewers.
    pub name: String,
    /// Description, redacted for unspoiled viewers.
    pub description: String,
    /// Editor ids.
    pub editors: Vec<Uuid>,
    /// Answers in the round.
    pub answers: Vec<AnswerView>,
    /// Whether the requesting viewer is spoiled on the round.
    pub spoiled: bool,
}

impl RoundView {
    /// Build a view of a round for a viewer.
    pub fn build(round: &Round, answers: &[Answer], viewer_spoiled: bool) -> Self {
        Self {
            id: round.id,
            name: if viewer_spoiled {
                round.name.clone()
            } else {
                SPOILER_HIDDEN.to_owned()
            },
            description: if viewer_spoiled {
                round.description.clone()
            } else {
                SPOILER_HIDDEN.to_owned()
            },
            editors: round.editors.clone(),
            answers: answers
                .iter()
                .map(|a| AnswerView::build(a, viewer_spoiled))
                .collect(),
            spoiled: viewer_spoiled,
        }
    }
}
