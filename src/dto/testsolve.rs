use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::testsolve::{Guess, Participation, TestsolveSession, Verdict};
use crate::dto::format_timestamp;

/// Request body for starting a testsolve session.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StartSessionRequest {
    /// Puzzle to testsolve.
    pub puzzle_id: Uuid,
}

/// Request body for submitting a guess.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GuessRequest {
    /// The guess text.
    #[validate(length(min = 1, max = 512))]
    pub guess: String,
}

/// Request body for finishing a session: ratings plus free-text feedback.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct FinishRequest {
    /// Fun rating, 0 to 6.
    #[serde(default)]
    #[validate(range(min = 0, max = 6))]
    pub fun_rating: Option<u8>,
    /// Difficulty rating, 0 to 6.
    #[serde(default)]
    #[validate(range(min = 0, max = 6))]
    pub difficulty_rating: Option<u8>,
    /// Hours spent solving.
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub hours_spent: Option<f64>,
    /// General feedback on the puzzle.
    #[serde(default)]
    pub general_feedback: String,
    /// Anything else.
    #[serde(default)]
    pub misc_feedback: String,
}

/// One recorded guess in a session view.
#[derive(Debug, Serialize, ToSchema)]
pub struct GuessView {
    /// Who guessed.
    pub user_id: Uuid,
    /// The raw guess text.
    pub text: String,
    /// When the guess was made, RFC 3339.
    pub date: String,
    /// How it was classified.
    pub verdict: Verdict,
    /// Canned response if a partial pattern matched.
    pub partial_response: Option<String>,
}

impl From<&Guess> for GuessView {
    fn from(guess: &Guess) -> Self {
        Self {
            user_id: guess.user_id,
            text: guess.text.clone(),
            date: format_timestamp(guess.date),
            verdict: guess.verdict,
            partial_response: guess.partial_response.clone(),
        }
    }
}

/// One participant in a session view.
#[derive(Debug, Serialize, ToSchema)]
pub struct ParticipationView {
    /// The participant.
    pub user_id: Uuid,
    /// When they joined, RFC 3339.
    pub started: String,
    /// When they finished, RFC 3339, if they have.
    pub ended: Option<String>,
    /// Fun rating, 0 to 6.
    pub fun_rating: Option<u8>,
    /// Difficulty rating, 0 to 6.
    pub difficulty_rating: Option<u8>,
    /// Hours spent solving.
    pub hours_spent: Option<f64>,
    /// Number of feedback submissions.
    pub feedback_entries: usize,
}

impl From<&Participation> for ParticipationView {
    fn from(p: &Participation) -> Self {
        Self {
            user_id: p.user_id,
            started: format_timestamp(p.started),
            ended: p.ended.map(format_timestamp),
            fun_rating: p.fun_rating,
            difficulty_rating: p.difficulty_rating,
            hours_spent: p.hours_spent,
            feedback_entries: p.feedback.len(),
        }
    }
}

/// A testsolve session as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionView {
    /// Session id.
    pub id: Uuid,
    /// Puzzle under test.
    pub puzzle_id: Uuid,
    /// Handle for the puzzle, redacted for unspoiled viewers.
    pub puzzle_title: String,
    /// When the session started, RFC 3339.
    pub started: String,
    /// When the session was closed, RFC 3339, if it has been.
    pub ended: Option<String>,
    /// Whether the session is advertised for others to join.
    pub joinable: bool,
    /// Started on a puzzle already past testsolving.
    pub late_testsolve: bool,
    /// Whether any guess was correct.
    pub solved: bool,
    /// Open, unsolved, and idle past the configured threshold.
    pub stale: bool,
    /// False when the puzzle has no assigned answers, so no guess can
    /// ever be correct.
    pub answers_exist: bool,
    /// Solvers in the session.
    pub participants: Vec<ParticipationView>,
    /// Guesses in submission order.
    pub guesses: Vec<GuessView>,
    /// Average fun rating across participants who rated.
    pub average_fun: Option<f64>,
    /// Average difficulty rating across participants who rated.
    pub average_difficulty: Option<f64>,
    /// Average hours spent across participants who reported.
    pub average_hours: Option<f64>,
}

impl SessionView {
    /// Build a view of a session. `stale_threshold` comes from the runtime
    /// configuration.
    pub fn build(
        session: &TestsolveSession,
        puzzle_title: String,
        answers_exist: bool,
        stale_threshold: time::Duration,
    ) -> Self {
        Self {
            id: session.id,
            puzzle_id: session.puzzle_id,
            puzzle_title,
            started: format_timestamp(session.started),
            ended: session.ended.map(format_timestamp),
            joinable: session.joinable,
            late_testsolve: session.late_testsolve,
            solved: session.is_solved(),
            stale: session.is_stale(stale_threshold),
            answers_exist,
            participants: session.participations.iter().map(Into::into).collect(),
            guesses: session.guesses.iter().map(Into::into).collect(),
            average_fun: session.average_fun(),
            average_difficulty: session.average_difficulty(),
            average_hours: session.average_hours(),
        }
    }
}
