//! Testsolve sessions, participations, and guess classification.

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::answer::{Answer, PseudoAnswer};

/// Outcome of a single guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Matched an assigned answer.
    Correct,
    /// Matched a partial-credit pattern.
    PartiallyCorrect,
    /// Matched nothing.
    Incorrect,
}

/// A classified guess, with the canned response when a partial pattern
/// matched.
#[derive(Debug, Clone)]
pub struct Classification {
    /// The verdict.
    pub verdict: Verdict,
    /// Canned response for partial matches.
    pub partial_response: Option<String>,
}

/// Classify a guess against a puzzle's answers and partial patterns.
/// Partial patterns are only consulted when no full answer matched, and a
/// puzzle with no assigned answers can never be solved.
pub fn classify_guess(
    answers: &[Answer],
    pseudo_answers: &[PseudoAnswer],
    guess: &str,
) -> Classification {
    if answers.iter().any(|a| a.is_correct(guess)) {
        return Classification {
            verdict: Verdict::Correct,
            partial_response: None,
        };
    }
    if let Some(pseudo) = pseudo_answers.iter().find(|p| p.is_correct(guess)) {
        return Classification {
            verdict: Verdict::PartiallyCorrect,
            partial_response: Some(pseudo.response.clone()),
        };
    }
    Classification {
        verdict: Verdict::Incorrect,
        partial_response: None,
    }
}

/// One recorded guess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guess {
    /// Who guessed.
    pub user_id: Uuid,
    /// The raw guess text.
    pub text: String,
    /// When the guess was made.
    pub date: OffsetDateTime,
    /// How it was classified.
    pub verdict: Verdict,
    /// Canned response if a partial pattern matched.
    pub partial_response: Option<String>,
}

/// One free-text feedback submission. Refinishing appends a new entry
/// instead of editing the old one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    /// When the feedback was submitted.
    pub date: OffsetDateTime,
    /// General feedback on the puzzle.
    pub general: String,
    /// Anything else.
    pub misc: String,
}

/// One solver's participation in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participation {
    /// The participant.
    pub user_id: Uuid,
    /// When they joined.
    pub started: OffsetDateTime,
    /// When they finished, if they have.
    pub ended: Option<OffsetDateTime>,
    /// Fun rating, 0 to 6.
    pub fun_rating: Option<u8>,
    /// Difficulty rating, 0 to 6.
    pub difficulty_rating: Option<u8>,
    /// Hours spent solving.
    pub hours_spent: Option<f64>,
    /// Accumulated feedback submissions.
    pub feedback: Vec<FeedbackEntry>,
}

/// Numeric ratings submitted on finish.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ratings {
    /// Fun rating, 0 to 6.
    pub fun: Option<u8>,
    /// Difficulty rating, 0 to 6.
    pub difficulty: Option<u8>,
    /// Hours spent solving.
    pub hours_spent: Option<f64>,
}

/// A testsolve session on one puzzle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestsolveSession {
    /// Session id.
    pub id: Uuid,
    /// Puzzle under test.
    pub puzzle_id: Uuid,
    /// When the session started.
    pub started: OffsetDateTime,
    /// When the session was closed, if it has been.
    pub ended: Option<OffsetDateTime>,
    /// Whether the session is advertised for others to join.
    pub joinable: bool,
    /// Started on a puzzle already past testsolving.
    pub late_testsolve: bool,
    /// Coordinator notes.
    pub notes: String,
    /// Solvers in the session.
    pub participations: Vec<Participation>,
    /// Guesses in submission order.
    pub guesses: Vec<Guess>,
    /// Last join, guess, or finish.
    pub last_activity: OffsetDateTime,
}

impl TestsolveSession {
    /// Start a session with the creator as its first participant. Late
    /// sessions are never advertised.
    pub fn new(puzzle_id: Uuid, creator: Uuid, late_testsolve: bool) -> TestsolveSession {
        let now = OffsetDateTime::now_utc();
        TestsolveSession {
            id: Uuid::new_v4(),
            puzzle_id,
            started: now,
            ended: None,
            joinable: !late_testsolve,
            late_testsolve,
            notes: String::new(),
            participations: vec![Participation {
                user_id: creator,
                started: now,
                ended: None,
                fun_rating: None,
                difficulty_rating: None,
                hours_spent: None,
                feedback: Vec::new(),
            }],
            guesses: Vec::new(),
            last_activity: now,
        }
    }

    /// Whether the session has been closed.
    pub fn is_closed(&self) -> bool {
        self.ended.is_some()
    }

    /// Whether any guess was correct. Latches; nothing un-solves a
    /// session.
    pub fn is_solved(&self) -> bool {
        self.guesses.iter().any(|g| g.verdict == Verdict::Correct)
    }

    /// Open, unsolved, and idle past the threshold. Display-only; a stale
    /// session still accepts every operation.
    pub fn is_stale(&self, threshold: Duration) -> bool {
        !self.is_closed()
            && !self.is_solved()
            && OffsetDateTime::now_utc() - self.last_activity > threshold
    }

    /// Look up one user's participation.
    pub fn participation(&self, user_id: Uuid) -> Option<&Participation> {
        self.participations.iter().find(|p| p.user_id == user_id)
    }

    /// Participants who have not finished.
    pub fn active_participants(&self) -> usize {
        self.participations.iter().filter(|p| p.ended.is_none()).count()
    }

    /// Add a participant. Idempotent; returns whether the user was newly
    /// added.
    pub fn join(&mut self, user_id: Uuid) -> bool {
        if self.participation(user_id).is_some() {
            return false;
        }
        let now = OffsetDateTime::now_utc();
        self.participations.push(Participation {
            user_id,
            started: now,
            ended: None,
            fun_rating: None,
            difficulty_rating: None,
            hours_spent: None,
            feedback: Vec::new(),
        });
        self.last_activity = now;
        true
    }

    /// Record an already-classified guess. The first correct guess delists
    /// the session.
    pub fn record_guess(&mut self, user_id: Uuid, text: String, classification: &Classification) {
        let now = OffsetDateTime::now_utc();
        self.guesses.push(Guess {
            user_id,
            text,
            date: now,
            verdict: classification.verdict,
            partial_response: classification.partial_response.clone(),
        });
        if classification.verdict == Verdict::Correct {
            self.joinable = false;
        }
        self.last_activity = now;
    }

    /// Record a participant finishing: numeric ratings are overwritten,
    /// non-empty feedback is appended as a new entry. Returns whether this
    /// was the participant's first finish, or `None` for non-participants.
    pub fn finish(
        &mut self,
        user_id: Uuid,
        ratings: Ratings,
        general: String,
        misc: String,
    ) -> Option<bool> {
        let now = OffsetDateTime::now_utc();
        let participation = self
            .participations
            .iter_mut()
            .find(|p| p.user_id == user_id)?;

        let first_finish = participation.ended.is_none();
        participation.ended = Some(now);
        if ratings.fun.is_some() {
            participation.fun_rating = ratings.fun;
        }
        if ratings.difficulty.is_some() {
            participation.difficulty_rating = ratings.difficulty;
        }
        if ratings.hours_spent.is_some() {
            participation.hours_spent = ratings.hours_spent;
        }
        if !general.is_empty() || !misc.is_empty() {
            participation.feedback.push(FeedbackEntry {
                date: now,
                general,
                misc,
            });
        }
        self.last_activity = now;
        Some(first_finish)
    }

    /// Remove a participation entirely, as if the user was never there.
    /// When the last active participant leaves, the session stops being
    /// advertised. Returns whether the user was a participant.
    pub fn escape(&mut self, user_id: Uuid) -> bool {
        let before = self.participations.len();
        self.participations.retain(|p| p.user_id != user_id);
        if self.participations.len() == before {
            return false;
        }
        if self.active_participants() == 0 {
            self.joinable = false;
        }
        true
    }

    /// Close the session for everyone. Terminal.
    pub fn close(&mut self) {
        self.ended = Some(OffsetDateTime::now_utc());
        self.joinable = false;
    }

    /// Average fun rating across participants who rated.
    pub fn average_fun(&self) -> Option<f64> {
        mean(self.participations.iter().filter_map(|p| p.fun_rating.map(f64::from)))
    }

    /// Average difficulty rating across participants who rated.
    pub fn average_difficulty(&self) -> Option<f64> {
        mean(
            self.participations
                .iter()
                .filter_map(|p| p.difficulty_rating.map(f64::from)),
        )
    }

    /// Average hours spent across participants who reported.
    pub fn average_hours(&self) -> Option<f64> {
        mean(self.participations.iter().filter_map(|p| p.hours_spent))
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 { None } else { Some(sum / count as f64) }
}
