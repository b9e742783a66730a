//! In-memory store backed by concurrent maps.
//!
//! Each record type lives in its own map keyed by id. Mutations take the
//! entry lock for the duration of a closure; there is no cross-record
//! transaction, and concurrent writers to the same record are
//! last-write-wins.

use dashmap::DashMap;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    answer::{Answer, PseudoAnswer, Round},
    puzzle::Puzzle,
    testsolve::TestsolveSession,
    user::User,
};

/// Record counts reported by the health endpoint.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct StoreStats {
    /// Registered users.
    pub users: usize,
    /// Tracked puzzles.
    pub puzzles: usize,
    /// Rounds.
    pub rounds: usize,
    /// Answers across all rounds.
    pub answers: usize,
    /// Testsolve sessions, open or closed.
    pub sessions: usize,
}

/// The application's record store.
#[derive(Default)]
pub struct Store {
    users: DashMap<Uuid, User>,
    puzzles: DashMap<Uuid, Puzzle>,
    rounds: DashMap<Uuid, Round>,
    answers: DashMap<Uuid, Answer>,
    pseudo_answers: DashMap<Uuid, PseudoAnswer>,
    sessions: DashMap<Uuid, TestsolveSession>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record counts for the health endpoint.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            users: self.users.len(),
            puzzles: self.puzzles.len(),
            rounds: self.rounds.len(),
            answers: self.answers.len(),
            sessions: self.sessions.len(),
        }
    }

    /// Insert or replace a user.
    pub fn put_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    /// Fetch a user by id.
    pub fn user(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).map(|entry| entry.clone())
    }

    /// All users, in no particular order.
    pub fn users(&self) -> Vec<User> {
        self.users.iter().map(|entry| entry.clone()).collect()
    }

    /// Insert or replace a puzzle.
    pub fn put_puzzle(&self, puzzle: Puzzle) {
        self.puzzles.insert(puzzle.id, puzzle);
    }

    /// Fetch a puzzle by id.
    pub fn puzzle(&self, id: Uuid) -> Option<Puzzle> {
        self.puzzles.get(&id).map(|entry| entry.clone())
    }

    /// All puzzles, in no particular order.
    pub fn puzzles(&self) -> Vec<Puzzle> {
        self.puzzles.iter().map(|entry| entry.clone()).collect()
    }

    /// Whether any puzzle already uses a codename.
    pub fn codename_taken(&self, codename: &str) -> bool {
        self.puzzles.iter().any(|entry| entry.codename == codename)
    }

    /// Mutate a puzzle under its entry lock. Returns `None` when the id is
    /// unknown.
    pub fn with_puzzle<T>(&self, id: Uuid, f: impl FnOnce(&mut Puzzle) -> T) -> Option<T> {
        self.puzzles.get_mut(&id).map(|mut entry| f(&mut entry))
    }

    /// Insert or replace a round.
    pub fn put_round(&self, round: Round) {
        self.rounds.insert(round.id, round);
    }

    /// Fetch a round by id.
    pub fn round(&self, id: Uuid) -> Option<Round> {
        self.rounds.get(&id).map(|entry| entry.clone())
    }

    /// All rounds, in no particular order.
    pub fn rounds(&self) -> Vec<Round> {
        self.rounds.iter().map(|entry| entry.clone()).collect()
    }

    /// Mutate a round under its entry lock.
    pub fn with_round<T>(&self, id: Uuid, f: impl FnOnce(&mut Round) -> T) -> Option<T> {
        self.rounds.get_mut(&id).map(|mut entry| f(&mut entry))
    }

    /// Insert or replace an answer.
    pub fn put_answer(&self, answer: Answer) {
        self.answers.insert(answer.id, answer);
    }

    /// Fetch an answer by id.
    pub fn answer(&self, id: Uuid) -> Option<Answer> {
        self.answers.get(&id).map(|entry| entry.clone())
    }

    /// Answers assigned to a puzzle.
    pub fn answers_for_puzzle(&self, puzzle_id: Uuid) -> Vec<Answer> {
        self.answers
            .iter()
            .filter(|entry| entry.puzzles.contains(&puzzle_id))
            .map(|entry| entry.clone())
            .collect()
    }

    /// Answers in a round.
    pub fn answers_in_round(&self, round_id: Uuid) -> Vec<Answer> {
        self.answers
            .iter()
            .filter(|entry| entry.round_id == round_id)
            .map(|entry| entry.clone())
            .collect()
    }

    /// Mutate an answer under its entry lock.
    pub fn with_answer<T>(&self, id: Uuid, f: impl FnOnce(&mut Answer) -> T) -> Option<T> {
        self.answers.get_mut(&id).map(|mut entry| f(&mut entry))
    }

    /// Insert a pseudo-answer.
    pub fn put_pseudo_answer(&self, pseudo: PseudoAnswer) {
        self.pseudo_answers.insert(pseudo.id, pseudo);
    }

    /// Partial-credit patterns registered on a puzzle.
    pub fn pseudo_answers_for_puzzle(&self, puzzle_id: Uuid) -> Vec<PseudoAnswer> {
        self.pseudo_answers
            .iter()
            .filter(|entry| entry.puzzle_id == puzzle_id)
            .map(|entry| entry.clone())
            .collect()
    }

    /// Insert or replace a session.
    pub fn put_session(&self, session: TestsolveSession) {
        self.sessions.insert(session.id, session);
    }

    /// Fetch a session by id.
    pub fn session(&self, id: Uuid) -> Option<TestsolveSession> {
        self.sessions.get(&id).map(|entry| entry.clone())
    }

    /// All sessions, in no particular order.
    pub fn sessions(&self) -> Vec<TestsolveSession> {
        self.sessions.iter().map(|entry| entry.clone()).collect()
    }

    /// Mutate a session under its entry lock.
    pub fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut TestsolveSession) -> T,
    ) -> Option<T> {
        self.sessions.get_mut(&id).map(|mut entry| f(&mut entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_track_inserts() {
        let store = Store::new();
        assert_eq!(store.stats().puzzles, 0);

        let puzzle = Puzzle::new("T".into(), "cn".into(), Uuid::new_v4());
        let id = puzzle.id;
        store.put_puzzle(puzzle);
        assert_eq!(store.stats().puzzles, 1);
        assert!(store.puzzle(id).is_some());
        assert!(store.puzzle(Uuid::new_v4()).is_none());
    }

    #[test]
    fn with_puzzle_persists_mutations() {
        let store = Store::new();
        let puzzle = Puzzle::new("T".into(), "cn".into(), Uuid::new_v4());
        let id = puzzle.id;
        store.put_puzzle(puzzle);

        let viewer = Uuid::new_v4();
        let changed = store.with_puzzle(id, |p| p.spoil(viewer));
        assert_eq!(changed, Some(true));
        assert!(store.puzzle(id).is_some_and(|p| p.spoiled.contains(&viewer)));

        assert_eq!(store.with_puzzle(Uuid::new_v4(), |_| ()), None);
    }

    #[test]
    fn answer_lookups_follow_assignment() {
        use crate::domain::answer::Sensitivity;

        let store = Store::new();
        let round_id = Uuid::new_v4();
        let puzzle_id = Uuid::new_v4();
        let answer = Answer {
            id: Uuid::new_v4(),
            text: "X".into(),
            round_id,
            notes: String::new(),
            sensitivity: Sensitivity::default(),
            puzzles: Vec::new(),
        };
        let answer_id = answer.id;
        store.put_answer(answer);

        assert!(store.answers_for_puzzle(puzzle_id).is_empty());
        store.with_answer(answer_id, |a| a.puzzles.push(puzzle_id));
        assert_eq!(store.answers_for_puzzle(puzzle_id).len(), 1);
        assert_eq!(store.answers_in_round(round_id).len(), 1);
    }

    #[test]
    fn codename_collisions_are_detected() {
        let store = Store::new();
        store.put_puzzle(Puzzle::new("T".into(), "quiet fjord".into(), Uuid::new_v4()));
        assert!(store.codename_taken("quiet fjord"));
        assert!(!store.codename_taken("loud fjord"));
    }
}
