//! Core workflow model: statuses, puzzles, answers, sessions, users.

/// Answers, rounds, and guess matching.
pub mod answer;
/// The puzzle record and spoiler-aware accessors.
pub mod puzzle;
/// The static status registry.
pub mod status;
/// Testsolve sessions, participations, and guesses.
pub mod testsolve;
/// Users and the capability model.
pub mod user;
