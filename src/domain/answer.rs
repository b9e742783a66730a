//! Rounds, answers, and the guess-matching rules.
//!
//! Answers live in rounds and can be linked to any number of puzzles; a
//! puzzle's answer set is the set of answers pointing at it. Matching is
//! by normalized equality, with per-answer sensitivity flags controlling
//! how much normalization happens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::user::User;

/// A hunt round. Rounds carry their own spoiler relation, independent of
/// the puzzles inside them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    /// Round id.
    pub id: Uuid,
    /// Round name (spoilery).
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Users explicitly spoiled on the round.
    pub spoiled: Vec<Uuid>,
    /// Editors assigned to the round.
    pub editors: Vec<Uuid>,
}

impl Round {
    /// Whether a user may see the round's name and answer list. Editors
    /// are implicitly spoiled, as are EICs.
    pub fn is_spoiled(&self, user: &User) -> bool {
        user.eic || self.spoiled.contains(&user.id) || self.editors.contains(&user.id)
    }
}

/// Per-answer normalization flags. Each flag *disables* one normalization
/// step, so the default (all false) is the most forgiving comparison.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
pub struct Sensitivity {
    /// Keep casing as-is instead of uppercasing.
    #[serde(default)]
    pub case: bool,
    /// Keep whitespace instead of stripping it.
    #[serde(default)]
    pub whitespace: bool,
    /// Keep punctuation and other special characters.
    #[serde(default)]
    pub special: bool,
}

impl Sensitivity {
    /// Normalize a candidate string under these flags.
    pub fn normalize(&self, text: &str) -> String {
        let mut out: String = text
            .chars()
            .filter(|c| self.special || c.is_alphanumeric() || c.is_whitespace())
            .collect();
        if !self.whitespace {
            out.retain(|c| !c.is_whitespace());
        }
        if !self.case {
            out = out.to_uppercase();
        }
        out
    }

    /// Whether a guess matches the canonical text under these flags.
    pub fn matches(&self, canonical: &str, guess: &str) -> bool {
        self.normalize(canonical) == self.normalize(guess)
    }
}

/// An answer in a round, assignable to zero or more puzzles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Answer id.
    pub id: Uuid,
    /// The answer text itself (spoilery).
    pub text: String,
    /// Round the answer belongs to.
    pub round_id: Uuid,
    /// Editor notes about the answer.
    pub notes: String,
    /// How strictly guesses are compared.
    pub sensitivity: Sensitivity,
    /// Puzzles this answer is assigned to.
    pub puzzles: Vec<Uuid>,
}

impl Answer {
    /// Whether a guess matches this answer.
    pub fn is_correct(&self, guess: &str) -> bool {
        self.sensitivity.matches(&self.text, guess)
    }
}

/// A partial-credit answer pattern attached to one puzzle, with a canned
/// response shown to the guesser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PseudoAnswer {
    /// Pseudo-answer id.
    pub id: Uuid,
    /// Puzzle this pattern belongs to.
    pub puzzle_id: Uuid,
    /// The pattern text.
    pub answer: String,
    /// Response shown when a guess matches.
    pub response: String,
    /// How strictly guesses are compared.
    pub sensitivity: Sensitivity,
}

impl PseudoAnswer {
    /// Whether a guess matches this pattern.
    pub fn is_correct(&self, guess: &str) -> bool {
        self.sensitivity.matches(&self.answer, guess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn answer(text: &str, sensitivity: Sensitivity) -> Answer {
        Answer {
            id: Uuid::new_v4(),
            text: text.to_owned(),
            round_id: Uuid::new_v4(),
            notes: String::new(),
            sensitivity,
            puzzles: Vec::new(),
        }
    }

    #[test]
    fn default_matching_ignores_case_and_whitespace() {
        let a = answer("FOO BAR", Sensitivity::default());
        assert!(a.is_correct("foobar"));
        assert!(a.is_correct("  Foo   Bar "));
        assert!(!a.is_correct("foobaz"));
    }

    #[test]
    fn default_matching_ignores_punctuation() {
        let a = answer("IT'S A TRAP", Sensitivity::default());
        assert!(a.is_correct("its a trap"));
        assert!(a.is_correct("It's, a; trap!"));
    }

    #[test]
    fn case_sensitive_answers_require_exact_casing() {
        let a = answer(
            "McGee",
            Sensitivity {
                case: true,
                ..Default::default()
            },
        );
        assert!(a.is_correct("McGee"));
        assert!(!a.is_correct("mcgee"));
    }

    #[test]
    fn whitespace_sensitive_answers_keep_spaces() {
        let a = answer(
            "A B",
            Sensitivity {
                whitespace: true,
                ..Default::default()
            },
        );
        assert!(a.is_correct("a b"));
        assert!(!a.is_correct("ab"));
    }

    #[test]
    fn pseudo_answers_match_independently() {
        let pseudo = PseudoAnswer {
            id: Uuid::new_v4(),
            puzzle_id: Uuid::new_v4(),
            answer: "KEEP GOING".to_owned(),
            response: "You're on the right track!".to_owned(),
            sensitivity: Sensitivity::default(),
        };
        assert!(pseudo.is_correct("keepgoing"));
        assert!(!pseudo.is_correct("stop"));
    }

    #[test]
    fn round_spoiler_covers_editors() {
        let editor_id = Uuid::new_v4();
        let round = Round {
            id: Uuid::new_v4(),
            name: "Metas".to_owned(),
            description: String::new(),
            spoiled: Vec::new(),
            editors: vec![editor_id],
        };
        let editor = User {
            id: editor_id,
            name: "ed".to_owned(),
            eic: false,
            editor: true,
            testsolve_coordinator: false,
            capabilities: BTreeSet::new(),
        };
        let stranger = User {
            id: Uuid::new_v4(),
            name: "nobody".to_owned(),
            eic: false,
            editor: false,
            testsolve_coordinator: false,
            capabilities: BTreeSet::new(),
        };
        assert!(round.is_spoiled(&editor));
        assert!(!round.is_spoiled(&stranger));
    }
}
