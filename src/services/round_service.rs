//! Rounds, answers, and answer assignment.

use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{
        answer::{Answer, Round, Sensitivity},
        user::{Capability, User},
    },
    dto::{
        puzzle::SpoilRequest,
        round::{CreateAnswerRequest, CreateRoundRequest, RoundView},
    },
    error::ServiceError,
    state::{DomainEvent, SharedState},
};

/// Create a round. The creator is spoiled on it.
pub fn create_round(
    state: &SharedState,
    actor: &User,
    request: CreateRoundRequest,
) -> Result<RoundView, ServiceError> {
    request.validate()?;
    require_round_editor(actor)?;
    let round = Round {
        id: Uuid::new_v4(),
        name: request.name,
        description: request.description,
        spoiled: vec![actor.id],
        editors: request.editors,
    };
    let view = RoundView::build(&round, &[], true);
    state.store().put_round(round);
    Ok(view)
}

/// List all rounds as the viewer is allowed to see them.
pub fn list_rounds(state: &SharedState, viewer: &User) -> Vec<RoundView> {
    let mut rounds = state.store().rounds();
    rounds.sort_by(|a, b| a.name.cmp(&b.name));
    rounds
        .iter()
        .map(|round| {
            let answers = state.store().answers_in_round(round.id);
            RoundView::build(round, &answers, round.is_spoiled(viewer))
        })
        .collect()
}

/// Spoil the listed users, or the actor when the list is empty, on a
/// round.
pub fn spoil_round(
    state: &SharedState,
    actor: &User,
    id: Uuid,
    request: SpoilRequest,
) -> Result<RoundView, ServiceError> {
    let targets = if request.user_ids.is_empty() {
        vec![actor.id]
    } else {
        request.user_ids
    };
    for target in &targets {
        if state.store().user(*target).is_none() {
            return Err(ServiceError::NotFound(format!("unknown user {target}")));
        }
    }

    let changed = state
        .store()
        .with_round(id, |round| {
            let mut changed = Vec::new();
            for target in &targets {
                if !round.spoiled.contains(target) {
                    round.spoiled.push(*target);
                    changed.push(*target);
                }
            }
            changed
        })
        .ok_or_else(|| ServiceError::NotFound(format!("unknown round {id}")))?;

    for user_id in changed {
        state
            .events()
            .emit(DomainEvent::RoundSpoiledAdded { round_id: id, user_id });
    }

    let round = state
        .store()
        .round(id)
        .ok_or_else(|| ServiceError::NotFound(format!("unknown round {id}")))?;
    let answers = state.store().answers_in_round(id);
    Ok(RoundView::build(&round, &answers, round.is_spoiled(actor)))
}

/// Create an answer inside a round.
pub fn create_answer(
    state: &SharedState,
    actor: &User,
    round_id: Uuid,
    request: CreateAnswerRequest,
) -> Result<Uuid, ServiceError> {
    request.validate()?;
    require_round_editor(actor)?;
    if state.store().round(round_id).is_none() {
        return Err(ServiceError::NotFound(format!("unknown round {round_id}")));
    }
    let answer = Answer {
        id: Uuid::new_v4(),
        text: request.text,
        round_id,
        notes: request.notes,
        sensitivity: Sensitivity {
            case: request.case_sensitive,
            whitespace: request.whitespace_sensitive,
            special: request.special_sensitive,
        },
        puzzles: Vec::new(),
    };
    let id = answer.id;
    state.store().put_answer(answer);
    Ok(id)
}

/// Link an answer to a puzzle. An answer may serve several puzzles and a
/// puzzle may hold several answers.
pub fn assign_answer(
    state: &SharedState,
    actor: &User,
    answer_id: Uuid,
    puzzle_id: Uuid,
) -> Result<(), ServiceError> {
    require_round_editor(actor)?;
    if state.store().puzzle(puzzle_id).is_none() {
        return Err(ServiceError::NotFound(format!("unknown puzzle {puzzle_id}")));
    }
    state
        .store()
        .with_answer(answer_id, |answer| {
            if !answer.puzzles.contains(&puzzle_id) {
                answer.puzzles.push(puzzle_id);
            }
        })
        .ok_or_else(|| ServiceError::NotFound(format!("unknown answer {answer_id}")))?;
    Ok(())
}

fn require_round_editor(actor: &User) -> Result<(), ServiceError> {
    if actor.has_capability(Capability::EditRounds) {
        Ok(())
    } else {
        Err(ServiceError::PermissionDenied(
            "editing rounds requires the edit-rounds capability".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, domain::puzzle::Puzzle, dto::puzzle::SPOILER_HIDDEN, state::AppState};
    use std::collections::BTreeSet;

    fn make_user(state: &SharedState, editor: bool) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: "someone".into(),
            eic: false,
            editor,
            testsolve_coordinator: false,
            capabilities: BTreeSet::new(),
        };
        state.store().put_user(user.clone());
        user
    }

    #[test]
    fn round_creation_is_editor_gated() {
        let state = AppState::new(AppConfig::default());
        let plain = make_user(&state, false);
        let editor = make_user(&state, true);

        let request = || CreateRoundRequest {
            name: "Metas".into(),
            description: String::new(),
            editors: vec![],
        };
        assert!(matches!(
            create_round(&state, &plain, request()),
            Err(ServiceError::PermissionDenied(_))
        ));
        let view = create_round(&state, &editor, request()).expect("create");
        assert_eq!(view.name, "Metas");
    }

    #[test]
    fn unspoiled_viewers_see_redacted_rounds() {
        let state = AppState::new(AppConfig::default());
        let editor = make_user(&state, true);
        let stranger = make_user(&state, false);
        let round = create_round(
            &state,
            &editor,
            CreateRoundRequest {
                name: "Metas".into(),
                description: String::new(),
                editors: vec![],
            },
        )
        .expect("create");
        create_answer(
            &state,
            &editor,
            round.id,
            CreateAnswerRequest {
                text: "SECRET".into(),
                notes: String::new(),
                case_sensitive: false,
                whitespace_sensitive: false,
                special_sensitive: false,
            },
        )
        .expect("answer");

        let views = list_rounds(&state, &stranger);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].name, SPOILER_HIDDEN);
        assert_eq!(views[0].answers[0].text, SPOILER_HIDDEN);

        let spoiled = list_rounds(&state, &editor);
        assert_eq!(spoiled[0].answers[0].text, "SECRET");
    }

    #[test]
    fn assignment_links_answers_to_puzzles() {
        let state = AppState::new(AppConfig::default());
        let editor = make_user(&state, true);
        let round = create_round(
            &state,
            &editor,
            CreateRoundRequest {
                name: "R".into(),
                description: String::new(),
                editors: vec![],
            },
        )
        .expect("round");
        let answer_id = create_answer(
            &state,
            &editor,
            round.id,
            CreateAnswerRequest {
                text: "FOO".into(),
                notes: String::new(),
                case_sensitive: false,
                whitespace_sensitive: false,
                special_sensitive: false,
            },
        )
        .expect("answer");

        let puzzle = Puzzle::new("P".into(), "cn".into(), editor.id);
        let puzzle_id = puzzle.id;
        state.store().put_puzzle(puzzle);

        assign_answer(&state, &editor, answer_id, puzzle_id).expect("assign");
        // Idempotent.
        assign_answer(&state, &editor, answer_id, puzzle_id).expect("assign");
        assert_eq!(state.store().answers_for_puzzle(puzzle_id).len(), 1);
    }

    #[test]
    fn round_spoil_defaults_to_the_actor() {
        let state = AppState::new(AppConfig::default());
        let editor = make_user(&state, true);
        let stranger = make_user(&state, false);
        let round = create_round(
            &state,
            &editor,
            CreateRoundRequest {
                name: "R".into(),
                description: String::new(),
                editors: vec![],
            },
        )
        .expect("round");

        let view =
            spoil_round(&state, &stranger, round.id, SpoilRequest { user_ids: vec![] })
                .expect("spoil");
        assert!(view.spoiled);
        assert_eq!(view.name, "R");
    }
}
