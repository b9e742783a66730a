//! Puzzle lifecycle: creation, viewer-aware reads, status changes, and
//! spoiler management.
//!
//! Every read goes through a viewer-aware accessor so redaction cannot be
//! bypassed by a forgetful route handler.

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{
        answer::{PseudoAnswer, Sensitivity},
        puzzle::{self, Puzzle},
        status::Status,
        user::{Capability, User},
    },
    dto::puzzle::{
        ChangeStatusRequest, CreatePseudoAnswerRequest, CreatePuzzleRequest, PuzzleView,
        SpoilRequest, TransitionView, UnspoilRequest,
    },
    error::ServiceError,
    state::{DomainEvent, SharedState},
};

/// Create a puzzle with the actor as its lead author.
pub fn create_puzzle(
    state: &SharedState,
    actor: &User,
    request: CreatePuzzleRequest,
) -> Result<PuzzleView, ServiceError> {
    request.validate()?;
    let codename = match request.codename {
        Some(codename) if !codename.trim().is_empty() => codename,
        _ => pick_codename(state),
    };

    let mut puzzle = Puzzle::new(request.name, codename, actor.id);
    puzzle.summary = request.summary;
    puzzle.description = request.description;
    puzzle.notes = request.notes;
    puzzle.priority = request.priority;

    let id = puzzle.id;
    let view = PuzzleView::build(&puzzle, &[], true);
    state.store().put_puzzle(puzzle);
    info!(puzzle_id = %id, "puzzle created");
    state.events().emit(DomainEvent::PuzzleCreated { puzzle_id: id });
    Ok(view)
}

/// Pick an unused generated codename, falling back to an id suffix when
/// the word lists are exhausted.
fn pick_codename(state: &SharedState) -> String {
    let config = state.config();
    for _ in 0..10 {
        let candidate =
            puzzle::generate_codename(&config.codename_adjectives, &config.codename_nouns);
        if !state.store().codename_taken(&candidate) {
            return candidate;
        }
    }
    let candidate =
        puzzle::generate_codename(&config.codename_adjectives, &config.codename_nouns);
    format!("{candidate} {}", &Uuid::new_v4().simple().to_string()[..4])
}

/// List all puzzles as the viewer is allowed to see them.
pub fn list_puzzles(state: &SharedState, viewer: &User) -> Vec<PuzzleView> {
    let mut puzzles = state.store().puzzles();
    puzzles.sort_by_key(|p| p.last_updated);
    puzzles.reverse();
    puzzles
        .iter()
        .map(|p| {
            let answers = state.store().answers_for_puzzle(p.id);
            PuzzleView::build(p, &answers, p.is_spoiled(viewer))
        })
        .collect()
}

/// Fetch one puzzle as the viewer is allowed to see it.
pub fn get_puzzle(
    state: &SharedState,
    viewer: &User,
    id: Uuid,
) -> Result<PuzzleView, ServiceError> {
    let puzzle = require_puzzle(state, id)?;
    let answers = state.store().answers_for_puzzle(id);
    Ok(PuzzleView::build(&puzzle, &answers, puzzle.is_spoiled(viewer)))
}

/// Set a puzzle's status. Any status may follow any other; the registry's
/// recommendations are advisory only.
pub fn change_status(
    state: &SharedState,
    actor: &User,
    id: Uuid,
    request: ChangeStatusRequest,
) -> Result<PuzzleView, ServiceError> {
    request.validate()?;
    if !actor.has_capability(Capability::ChangeStatus) {
        return Err(ServiceError::PermissionDenied(
            "not allowed to change status".into(),
        ));
    }
    let status = Status::from_code(&request.status)
        .ok_or_else(|| ServiceError::InvalidInput(format!("unknown status: {}", request.status)))?;

    let from = state
        .store()
        .with_puzzle(id, |puzzle| {
            let from = puzzle.status;
            puzzle.set_status(status);
            from
        })
        .ok_or_else(|| ServiceError::NotFound(format!("unknown puzzle {id}")))?;

    info!(puzzle_id = %id, from = from.code(), to = status.code(), "status changed");
    state.events().emit(DomainEvent::StatusChanged {
        puzzle_id: id,
        from,
        to: status,
    });
    get_puzzle(state, actor, id)
}

/// Advisory next statuses for the actor, filtered by their roles on the
/// puzzle.
pub fn transitions(
    state: &SharedState,
    actor: &User,
    id: Uuid,
) -> Result<Vec<TransitionView>, ServiceError> {
    let puzzle = require_puzzle(state, id)?;
    let roles = puzzle.roles_for(actor);
    Ok(puzzle
        .status
        .transitions_for(&roles)
        .into_iter()
        .map(Into::into)
        .collect())
}

/// Spoil the listed users, or the actor when the list is empty. Idempotent
/// per user.
pub fn spoil(
    state: &SharedState,
    actor: &User,
    id: Uuid,
    request: SpoilRequest,
) -> Result<PuzzleView, ServiceError> {
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
        .with_puzzle(id, |puzzle| {
            targets
                .iter()
                .filter(|target| puzzle.spoil(**target))
                .copied()
                .collect::<Vec<_>>()
        })
        .ok_or_else(|| ServiceError::NotFound(format!("unknown puzzle {id}")))?;

    for user_id in changed {
        state.events().emit(DomainEvent::SpoiledAdded {
            puzzle_id: id,
            user_id,
        });
    }
    get_puzzle(state, actor, id)
}

/// Remove a user from the spoiled set. Spoiling is normally one-way; this
/// requires the unspoil capability.
pub fn unspoil(
    state: &SharedState,
    actor: &User,
    id: Uuid,
    request: UnspoilRequest,
) -> Result<PuzzleView, ServiceError> {
    if !actor.has_capability(Capability::Unspoil) {
        return Err(ServiceError::PermissionDenied(
            "unspoiling requires the unspoil capability".into(),
        ));
    }
    let changed = state
        .store()
        .with_puzzle(id, |puzzle| puzzle.unspoil(request.user_id))
        .ok_or_else(|| ServiceError::NotFound(format!("unknown puzzle {id}")))?;

    if changed {
        state.events().emit(DomainEvent::SpoiledRemoved {
            puzzle_id: id,
            user_id: request.user_id,
        });
    }
    get_puzzle(state, actor, id)
}

/// Register a partial-credit answer pattern on a puzzle. Only spoiled
/// users may see or edit answers, so only they may add patterns.
pub fn add_pseudo_answer(
    state: &SharedState,
    actor: &User,
    id: Uuid,
    request: CreatePseudoAnswerRequest,
) -> Result<(), ServiceError> {
    request.validate()?;
    let puzzle = require_puzzle(state, id)?;
    if !puzzle.is_spoiled(actor) {
        return Err(ServiceError::PermissionDenied(
            "must be spoiled to edit answers".into(),
        ));
    }
    state.store().put_pseudo_answer(PseudoAnswer {
        id: Uuid::new_v4(),
        puzzle_id: id,
        answer: request.answer,
        response: request.response,
        sensitivity: Sensitivity {
            case: request.case_sensitive,
            whitespace: request.whitespace_sensitive,
            special: request.special_sensitive,
        },
    });
    Ok(())
}

fn require_puzzle(state: &SharedState, id: Uuid) -> Result<Puzzle, ServiceError> {
    state
        .store()
        .puzzle(id)
        .ok_or_else(|| ServiceError::NotFound(format!("unknown puzzle {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, dto::puzzle::SPOILER_HIDDEN, state::AppState};
    use std::collections::BTreeSet;

    fn make_user(state: &SharedState, eic: bool) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: "someone".into(),
            eic,
            editor: false,
            testsolve_coordinator: false,
            capabilities: BTreeSet::new(),
        };
        state.store().put_user(user.clone());
        user
    }

    fn make_puzzle(state: &SharedState, author: &User) -> Uuid {
        create_puzzle(
            state,
            author,
            CreatePuzzleRequest {
                name: "Hidden Gem".into(),
                codename: None,
                summary: "a puzzle".into(),
                description: "the secret twist".into(),
                notes: String::new(),
                priority: Default::default(),
            },
        )
        .expect("create")
        .id
    }

    #[test]
    fn creation_generates_a_codename_and_spoils_the_author() {
        let state = AppState::new(AppConfig::default());
        let author = make_user(&state, false);
        let view = create_puzzle(
            &state,
            &author,
            CreatePuzzleRequest {
                name: "Hidden Gem".into(),
                codename: None,
                summary: String::new(),
                description: String::new(),
                notes: String::new(),
                priority: Default::default(),
            },
        )
        .expect("create");
        assert!(!view.codename.is_empty());
        assert!(view.spoiled);
        assert_eq!(view.title, "Hidden Gem");
    }

    #[test]
    fn unspoiled_viewers_get_the_redacted_view() {
        let state = AppState::new(AppConfig::default());
        let author = make_user(&state, false);
        let stranger = make_user(&state, false);
        let id = make_puzzle(&state, &author);

        let view = get_puzzle(&state, &stranger, id).expect("get");
        assert!(!view.title.contains("Hidden Gem"));
        assert_eq!(view.description, SPOILER_HIDDEN);
        assert_eq!(view.summary, "a puzzle");
    }

    #[test]
    fn any_user_may_set_any_status() {
        let state = AppState::new(AppConfig::default());
        let author = make_user(&state, false);
        let stranger = make_user(&state, false);
        let id = make_puzzle(&state, &author);

        let view = change_status(
            &state,
            &stranger,
            id,
            ChangeStatusRequest {
                status: "D".into(),
            },
        )
        .expect("change");
        assert_eq!(view.status, "D");
    }

    #[test]
    fn unknown_status_codes_are_rejected() {
        let state = AppState::new(AppConfig::default());
        let author = make_user(&state, false);
        let id = make_puzzle(&state, &author);

        let err = change_status(
            &state,
            &author,
            id,
            ChangeStatusRequest {
                status: "ZZ".into(),
            },
        );
        assert!(matches!(err, Err(ServiceError::InvalidInput(_))));
    }

    #[test]
    fn spoil_defaults_to_the_actor() {
        let state = AppState::new(AppConfig::default());
        let author = make_user(&state, false);
        let stranger = make_user(&state, false);
        let id = make_puzzle(&state, &author);

        let view = spoil(&state, &stranger, id, SpoilRequest { user_ids: vec![] }).expect("spoil");
        assert!(view.spoiled);
        assert_eq!(view.title, "Hidden Gem");
    }

    #[test]
    fn unspoil_requires_the_capability() {
        let state = AppState::new(AppConfig::default());
        let author = make_user(&state, false);
        let stranger = make_user(&state, false);
        let id = make_puzzle(&state, &author);
        spoil(&state, &stranger, id, SpoilRequest { user_ids: vec![] }).expect("spoil");

        let err = unspoil(
            &state,
            &stranger,
            id,
            UnspoilRequest {
                user_id: stranger.id,
            },
        );
        assert!(matches!(err, Err(ServiceError::PermissionDenied(_))));

        let eic = make_user(&state, true);
        unspoil(
            &state,
            &eic,
            id,
            UnspoilRequest {
                user_id: stranger.id,
            },
        )
        .expect("unspoil");
        let fresh = get_puzzle(&state, &stranger, id).expect("get");
        assert!(!fresh.spoiled);
    }

    #[test]
    fn pseudo_answers_require_a_spoiled_actor() {
        let state = AppState::new(AppConfig::default());
        let author = make_user(&state, false);
        let stranger = make_user(&state, false);
        let id = make_puzzle(&state, &author);

        let request = || CreatePseudoAnswerRequest {
            answer: "KEEP GOING".into(),
            response: "almost!".into(),
            case_sensitive: false,
            whitespace_sensitive: false,
            special_sensitive: false,
        };
        let err = add_pseudo_answer(&state, &stranger, id, request());
        assert!(matches!(err, Err(ServiceError::PermissionDenied(_))));

        add_pseudo_answer(&state, &author, id, request()).expect("add");
        assert_eq!(state.store().pseudo_answers_for_puzzle(id).len(), 1);
    }

    #[test]
    fn generated_codenames_avoid_collisions() {
        let state = AppState::new(AppConfig::default());
        let author = make_user(&state, false);
        // Exhaust a one-word-list config to force the fallback path.
        let mut seen = std::collections::HashSet::new();
        for _ in 0..5 {
            let view = create_puzzle(
                &state,
                &author,
                CreatePuzzleRequest {
                    name: "P".into(),
                    codename: None,
                    summary: String::new(),
                    description: String::new(),
                    notes: String::new(),
                    priority: Default::default(),
                },
            )
            .expect("create");
            assert!(seen.insert(view.codename));
        }
    }
}
