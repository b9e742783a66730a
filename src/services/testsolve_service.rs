//! Testsolve session lifecycle.
//!
//! Sessions are the only path by which unspoiled solvers interact with a
//! puzzle, so every view built here goes through the same redaction as the
//! puzzle reads. A correct guess, a first finish on an ended session, and
//! a coordinator close each pull a puzzle still sitting in Testsolving
//! back to Writing, matching how the team actually runs the workflow.

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{
        status::Status,
        testsolve::{self, Ratings, TestsolveSession, Verdict},
        user::{Capability, User},
    },
    dto::testsolve::{FinishRequest, GuessRequest, SessionView, StartSessionRequest},
    error::ServiceError,
    state::{DomainEvent, SharedState},
};

/// Start a session on a puzzle, with the actor as its first participant.
pub fn start_session(
    state: &SharedState,
    actor: &User,
    request: StartSessionRequest,
) -> Result<SessionView, ServiceError> {
    if !state.config().testsolving_enabled {
        return Err(ServiceError::InvalidState(
            "testsolving is currently disabled".into(),
        ));
    }
    let puzzle = state
        .store()
        .puzzle(request.puzzle_id)
        .ok_or_else(|| ServiceError::NotFound(format!("unknown puzzle {}", request.puzzle_id)))?;

    let late = if puzzle.status == Status::Testsolving {
        false
    } else if actor.has_capability(Capability::LateTestsolve) {
        true
    } else {
        return Err(ServiceError::InvalidState(format!(
            "puzzle is not ready to be testsolved (status {})",
            puzzle.status.display()
        )));
    };

    let session = TestsolveSession::new(puzzle.id, actor.id, late);
    let id = session.id;
    state.store().put_session(session);
    info!(session_id = %id, puzzle_id = %puzzle.id, late, "testsolve session started");
    state.events().emit(DomainEvent::SessionStarted {
        session_id: id,
        puzzle_id: puzzle.id,
        late,
    });
    get_session(state, actor, id)
}

/// List sessions currently advertised for joining.
pub fn list_joinable(state: &SharedState, viewer: &User) -> Vec<SessionView> {
    let mut sessions = state.store().sessions();
    sessions.retain(|s| s.joinable && !s.is_closed());
    sessions.sort_by_key(|s| s.started);
    sessions
        .iter()
        .filter_map(|s| build_view(state, viewer, s).ok())
        .collect()
}

/// Fetch one session as the viewer is allowed to see it.
pub fn get_session(
    state: &SharedState,
    viewer: &User,
    id: Uuid,
) -> Result<SessionView, ServiceError> {
    let session = require_session(state, id)?;
    build_view(state, viewer, &session)
}

/// Join a session. Idempotent for existing participants.
pub fn join_session(
    state: &SharedState,
    actor: &User,
    id: Uuid,
) -> Result<SessionView, ServiceError> {
    let joined = state
        .store()
        .with_session(id, |session| {
            if session.is_closed() {
                return Err(ServiceError::InvalidState("session is closed".into()));
            }
            if session.participation(actor.id).is_some() {
                return Ok(false);
            }
            if !session.joinable {
                return Err(ServiceError::InvalidState(
                    "session is not accepting new solvers".into(),
                ));
            }
            Ok(session.join(actor.id))
        })
        .ok_or_else(|| ServiceError::NotFound(format!("unknown session {id}")))??;

    if joined {
        state.events().emit(DomainEvent::ParticipantJoined {
            session_id: id,
            user_id: actor.id,
        });
    }
    get_session(state, actor, id)
}

/// Submit a guess. Participant-only; only a closed session rejects
/// further guesses. Guessing on an already-solved session is fine and
/// keeps recording, the solved state just never unlatches.
pub fn submit_guess(
    state: &SharedState,
    actor: &User,
    id: Uuid,
    request: GuessRequest,
) -> Result<SessionView, ServiceError> {
    request.validate()?;
    let session = require_session(state, id)?;

    let answers = state.store().answers_for_puzzle(session.puzzle_id);
    let pseudo_answers = state.store().pseudo_answers_for_puzzle(session.puzzle_id);
    let classification = testsolve::classify_guess(&answers, &pseudo_answers, &request.guess);

    let newly_solved = state
        .store()
        .with_session(id, |s| {
            if s.is_closed() {
                return Err(ServiceError::InvalidState("session is closed".into()));
            }
            if s.participation(actor.id).is_none() {
                return Err(ServiceError::PermissionDenied(
                    "only participants may guess".into(),
                ));
            }
            let already_solved = s.is_solved();
            s.record_guess(actor.id, request.guess.clone(), &classification);
            Ok(classification.verdict == Verdict::Correct && !already_solved)
        })
        .ok_or_else(|| ServiceError::NotFound(format!("unknown session {id}")))??;

    state.events().emit(DomainEvent::GuessSubmitted {
        session_id: id,
        user_id: actor.id,
        verdict: classification.verdict,
    });

    if newly_solved {
        info!(session_id = %id, puzzle_id = %session.puzzle_id, "session solved its puzzle");
        state.events().emit(DomainEvent::SessionSolved {
            session_id: id,
            puzzle_id: session.puzzle_id,
        });
        pull_back_to_writing(state, session.puzzle_id);
    }

    get_session(state, actor, id)
}

/// Record the actor finishing the session: ratings overwrite, feedback
/// appends. Finishing also spoils the solver on the puzzle.
pub fn finish_session(
    state: &SharedState,
    actor: &User,
    id: Uuid,
    request: FinishRequest,
) -> Result<SessionView, ServiceError> {
    request.validate()?;
    let ratings = Ratings {
        fun: request.fun_rating,
        difficulty: request.difficulty_rating,
        hours_spent: request.hours_spent,
    };

    let first_finish = state
        .store()
        .with_session(id, |session| {
            session.finish(
                actor.id,
                ratings,
                request.general_feedback.clone(),
                request.misc_feedback.clone(),
            )
        })
        .ok_or_else(|| ServiceError::NotFound(format!("unknown session {id}")))?
        .ok_or_else(|| {
            ServiceError::PermissionDenied("only participants may finish".into())
        })?;

    let session = require_session(state, id)?;
    let spoiled = state
        .store()
        .with_puzzle(session.puzzle_id, |puzzle| puzzle.spoil(actor.id))
        .unwrap_or(false);
    if spoiled {
        state.events().emit(DomainEvent::SpoiledAdded {
            puzzle_id: session.puzzle_id,
            user_id: actor.id,
        });
    }

    if first_finish && session.is_closed() {
        pull_back_to_writing(state, session.puzzle_id);
    }

    get_session(state, actor, id)
}

/// Leave a session as if the actor was never there.
pub fn escape_session(
    state: &SharedState,
    actor: &User,
    id: Uuid,
) -> Result<(), ServiceError> {
    let escaped = state
        .store()
        .with_session(id, |session| session.escape(actor.id))
        .ok_or_else(|| ServiceError::NotFound(format!("unknown session {id}")))?;
    if !escaped {
        return Err(ServiceError::NotFound(
            "actor is not a participant of this session".into(),
        ));
    }
    info!(session_id = %id, user_id = %actor.id, "participant escaped session");
    Ok(())
}

/// Close a session for everyone. Coordinator-only and terminal.
pub fn close_session(
    state: &SharedState,
    actor: &User,
    id: Uuid,
) -> Result<SessionView, ServiceError> {
    if !actor.has_capability(Capability::CloseSession) {
        return Err(ServiceError::PermissionDenied(
            "closing sessions requires the close-session capability".into(),
        ));
    }
    let puzzle_id = state
        .store()
        .with_session(id, |session| {
            if session.is_closed() {
                return Err(ServiceError::InvalidState("session is already closed".into()));
            }
            session.close();
            Ok(session.puzzle_id)
        })
        .ok_or_else(|| ServiceError::NotFound(format!("unknown session {id}")))??;

    info!(session_id = %id, "session closed");
    state
        .events()
        .emit(DomainEvent::SessionClosed { session_id: id });
    pull_back_to_writing(state, puzzle_id);
    get_session(state, actor, id)
}

/// Move a puzzle still sitting in Testsolving back to Writing, emitting
/// the status change. No-op for any other status.
fn pull_back_to_writing(state: &SharedState, puzzle_id: Uuid) {
    let moved = state
        .store()
        .with_puzzle(puzzle_id, |puzzle| {
            if puzzle.status == Status::Testsolving {
                puzzle.set_status(Status::Writing);
                true
            } else {
                false
            }
        })
        .unwrap_or(false);
    if moved {
        info!(puzzle_id = %puzzle_id, "puzzle automatically moved back to writing");
        state.events().emit(DomainEvent::StatusChanged {
            puzzle_id,
            from: Status::Testsolving,
            to: Status::Writing,
        });
    }
}

fn require_session(state: &SharedState, id: Uuid) -> Result<TestsolveSession, ServiceError> {
    state
        .store()
        .session(id)
        .ok_or_else(|| ServiceError::NotFound(format!("unknown session {id}")))
}

fn build_view(
    state: &SharedState,
    viewer: &User,
    session: &TestsolveSession,
) -> Result<SessionView, ServiceError> {
    let puzzle = state
        .store()
        .puzzle(session.puzzle_id)
        .ok_or_else(|| ServiceError::NotFound(format!("unknown puzzle {}", session.puzzle_id)))?;
    let answers = state.store().answers_for_puzzle(session.puzzle_id);
    let title = if puzzle.is_spoiled(viewer) {
        puzzle.spoilery_title().to_owned()
    } else {
        puzzle.spoiler_free_title()
    };
    Ok(SessionView::build(
        session,
        title,
        !answers.is_empty(),
        state.config().stale_threshold(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        domain::{answer::{Answer, Sensitivity}, puzzle::Puzzle},
        state::AppState,
    };
    use std::collections::BTreeSet;

    fn make_user(state: &SharedState, coordinator: bool) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: "solver".into(),
            eic: false,
            editor: false,
            testsolve_coordinator: coordinator,
            capabilities: BTreeSet::new(),
        };
        state.store().put_user(user.clone());
        user
    }

    fn make_puzzle(state: &SharedState, status: Status) -> Uuid {
        let mut puzzle = Puzzle::new("Secret".into(), "quiet fjord".into(), Uuid::new_v4());
        puzzle.set_status(status);
        let id = puzzle.id;
        state.store().put_puzzle(puzzle);
        id
    }

    fn assign_answer(state: &SharedState, puzzle_id: Uuid, text: &str) {
        state.store().put_answer(Answer {
            id: Uuid::new_v4(),
            text: text.into(),
            round_id: Uuid::new_v4(),
            notes: String::new(),
            sensitivity: Sensitivity::default(),
            puzzles: vec![puzzle_id],
        });
    }

    fn setup() -> (SharedState, User, Uuid) {
        let state = AppState::new(AppConfig::default());
        let solver = make_user(&state, false);
        let puzzle_id = make_puzzle(&state, Status::Testsolving);
        (state, solver, puzzle_id)
    }

    #[test]
    fn starting_requires_the_testsolving_status() {
        let (state, solver, _) = setup();
        let early = make_puzzle(&state, Status::Writing);
        let err = start_session(&state, &solver, StartSessionRequest { puzzle_id: early });
        assert!(matches!(err, Err(ServiceError::InvalidState(_))));
    }

    #[test]
    fn coordinators_may_start_late_sessions() {
        let (state, _, _) = setup();
        let coordinator = make_user(&state, true);
        let late_puzzle = make_puzzle(&state, Status::NeedsPostprod);
        let view = start_session(
            &state,
            &coordinator,
            StartSessionRequest {
                puzzle_id: late_puzzle,
            },
        )
        .expect("start");
        assert!(view.late_testsolve);
        // Late sessions are never advertised.
        assert!(!view.joinable);
    }

    #[test]
    fn starting_is_gated_by_the_global_flag() {
        let mut config = AppConfig::default();
        config.testsolving_enabled = false;
        let state = AppState::new(config);
        let solver = make_user(&state, false);
        let puzzle_id = make_puzzle(&state, Status::Testsolving);
        let err = start_session(&state, &solver, StartSessionRequest { puzzle_id });
        assert!(matches!(err, Err(ServiceError::InvalidState(_))));
    }

    #[test]
    fn sessions_hide_the_puzzle_title_from_unspoiled_solvers() {
        let (state, solver, puzzle_id) = setup();
        let view =
            start_session(&state, &solver, StartSessionRequest { puzzle_id }).expect("start");
        assert!(!view.puzzle_title.contains("Secret"));
        assert!(view.puzzle_title.contains("quiet fjord"));
    }

    #[test]
    fn sessions_without_answers_carry_a_warning() {
        let (state, solver, puzzle_id) = setup();
        let view =
            start_session(&state, &solver, StartSessionRequest { puzzle_id }).expect("start");
        assert!(!view.answers_exist);

        assign_answer(&state, puzzle_id, "FOOBAR");
        let view = get_session(&state, &solver, view.id).expect("get");
        assert!(view.answers_exist);
    }

    #[test]
    fn only_participants_may_guess() {
        let (state, solver, puzzle_id) = setup();
        let stranger = make_user(&state, false);
        let view =
            start_session(&state, &solver, StartSessionRequest { puzzle_id }).expect("start");
        let err = submit_guess(
            &state,
            &stranger,
            view.id,
            GuessRequest {
                guess: "FOOBAR".into(),
            },
        );
        assert!(matches!(err, Err(ServiceError::PermissionDenied(_))));
    }

    #[test]
    fn a_correct_guess_solves_and_moves_the_puzzle_back_to_writing() {
        let (state, solver, puzzle_id) = setup();
        assign_answer(&state, puzzle_id, "FOOBAR");
        let session =
            start_session(&state, &solver, StartSessionRequest { puzzle_id }).expect("start");

        let view = submit_guess(
            &state,
            &solver,
            session.id,
            GuessRequest {
                guess: " foo bar ".into(),
            },
        )
        .expect("guess");
        assert!(view.solved);
        assert!(!view.joinable);
        assert_eq!(view.guesses[0].verdict, Verdict::Correct);

        let puzzle = state.store().puzzle(puzzle_id).unwrap();
        assert_eq!(puzzle.status, Status::Writing);

        // Later guesses keep being recorded; solved never unlatches.
        let view = submit_guess(
            &state,
            &solver,
            session.id,
            GuessRequest {
                guess: "wrong".into(),
            },
        )
        .expect("guess after solve");
        assert_eq!(view.guesses.len(), 2);
        assert_eq!(view.guesses[1].verdict, Verdict::Incorrect);
        assert!(view.solved);

        // The puzzle only moves back once.
        state
            .store()
            .with_puzzle(puzzle_id, |p| p.set_status(Status::IdeaInDevelopment))
            .unwrap();
        submit_guess(
            &state,
            &solver,
            session.id,
            GuessRequest {
                guess: "foobar".into(),
            },
        )
        .expect("repeat correct guess");
        let puzzle = state.store().puzzle(puzzle_id).unwrap();
        assert_eq!(puzzle.status, Status::IdeaInDevelopment);
    }

    #[test]
    fn partial_guesses_record_the_canned_response() {
        let (state, solver, puzzle_id) = setup();
        assign_answer(&state, puzzle_id, "FOOBAR");
        state.store().put_pseudo_answer(crate::domain::answer::PseudoAnswer {
            id: Uuid::new_v4(),
            puzzle_id,
            answer: "FOO".into(),
            response: "keep going".into(),
            sensitivity: Sensitivity::default(),
        });
        let session =
            start_session(&state, &solver, StartSessionRequest { puzzle_id }).expect("start");

        let view = submit_guess(
            &state,
            &solver,
            session.id,
            GuessRequest { guess: "foo".into() },
        )
        .expect("guess");
        assert!(!view.solved);
        assert_eq!(view.guesses[0].verdict, Verdict::PartiallyCorrect);
        assert_eq!(view.guesses[0].partial_response.as_deref(), Some("keep going"));
    }

    #[test]
    fn finishing_spoils_the_solver_and_feeds_the_averages() {
        let (state, solver, puzzle_id) = setup();
        let session =
            start_session(&state, &solver, StartSessionRequest { puzzle_id }).expect("start");

        let view = finish_session(
            &state,
            &solver,
            session.id,
            FinishRequest {
                fun_rating: Some(5),
                difficulty_rating: Some(3),
                hours_spent: Some(2.0),
                general_feedback: "loved it".into(),
                misc_feedback: String::new(),
            },
        )
        .expect("finish");
        assert_eq!(view.average_fun, Some(5.0));
        assert!(view.puzzle_title.contains("Secret"));

        let puzzle = state.store().puzzle(puzzle_id).unwrap();
        assert!(puzzle.spoiled.contains(&solver.id));
    }

    #[test]
    fn out_of_range_ratings_are_rejected() {
        let (state, solver, puzzle_id) = setup();
        let session =
            start_session(&state, &solver, StartSessionRequest { puzzle_id }).expect("start");
        let err = finish_session(
            &state,
            &solver,
            session.id,
            FinishRequest {
                fun_rating: Some(9),
                difficulty_rating: None,
                hours_spent: None,
                general_feedback: String::new(),
                misc_feedback: String::new(),
            },
        );
        assert!(matches!(err, Err(ServiceError::InvalidInput(_))));
    }

    #[test]
    fn joining_follows_the_joinable_flag() {
        let (state, solver, puzzle_id) = setup();
        let session =
            start_session(&state, &solver, StartSessionRequest { puzzle_id }).expect("start");
        let other = make_user(&state, false);
        let view = join_session(&state, &other, session.id).expect("join");
        assert_eq!(view.participants.len(), 2);

        // Idempotent for existing participants.
        let view = join_session(&state, &other, session.id).expect("rejoin");
        assert_eq!(view.participants.len(), 2);
    }

    #[test]
    fn escape_delists_an_emptied_session() {
        let (state, solver, puzzle_id) = setup();
        let session =
            start_session(&state, &solver, StartSessionRequest { puzzle_id }).expect("start");
        assert_eq!(list_joinable(&state, &solver).len(), 1);

        escape_session(&state, &solver, session.id).expect("escape");
        assert!(list_joinable(&state, &solver).is_empty());
        assert!(matches!(
            escape_session(&state, &solver, session.id),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn answers_assigned_mid_session_start_counting() {
        let (state, solver, puzzle_id) = setup();
        let session =
            start_session(&state, &solver, StartSessionRequest { puzzle_id }).expect("start");

        // No answers yet, so even the right text is incorrect.
        let view = submit_guess(
            &state,
            &solver,
            session.id,
            GuessRequest {
                guess: "answer1".into(),
            },
        )
        .expect("guess");
        assert_eq!(view.guesses[0].verdict, Verdict::Incorrect);
        assert!(!view.solved);

        assign_answer(&state, puzzle_id, "answer1");
        let view = submit_guess(
            &state,
            &solver,
            session.id,
            GuessRequest {
                guess: "Answer1".into(),
            },
        )
        .expect("guess");
        assert_eq!(view.guesses[1].verdict, Verdict::Correct);
        assert!(view.solved);
    }

    #[test]
    fn close_is_coordinator_only_and_terminal() {
        let (state, solver, puzzle_id) = setup();
        let session =
            start_session(&state, &solver, StartSessionRequest { puzzle_id }).expect("start");
        assert!(matches!(
            close_session(&state, &solver, session.id),
            Err(ServiceError::PermissionDenied(_))
        ));

        let coordinator = make_user(&state, true);
        let view = close_session(&state, &coordinator, session.id).expect("close");
        assert!(view.ended.is_some());
        assert!(matches!(
            close_session(&state, &coordinator, session.id),
            Err(ServiceError::InvalidState(_))
        ));

        // Closing a session on a still-testsolving puzzle pulls it back.
        let puzzle = state.store().puzzle(puzzle_id).unwrap();
        assert_eq!(puzzle.status, Status::Writing);

        let other = make_user(&state, false);
        assert!(matches!(
            join_session(&state, &other, session.id),
            Err(ServiceError::InvalidState(_))
        ));
        assert!(matches!(
            submit_guess(
                &state,
                &solver,
                session.id,
                GuessRequest {
                    guess: "too late".into(),
                },
            ),
            Err(ServiceError::InvalidState(_))
        ));
    }
}
