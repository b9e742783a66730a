use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the puzzle production tracker.
#[openapi(
    paths(
        crate::routes::health::healthz,
        crate::routes::statuses::list_statuses,
        crate::routes::users::create_user,
        crate::routes::users::list_users,
        crate::routes::puzzles::create_puzzle,
        crate::routes::puzzles::list_puzzles,
        crate::routes::puzzles::get_puzzle,
        crate::routes::puzzles::change_status,
        crate::routes::puzzles::transitions,
        crate::routes::puzzles::spoil,
        crate::routes::puzzles::unspoil,
        crate::routes::puzzles::add_pseudo_answer,
        crate::routes::rounds::create_round,
        crate::routes::rounds::list_rounds,
        crate::routes::rounds::spoil_round,
        crate::routes::rounds::create_answer,
        crate::routes::rounds::assign_answer,
        crate::routes::testsolves::start_session,
        crate::routes::testsolves::list_sessions,
        crate::routes::testsolves::get_session,
        crate::routes::testsolves::join_session,
        crate::routes::testsolves::submit_guess,
        crate::routes::testsolves::finish_session,
        crate::routes::testsolves::escape_session,
        crate::routes::testsolves::close_session,
        crate::routes::events::event_stream,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::user::CreateUserRequest,
            crate::dto::user::UserView,
            crate::dto::puzzle::CreatePuzzleRequest,
            crate::dto::puzzle::ChangeStatusRequest,
            crate::dto::puzzle::SpoilRequest,
            crate::dto::puzzle::UnspoilRequest,
            crate::dto::puzzle::CreatePseudoAnswerRequest,
            crate::dto::puzzle::StatusView,
            crate::dto::puzzle::TransitionView,
            crate::dto::puzzle::PuzzleView,
            crate::dto::round::CreateRoundRequest,
            crate::dto::round::CreateAnswerRequest,
            crate::dto::round::AnswerView,
            crate::dto::round::RoundView,
            crate::dto::testsolve::StartSessionRequest,
            crate::dto::testsolve::GuessRequest,
            crate::dto::testsolve::FinishRequest,
            crate::dto::testsolve::GuessView,
            crate::dto::testsolve::ParticipationView,
            crate::dto::testsolve::SessionView,
            crate::state::events::DomainEvent,
            crate::dao::store::StoreStats,
            crate::domain::status::Status,
            crate::domain::testsolve::Verdict,
            crate::domain::user::Capability,
            crate::domain::puzzle::Priority,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "statuses", description = "The workflow status registry"),
        (name = "puzzles", description = "Puzzle lifecycle and spoiler management"),
        (name = "rounds", description = "Rounds and answer assignment"),
        (name = "testsolves", description = "Testsolve session lifecycle"),
        (name = "events", description = "Server-sent domain events"),
    )
)]
pub struct ApiDoc;
