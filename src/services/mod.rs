/// Actor resolution from request headers.
pub mod auth;
/// OpenAPI documentation generation.
pub mod documentation;
/// Domain event streaming over SSE.
pub mod event_service;
/// Health check service.
pub mod health_service;
/// Puzzle lifecycle, status changes, and spoiler management.
pub mod puzzle_service;
/// Rounds and answer assignment.
pub mod round_service;
/// Testsolve session lifecycle.
pub mod testsolve_service;
/// User management.
pub mod user_service;
