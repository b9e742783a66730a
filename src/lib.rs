//! Library crate for puzzup-back, exposing modules for binaries and integration tests.

pub mod config;
pub mod dao;
pub mod domain;
mod dto;
mod error;
pub mod integrations;
pub mod routes;
pub mod services;
pub mod state;
