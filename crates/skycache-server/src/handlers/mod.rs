//! # Web API Handlers
//!
//! Handlers receive the shared [`AppState`](crate::state::AppState) through
//! axum's `State` extractor and never touch process globals.

pub mod cache;
pub mod health;
pub mod weather;
