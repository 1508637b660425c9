//! Library catalog backend
//!
//! A GraphQL API over authors, books and users, with bearer-token
//! authentication for catalog edits.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod graphql;
pub mod services;

pub use app::{AppState, build_app};
