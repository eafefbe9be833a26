//! Read-only HTTP proxy over GitHub's GraphQL API exposing the discussions
//! of a single category.

pub mod api;
pub mod config;
pub mod github;
pub mod state;
