//! bugdesk - a terminal bug tracker.
//!
//! Bugs are listed in a table and created or edited through one form that
//! opens as a modal (new bug) or a drawer (existing bug). Data goes through
//! the [`api::BugRepository`] trait; the bundled implementation keeps
//! everything in memory with simulated latency.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod form;
pub mod logging;
pub mod tasks;
pub mod ui;
