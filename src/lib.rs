//! Wave: simulated affiliate-sales dashboard backend.
//!
//! The metrics feed, pt-BR formatting, chart geometry, the canned `/wave-ai`
//! responder and the in-memory record stores live here; `main.rs` is a thin
//! clap front end over [`cli`].

pub mod ai;
pub mod analytics;
pub mod catalog;
pub mod chart;
pub mod cli;
pub mod config;
pub mod format;
pub mod metrics;
pub mod web;
