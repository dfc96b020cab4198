//! reckon-core library.
//!
//! Pure model and formatting layer for the reckon estimation editor:
//!
//! - [`model`] — estimates, tasks, subtasks, and the never-empty task list.
//! - [`rollup`] — unit-carrying aggregation of subtask estimates.
//! - [`render`] — the deterministic Markdown export document.
//! - [`config`] — optional `.reckon.toml` heading overrides.
//!
//! # Conventions
//!
//! - **Errors**: typed errors (`thiserror`) at the model seams,
//!   `anyhow::Result` with context at I/O boundaries.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod config;
pub mod model;
pub mod render;
pub mod rollup;
