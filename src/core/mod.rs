//! # Core Application Logic
//!
//! Quill's business logic. It knows nothing about any specific UI
//! technology: the TUI adapter translates terminal events into [`action`]
//! values and performs the I/O that `update()` requests via effects.
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct holding all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`config`]: TOML configuration with layered overrides
//! - [`conversation`]: File-backed conversation store

pub mod action;
pub mod config;
pub mod conversation;
pub mod state;
