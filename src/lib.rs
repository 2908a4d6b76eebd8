//! rillchat: terminal chat client with a buffered reasoning/content
//! streaming pipeline
//!
//! Forwards user text to a hosted model-serving endpoint and renders the
//! reply incrementally. Replies arrive as newline-delimited records tagged
//! `reasoning` or `content`; the visible answer is withheld until the
//! reasoning trace is complete.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::too_many_lines)]

pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod messages;
pub mod services;
pub mod session;
pub mod tui;

// Re-exports for convenience
pub use error::{Result, RillError};
