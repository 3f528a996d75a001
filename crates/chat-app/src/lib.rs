//! Terminal front-end for phone-verified Gemini chat rooms.

pub mod commands;
pub mod config;
pub mod error;
pub mod validation;
