//! CLI flag definitions and handlers
//!
//! This module organizes the CLI into logical submodules:
//! - [`commands`] - Flag definitions and action resolution
//! - [`handlers`] - Action execution handlers

mod commands;
mod handlers;

pub use commands::*;
pub use handlers::*;
