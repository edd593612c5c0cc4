//! smpl CLI library.
//!
//! This crate provides the terminal front end for the stopwatch: argument
//! parsing, configuration, theme persistence and the interactive session.

mod cli;
pub mod commands;
mod config;
pub mod terminal;
pub mod theme_store;

pub use cli::{Cli, Commands, ThemeAction};
pub use config::Config;
