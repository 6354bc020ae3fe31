//! CLI module for framedoc
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::adapters::AppConfig;

pub mod args;
pub mod commands;

/// framedoc
///
/// Samples a video at a fixed interval and saves the frames as a PDF,
/// one frame per page.
#[derive(Parser, Debug)]
#[command(name = "framedoc")]
#[command(about = "Turn an online video into a PDF of frames sampled at a fixed interval")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, env = "FRAMEDOC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// The command to execute; prompts interactively when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prompt for a link and an interval, then convert
    Interactive,
    /// Convert a video without prompting
    Convert(args::ConvertArgs),
    /// Run the HTTP server
    Serve(args::ServeArgs),
}

impl Cli {
    /// Apply the global flags on top of a loaded configuration
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if self.json_logs {
            config.json_logs = true;
        }
    }
}
