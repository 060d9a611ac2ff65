//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// notes-tutor — answer questions about an uploaded document.
#[derive(Parser, Debug)]
#[command(name = "tutor-server", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server (default).
    Serve,
    /// Run a single invocation event from a JSON file and print the response.
    Invoke {
        /// Path to an event JSON file (`{httpMethod, isBase64Encoded, body}`).
        event: PathBuf,
    },
}
