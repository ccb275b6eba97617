//! CLI definitions for Prompt Assist.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Prompt Assist CLI.
#[derive(Parser)]
#[command(name = "promptassist")]
#[command(about = "Improve-prompt button for AI chat pages")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.promptassist/config.toml)
    #[arg(short, long, global = true, env = "PROMPTASSIST_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Manage the stored Gemini API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// List registered site descriptors in lookup order
    Sites,

    /// Show which site descriptor a page URL resolves to
    Resolve {
        /// Page URL
        url: String,
    },

    /// Check the configuration file
    Validate,

    /// Improve a prompt and print the result
    Improve {
        /// Prompt text
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Run the overlay against a JSON page fixture
    Attach {
        /// Page fixture file
        #[arg(long)]
        page: PathBuf,

        /// Replace the first bound input's text
        #[arg(long = "type", value_name = "TEXT")]
        type_text: Option<String>,

        /// Click the first bound input's button and wait for the outcome
        #[arg(long)]
        click: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum KeyAction {
    /// Save an API key
    Set {
        /// Gemini API key
        key: String,
    },

    /// Show whether a key is stored
    Show,

    /// Remove the stored key
    Clear,
}
