//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{annotate, config_cmd, sort_cmd, status_cmd};
use crate::domain::FilterMode;

#[derive(Parser)]
#[command(name = "unitodo")]
#[command(author, version, about = "Parse, classify and order TODO annotations")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, short = 'c', global = true, env = "UNITODO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse the content of a todo line into its parts
    Parse {
        /// Text following the status marker
        #[arg(allow_hyphen_values = true)]
        line: String,
    },

    /// Build a new todo line (`<open marker> <priority>@<timestamp> <text>`)
    New {
        /// Todo text
        text: String,

        /// Priority prefix (letters and digits)
        #[arg(long, short)]
        priority: Option<String>,

        /// Creation time as RFC 3339 (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Encode an instant as a 5-character timestamp token
    Encode {
        /// Instant as RFC 3339 (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Decode a 5-character timestamp token
    Decode {
        /// Token, with or without a leading `@` or `@@`
        token: String,
    },

    /// Classify a status marker
    Rank {
        /// Status marker, e.g. `TODO` or `- [x]`
        #[arg(allow_hyphen_values = true)]
        marker: String,
    },

    /// Show the next marker in the marker's state cycle
    Cycle {
        /// Current status marker
        #[arg(allow_hyphen_values = true)]
        marker: String,

        /// Step backwards instead of forwards
        #[arg(long, short)]
        backward: bool,
    },

    /// Rewrite todo content for a status change
    Transition {
        /// Text following the status marker
        #[arg(allow_hyphen_values = true)]
        content: String,

        /// Current status marker
        #[arg(long, allow_hyphen_values = true)]
        from: String,

        /// New status marker
        #[arg(long, allow_hyphen_values = true)]
        to: String,

        /// Transition time as RFC 3339 (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Close a todo: switch to the paired done marker and stamp the content
    MarkDone {
        /// Text following the status marker
        #[arg(allow_hyphen_values = true)]
        content: String,

        /// Current (open) status marker
        #[arg(long, allow_hyphen_values = true)]
        from: String,

        /// Completion time as RFC 3339 (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Filter and order scanner output
    ///
    /// Reads `{"categories":[{"name":..,"todos":[..]}]}` from FILE or stdin.
    Sort {
        /// Scanner output file (reads stdin when omitted or `-`)
        file: Option<PathBuf>,

        /// Which records to keep: all, active or closed
        #[arg(long)]
        filter: Option<FilterMode>,

        /// Case-insensitive search over content and location
        #[arg(long, short)]
        query: Option<String>,
    },

    /// Inspect or edit the configuration
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);
    let config_path = cli.config.as_deref();

    output.verbose("unitodo starting");

    match cli.command {
        Commands::Parse { line } => annotate::parse_line(&output, &line)?,
        Commands::New { text, priority, at } => {
            annotate::new_todo(&output, config_path, &text, priority.as_deref(), at.as_deref())?
        }
        Commands::Encode { at } => annotate::encode(&output, at.as_deref())?,
        Commands::Decode { token } => annotate::decode(&output, &token)?,

        Commands::Rank { marker } => status_cmd::rank(&output, config_path, &marker)?,
        Commands::Cycle { marker, backward } => {
            status_cmd::cycle(&output, config_path, &marker, backward)?
        }
        Commands::Transition { content, from, to, at } => {
            status_cmd::transition(&output, config_path, &content, &from, &to, at.as_deref())?
        }
        Commands::MarkDone { content, from, at } => {
            status_cmd::mark_done(&output, config_path, &content, &from, at.as_deref())?
        }

        Commands::Sort { file, filter, query } => {
            output.verbose_ctx(
                "sort",
                &format!("filter={:?}, query={:?}, file={:?}", filter, query, file),
            );
            sort_cmd::run(&output, config_path, file.as_deref(), filter, query.as_deref())?
        }

        Commands::Config(cmd) => config_cmd::run(cmd, &output, config_path)?,
    }

    Ok(())
}
