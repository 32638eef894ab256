//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Annotation | Todo content heads | `parse`, `new` |
//! | Timestamp | 5-character tokens | `encode`, `decode` |
//! | Status | Marker classification | `rank`, `cycle`, `transition` |
//! | Ordering | Views over scanner output | `sort --filter active` |
//! | Config | Profiles and state sets | `config show`, `config use` |
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! unitodo --verbose sort todos.json
//! ```

mod annotate;
mod app;
mod config_cmd;
mod output;
mod sort_cmd;
mod status_cmd;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
