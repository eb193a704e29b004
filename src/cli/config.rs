use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "page-perception",
    version,
    about = "Perception passes over captured web pages: identity, metadata, interactability, obstructions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write a JSONL perception trace to this path
    #[arg(long, global = true)]
    pub trace: Option<String>,

    /// Path to config file (default: page-perception.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Snapshot every element's metadata from a page capture
    Snapshot {
        /// Path to the captured page JSON
        #[arg(long)]
        page: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Append a SHA-1 digest of the record sequence
        #[arg(long)]
        digest: bool,
    },

    /// List the uids of currently actionable elements
    Active {
        /// Path to the captured page JSON
        #[arg(long)]
        page: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Compute the obstruction ledger for the given interesting elements
    Suppress {
        /// Path to the captured page JSON
        #[arg(long)]
        page: String,

        /// CSS selector of an interesting element (repeatable)
        #[arg(long = "selector")]
        selectors: Vec<String>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `page-perception.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub suppress: SuppressConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default)]
    pub pretty: bool,

    #[serde(default)]
    pub digest: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuppressConfig {
    /// Selectors suppressed by default when the command passes none.
    #[serde(default)]
    pub selectors: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("page-perception.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}
