// CLI configuration
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// oggdemux - Ogg/Vorbis stream inspection tool
#[derive(Parser, Debug)]
#[command(name = "oggdemux")]
#[command(about = "Inspect the pages and packets of Ogg Vorbis files", long_about = None)]
#[command(version)]
pub struct Config {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Quiet mode (only errors are printed to stderr)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Verify page checksums
    #[arg(long)]
    pub verify_crc: bool,

    /// Read stream options from a JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List page headers
    Pages {
        /// Ogg file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Validate Vorbis headers and list audio packets
    Packets {
        /// Ogg file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Stop after this many audio packets
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show the Vorbis comment header
    Tags {
        /// Ogg file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },
}

/// Output format for records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Pretty,
    /// One compact JSON object per line
    Json,
    /// Key-value pairs
    KeyValue,
}

impl Config {
    /// Default tracing filter for the selected verbosity.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}
