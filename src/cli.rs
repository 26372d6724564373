use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vodpath")]
#[command(author, version, about = "Decode media-segment request paths")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a request uri and display what it selects
    Parse {
        /// Request uri, e.g. /content/movie.mp4/seg-1-v1.ts
        #[arg(required = true)]
        uri: String,

        /// Treat the uri as a progressive download (no file name)
        #[arg(long)]
        progressive: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
