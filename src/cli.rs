//! CLI definitions for Zapper.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Zapper CLI.
#[derive(Parser)]
#[command(name = "zapper")]
#[command(about = "Point-and-hide element zapping with per-URL persistence")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Print the selector generated for the element at a viewport point
    Selector {
        /// Page snapshot (JSON)
        #[arg(long)]
        page: PathBuf,

        #[arg(long)]
        x: f64,

        #[arg(long)]
        y: f64,
    },

    /// Zap the element at a viewport point and record it
    Zap {
        /// Page snapshot (JSON)
        #[arg(long)]
        page: PathBuf,

        #[arg(long)]
        x: f64,

        #[arg(long)]
        y: f64,

        /// Write the resulting page snapshot here
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Re-apply recorded zaps to a page and print the report
    Restore {
        /// Page snapshot (JSON)
        #[arg(long)]
        page: PathBuf,

        /// Write the resulting page snapshot here
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// List stored zap records
    List {
        /// Only show the record for this URL
        #[arg(long)]
        url: Option<String>,
    },

    /// Deliver one core message to a page
    Message {
        /// Page snapshot (JSON)
        #[arg(long)]
        page: PathBuf,

        /// Message body, e.g. '{"action":"zapElement","x":10,"y":20}'
        #[arg(long)]
        json: String,

        /// Write the resulting page snapshot here
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}
