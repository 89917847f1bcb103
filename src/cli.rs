use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "atomodon")]
#[command(version, about = "Render a Mastodon account's public posts as an Atom feed")]
pub struct Args {
    /// Mastodon server hostname, e.g. mastodon.social
    pub server: String,

    /// Account name on that server, without the leading @
    pub username: String,

    /// Enable info-level logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug-level logging
    #[arg(long)]
    pub debug: bool,

    /// Persistent response cache file, only for testing
    #[arg(long, value_name = "FILE")]
    pub cache: Option<PathBuf>,

    /// Write the feed to FILE instead of standard output
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl Args {
    /// Default log filter directive derived from the verbosity flags.
    /// `RUST_LOG` still takes precedence when set.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}
