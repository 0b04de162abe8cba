use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "feed-digest")]
#[command(about = "Aggregate a collection of feeds into a static HTML page")]
#[command(
    long_about = "Aggregate a collection of feeds into a static HTML page. \
                  RSS, Atom and JSON feeds are supported. Sources are read from \
                  the arguments, from stdin when it is piped, and from --input."
)]
#[command(after_help = "Examples:\n  \
    feed-digest lovergne.dev/rss.xml > index.html\n  \
    cat feeds.txt | feed-digest > index.html")]
#[command(version)]
pub struct Cli {
    /// Feed URLs or paths
    pub sources: Vec<String>,

    /// File with one feed source per line
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Name of the page
    #[arg(short, long)]
    pub name: Option<String>,

    /// Maximum number of items on the page
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Template file used instead of the built-in page ("" for the built-in one)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Stylesheet linked from the page
    #[arg(short, long)]
    pub stylesheet: Option<String>,

    /// Let the page load remote images
    #[arg(long)]
    pub allow_images: bool,

    /// Number of feeds fetched at the same time
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// More logging on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Override config values with the flags that were given.
    pub fn apply(&self, config: &mut Config) {
        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if let Some(limit) = self.limit {
            config.limit = limit;
        }
        if let Some(template) = &self.template {
            config.template = PathBuf::from(template);
        }
        if let Some(stylesheet) = &self.stylesheet {
            config.stylesheet = stylesheet.clone();
        }
        if self.allow_images {
            config.allow_images = true;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "feed_digest=warn",
            1 => "feed_digest=info",
            _ => "feed_digest=debug",
        }
    }
}
