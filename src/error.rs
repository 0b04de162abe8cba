use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("you must supply at least one feed source")]
    Usage,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("error opening input file {}: {source}", .path.display())]
    InputFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error for {source_id}: {message}")]
    FeedParse { source_id: String, message: String },

    #[error("error loading html template {}: {source}", .path.display())]
    TemplateLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error rendering html template: {0}")]
    Template(#[from] minijinja::Error),

    #[error("error rendering html template: {0}")]
    Render(#[from] askama::Error),

    #[error("failed to generate nonce: {0}")]
    Entropy(#[from] rand::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
