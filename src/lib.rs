//! Feed Digest - a static feed aggregator
//!
//! Fetches RSS, Atom and JSON feeds, merges their entries newest first and
//! renders them as a single HTML page.

pub mod cli;
pub mod config;
pub mod digest;
pub mod error;
pub mod feed;
pub mod fetcher;
pub mod merge;
pub mod nonce;
pub mod normalize;
pub mod render;
pub mod sources;
