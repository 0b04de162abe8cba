use std::io::Write;

use rand::{CryptoRng, RngCore};
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetcher::Fetcher;
use crate::merge::merge;
use crate::nonce::{generate_nonce, NONCE_BYTES};
use crate::render::{renderer_for, Helpers, Metadata, Page};

/// What a finished run produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub feeds: usize,
    pub items: usize,
    pub failures: Vec<(String, String)>,
}

/// Fetch `sources`, merge their items and write the page to `out`.
///
/// Sources that fail are logged and skipped. Template and entropy problems
/// are fatal; whatever was already written to `out` stays there.
pub async fn run<R>(
    config: &Config,
    sources: &[String],
    rng: &mut R,
    out: &mut dyn Write,
) -> Result<RunSummary>
where
    R: RngCore + CryptoRng,
{
    if sources.is_empty() {
        return Err(Error::Usage);
    }

    let renderer = renderer_for(config, Helpers::default())?;
    let nonce = generate_nonce(rng, NONCE_BYTES)?;

    let fetcher = Fetcher::new(config)?;
    let outcome = fetcher.fetch_all(sources).await;

    let items = merge(outcome.items, config.limit);
    info!(
        "Rendering {} items from {} feeds",
        items.len(),
        outcome.feeds.len()
    );

    let page = Page {
        items,
        feeds: outcome.feeds,
        metadata: Metadata::new(config, nonce),
    };
    renderer.render(&page, out)?;

    Ok(RunSummary {
        feeds: page.feeds.len(),
        items: page.items.len(),
        failures: outcome.failures,
    })
}
