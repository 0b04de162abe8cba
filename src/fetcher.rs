use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::feed::{parse_feed, Feed, FetchedFeed, Item};

/// Feeds and items gathered from every source that could be fetched.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Feeds in source order
    pub feeds: Vec<Feed>,
    /// Items of all feeds concatenated in source order
    pub items: Vec<Item>,
    /// Sources that failed, with the reason
    pub failures: Vec<(String, String)>,
}

#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    concurrency: usize,
}

impl Fetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            concurrency: config.concurrency.max(1),
        })
    }

    /// Fetch every source, keeping whatever succeeds.
    ///
    /// Results are collected in source order whatever order the requests
    /// complete in.
    pub async fn fetch_all(&self, sources: &[String]) -> FetchOutcome {
        info!("Fetching {} feeds", sources.len());
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        let mut handles = Vec::with_capacity(sources.len());
        for source in sources {
            let fetcher = self.clone();
            let semaphore = semaphore.clone();
            let source = source.clone();

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                fetcher.fetch_feed(&source).await
            }));
        }

        let mut outcome = FetchOutcome::default();
        for (source, handle) in sources.iter().zip(handles) {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    error!("Fetch task for {} failed: {}", source, e);
                    outcome.failures.push((source.clone(), e.to_string()));
                    continue;
                }
            };

            match result {
                Ok(FetchedFeed { feed, items }) => {
                    info!("Fetched {} items from '{}'", items.len(), feed.title);
                    let index = outcome.feeds.len();
                    outcome.feeds.push(feed);
                    outcome
                        .items
                        .extend(items.into_iter().map(|item| Item { feed: index, ..item }));
                }
                Err(e) => {
                    warn!("could not fetch feed {}: {}", source, e);
                    outcome.failures.push((source.clone(), e.to_string()));
                }
            }
        }

        outcome
    }

    pub async fn fetch_feed(&self, source: &str) -> Result<FetchedFeed> {
        let bytes = match local_path(source) {
            Some(path) => {
                debug!("Reading feed file {}", path.display());
                tokio::fs::read(path).await?
            }
            None => {
                let url = web_address(source);
                debug!("Fetching feed {}", url);
                let response = self.client.get(&url).send().await?.error_for_status()?;
                response.bytes().await?.to_vec()
            }
        };

        parse_feed(source, &bytes)
    }
}

/// Path for `file://` sources and for sources naming an existing file.
fn local_path(source: &str) -> Option<&Path> {
    if let Some(path) = source.strip_prefix("file://") {
        return Some(Path::new(path));
    }
    if is_web_url(source) {
        return None;
    }
    let path = Path::new(source);
    path.is_file().then_some(path)
}

/// Scheme-less sources such as `example.com/rss.xml` are fetched over https.
fn web_address(source: &str) -> String {
    if is_web_url(source) {
        source.to_string()
    } else {
        format!("https://{}", source)
    }
}

fn is_web_url(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;
    use tempfile::NamedTempFile;

    mod address_tests {
        use super::*;

        #[test]
        fn test_web_url_kept() {
            assert_eq!(web_address("https://example.com/rss"), "https://example.com/rss");
            assert_eq!(web_address("HTTP://example.com/rss"), "HTTP://example.com/rss");
        }

        #[test]
        fn test_scheme_added() {
            assert_eq!(web_address("lovergne.dev/rss.xml"), "https://lovergne.dev/rss.xml");
        }

        #[test]
        fn test_file_scheme_is_local() {
            assert_eq!(
                local_path("file:///tmp/feed.xml"),
                Some(Path::new("/tmp/feed.xml"))
            );
        }

        #[test]
        fn test_missing_path_is_not_local() {
            assert_eq!(local_path("example.com/rss.xml"), None);
            assert_eq!(local_path("https://example.com/rss.xml"), None);
        }

        #[test]
        fn test_existing_file_is_local() {
            let file = NamedTempFile::new().unwrap();
            let source = file.path().to_str().unwrap();
            assert_eq!(local_path(source), Some(file.path()));
        }
    }

    mod fetch_tests {
        use super::*;

        const RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Local Feed</title>
    <link>https://local.example.com</link>
    <item>
      <title>Local item</title>
      <link>https://local.example.com/1</link>
      <pubDate>Tue, 02 Jan 2024 00:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

        fn feed_file() -> NamedTempFile {
            let mut file = NamedTempFile::new().unwrap();
            file.write_all(RSS.as_bytes()).unwrap();
            file
        }

        #[tokio::test]
        async fn test_fetch_local_file() {
            let file = feed_file();
            let fetcher = Fetcher::new(&Config::default()).unwrap();

            let fetched = fetcher
                .fetch_feed(file.path().to_str().unwrap())
                .await
                .unwrap();

            assert_eq!(fetched.feed.title, "Local Feed");
            assert_eq!(fetched.items.len(), 1);
        }

        #[tokio::test]
        async fn test_missing_file_scheme_fails() {
            let fetcher = Fetcher::new(&Config::default()).unwrap();
            let result = fetcher.fetch_feed("file:///nonexistent/feed.xml").await;
            assert!(matches!(result, Err(Error::Io(_))));
        }

        #[tokio::test]
        async fn test_fetch_all_assigns_feed_indexes() {
            let first = feed_file();
            let second = feed_file();
            let sources = vec![
                first.path().to_str().unwrap().to_string(),
                "file:///nonexistent/feed.xml".to_string(),
                second.path().to_str().unwrap().to_string(),
            ];
            let fetcher = Fetcher::new(&Config::default()).unwrap();

            let outcome = fetcher.fetch_all(&sources).await;

            assert_eq!(outcome.feeds.len(), 2);
            assert_eq!(outcome.items.len(), 2);
            assert_eq!(outcome.items[0].feed, 0);
            assert_eq!(outcome.items[1].feed, 1);
            assert_eq!(outcome.feeds[1].source, sources[2]);
            assert_eq!(outcome.failures.len(), 1);
            assert_eq!(outcome.failures[0].0, "file:///nonexistent/feed.xml");
        }

        #[tokio::test]
        async fn test_fetch_all_empty() {
            let fetcher = Fetcher::new(&Config::default()).unwrap();
            let outcome = fetcher.fetch_all(&[]).await;
            assert!(outcome.feeds.is_empty());
            assert!(outcome.failures.is_empty());
        }
    }
}
