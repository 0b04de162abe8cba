#![allow(dead_code)]

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build an RSS document; each item is (title, link, pubDate).
pub fn rss(title: &str, link: &str, items: &[(&str, &str, Option<&str>)]) -> String {
    let entries: String = items
        .iter()
        .map(|(title, link, date)| {
            let date = date
                .map(|d| format!("<pubDate>{}</pubDate>", d))
                .unwrap_or_default();
            format!(
                "<item><title>{}</title><link>{}</link><description>About {}</description>{}</item>",
                title, link, title, date
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>{}</title><link>{}</link>{}</channel></rss>"#,
        title, link, entries
    )
}

pub async fn mount_feed(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/rss+xml")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

pub async fn mount_missing(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

/// Two working feeds at /alpha.xml and /beta.xml and a broken /broken.xml.
pub async fn three_feed_server() -> MockServer {
    let server = MockServer::start().await;

    mount_feed(
        &server,
        "/alpha.xml",
        rss(
            "Alpha",
            "https://alpha.example.com",
            &[
                ("Alpha newest", "https://www.alpha.example.com/3", Some("Wed, 03 Jan 2024 12:00:00 GMT")),
                ("Alpha oldest", "https://www.alpha.example.com/1", Some("Mon, 01 Jan 2024 12:00:00 GMT")),
            ],
        ),
    )
    .await;
    mount_feed(
        &server,
        "/beta.xml",
        rss(
            "Beta",
            "https://beta.example.org",
            &[
                ("Beta middle", "https://beta.example.org/2", Some("Tue, 02 Jan 2024 12:00:00 GMT")),
                ("Beta undated", "https://beta.example.org/x", None),
            ],
        ),
    )
    .await;
    mount_missing(&server, "/broken.xml").await;

    server
}
