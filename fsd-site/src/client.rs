//! HTTP access to the project reference pages.

use crate::error::{Result, SiteError};
use log::debug;
use reqwest::{Client, StatusCode};
use scraper::Html;
use std::time::Duration;

/// Root every relative link is resolved against.
pub const SITE_ROOT: &str = "http://www.ciel-et-terre.net";

const USER_AGENT: &str = concat!("fsd/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A thin wrapper around `reqwest::Client` bound to one site root.
#[derive(Debug, Clone)]
pub struct SiteClient {
    client: Client,
    root: String,
}

impl SiteClient {
    pub fn new(root: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let root = root.into().trim_end_matches('/').to_string();
        Ok(SiteClient { client, root })
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Turn a link into a full address. Absolute addresses are kept as they
    /// are; anything else is joined to the root with exactly one slash.
    pub fn resolve(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") {
            target.to_string()
        } else {
            format!("{}/{}", self.root, target.trim_start_matches('/'))
        }
    }

    /// GET `target` and return the body. Any status other than 200 is an
    /// error; nothing is retried.
    pub async fn fetch_text(&self, target: &str) -> Result<String> {
        let url = self.resolve(target);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(SiteError::Fetch {
                url,
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    /// GET `target` and parse it as an HTML document.
    pub async fn fetch(&self, target: &str) -> Result<Html> {
        let body = self.fetch_text(target).await?;
        Ok(Html::parse_document(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[test]
    fn test_resolve() {
        let client = SiteClient::new("http://www.ciel-et-terre.net/").unwrap();
        assert_eq!(client.root(), SITE_ROOT);
        assert_eq!(
            client.resolve("our-floating-solar-power-plants-references/"),
            "http://www.ciel-et-terre.net/our-floating-solar-power-plants-references/"
        );
        assert_eq!(
            client.resolve("/projects/okegawa/"),
            "http://www.ciel-et-terre.net/projects/okegawa/"
        );
        assert_eq!(
            client.resolve("https://example.org/page"),
            "https://example.org/page"
        );
    }

    #[tokio::test]
    async fn test_fetch_parses_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/okegawa/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body><h1>Okegawa</h1></body></html>"),
            )
            .mount(&server)
            .await;

        let client = SiteClient::new(server.uri()).unwrap();
        let document = client.fetch("projects/okegawa/").await.unwrap();
        let h1 = Selector::parse("h1").unwrap();
        let heading: String = document.select(&h1).next().unwrap().text().collect();
        assert_eq!(heading, "Okegawa");
    }

    #[tokio::test]
    async fn test_fetch_non_ok_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = SiteClient::new(server.uri()).unwrap();
        match client.fetch_text("/missing/").await {
            Err(SiteError::Fetch { url, status }) => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/missing/"));
            }
            other => panic!("expected fetch error, got {:?}", other),
        }
    }
}
