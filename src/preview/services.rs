use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

const USER_AGENT: &str = "BudgetTracker/1.0";
const FETCH_TIMEOUT: Duration = Duration::from_secs(6);

/// Meta tags consulted for a preview image, highest priority first.
const META_KEYS: [&str; 3] = ["og:image:secure_url", "og:image", "twitter:image"];

/// Best-effort social preview image lookup for a page URL. Implementations
/// must absorb every failure: a `None` is the only bad outcome a caller sees.
#[async_trait]
pub trait PreviewFetcher: Send + Sync {
    async fn fetch_preview_image(&self, url: &str) -> Option<String>;
}

pub struct OpenGraphFetcher {
    client: reqwest::Client,
}

impl OpenGraphFetcher {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PreviewFetcher for OpenGraphFetcher {
    async fn fetch_preview_image(&self, url: &str) -> Option<String> {
        let page_url = Url::parse(url).ok()?;
        if !matches!(page_url.scheme(), "http" | "https") {
            debug!(%url, "preview fetch skipped for non-http url");
            return None;
        }

        let response = match self.client.get(page_url.clone()).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(%url, error = %e, "preview fetch failed");
                return None;
            }
        };
        if response.status().as_u16() >= 400 {
            debug!(%url, status = %response.status(), "preview fetch rejected");
            return None;
        }
        let body = response.text().await.ok()?;

        extract_preview_image(&body, &page_url)
    }
}

/// Pulls the first matching meta tag content out of the page, resolving
/// relative image URLs against the page URL.
fn extract_preview_image(html: &str, page_url: &Url) -> Option<String> {
    let document = Html::parse_document(html);
    for key in META_KEYS {
        let Ok(selector) = Selector::parse(&format!("meta[property={key:?}], meta[name={key:?}]"))
        else {
            continue;
        };
        for element in document.select(&selector) {
            if let Some(content) = element.value().attr("content") {
                let content = content.trim();
                if !content.is_empty() {
                    return page_url.join(content).ok().map(|u| u.to_string());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://shop.example/item/42").unwrap()
    }

    #[test]
    fn prefers_secure_og_image() {
        let html = r#"
            <html><head>
                <meta name="twitter:image" content="https://cdn.example/tw.png">
                <meta property="og:image" content="https://cdn.example/og.png">
                <meta property="og:image:secure_url" content="https://cdn.example/secure.png">
            </head></html>
        "#;
        assert_eq!(
            extract_preview_image(html, &base()),
            Some("https://cdn.example/secure.png".into())
        );
    }

    #[test]
    fn falls_back_to_og_image_then_twitter() {
        let html = r#"<meta property="og:image" content="https://cdn.example/og.png">
                      <meta name="twitter:image" content="https://cdn.example/tw.png">"#;
        assert_eq!(
            extract_preview_image(html, &base()),
            Some("https://cdn.example/og.png".into())
        );

        let html = r#"<meta name="twitter:image" content="https://cdn.example/tw.png">"#;
        assert_eq!(
            extract_preview_image(html, &base()),
            Some("https://cdn.example/tw.png".into())
        );
    }

    #[test]
    fn resolves_relative_image_urls() {
        let html = r#"<meta property="og:image" content="/images/cover.jpg">"#;
        assert_eq!(
            extract_preview_image(html, &base()),
            Some("https://shop.example/images/cover.jpg".into())
        );
    }

    #[test]
    fn missing_or_empty_tags_yield_none() {
        assert_eq!(extract_preview_image("<html></html>", &base()), None);
        let html = r#"<meta property="og:image" content="  ">"#;
        assert_eq!(extract_preview_image(html, &base()), None);
    }

    #[tokio::test]
    async fn rejects_non_http_schemes() {
        let fetcher = OpenGraphFetcher::new().unwrap();
        assert_eq!(
            fetcher.fetch_preview_image("ftp://files.example/a").await,
            None
        );
        assert_eq!(fetcher.fetch_preview_image("not a url").await, None);
    }
}
