use crate::config::LoaderConfig;
use crate::error::FetchError;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Walks the page down in 1000px steps, then settles for a second so
/// lazily loaded testimonials, images and embeds are in the DOM at capture.
const SCROLL_TO_BOTTOM_JS: &str = r#"async () => {
  const step = 1000;
  for (let y = 0; y < document.body.scrollHeight; y += step) {
    window.scrollTo(0, y);
    await new Promise((resolve) => setTimeout(resolve, 100));
  }
  window.scrollTo(0, document.body.scrollHeight);
  await new Promise((resolve) => setTimeout(resolve, 1000));
  return true;
}"#;

/// Loads the rendered markup of the page under audit.
///
/// With a Browserless endpoint configured the page is rendered in a headless
/// browser via `/content`; otherwise it is fetched with a plain GET.
pub struct PageLoader {
    client: Client,
    config: LoaderConfig,
}

impl PageLoader {
    pub fn new(config: LoaderConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, config })
    }

    pub fn uses_browser(&self) -> bool {
        self.config.browserless_url.is_some()
    }

    /// Prepend `https://` to scheme-less input and validate the result.
    pub fn normalize_url(raw: &str) -> Result<Url, FetchError> {
        let trimmed = raw.trim();
        let candidate = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        let url = Url::parse(&candidate).map_err(|e| FetchError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" if url.host_str().is_some() => Ok(url),
            scheme => Err(FetchError::InvalidUrl {
                url: raw.to_string(),
                reason: format!("unsupported scheme '{}'", scheme),
            }),
        }
    }

    pub async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let markup = match &self.config.browserless_url {
            Some(base_url) => self.fetch_rendered(base_url, url).await?,
            None => self.fetch_direct(url).await?,
        };

        debug!(url = %url, bytes = markup.len(), "page loaded");
        ensure_selector(&markup, &self.config.wait_for, url)?;
        Ok(markup)
    }

    async fn fetch_direct(&self, url: &Url) -> Result<String, FetchError> {
        info!(url = %url, "fetching page over HTTP");

        let response = self.client.get(url.as_str()).send().await?;
        Self::read_body(response).await
    }

    async fn fetch_rendered(&self, base_url: &str, url: &Url) -> Result<String, FetchError> {
        info!(url = %url, browserless = base_url, "rendering page via Browserless");

        let mut endpoint = format!("{}/content", base_url.trim_end_matches('/'));
        if let Some(token) = &self.config.browserless_token {
            endpoint.push_str(&format!("?token={token}"));
        }

        let body = self.rendered_request_body(url);

        let response = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        Self::read_body(response).await
    }

    /// Browserless `/content` payload: navigation, optional lazy-load scroll,
    /// then the readiness selector.
    fn rendered_request_body(&self, url: &Url) -> serde_json::Value {
        let timeout_ms = self.config.timeout_seconds * 1000;
        let mut body = serde_json::json!({
            "url": url.as_str(),
            "gotoOptions": { "waitUntil": "networkidle2" }
        });

        if self.config.scroll_for_lazy_content {
            body["waitForFunction"] = serde_json::json!({
                "fn": SCROLL_TO_BOTTOM_JS,
                "timeout": timeout_ms
            });
        }
        if !self.config.wait_for.trim().is_empty() {
            body["waitForSelector"] = serde_json::json!({
                "selector": self.config.wait_for,
                "timeout": timeout_ms
            });
        }

        body
    }

    async fn read_body(response: reqwest::Response) -> Result<String, FetchError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.text().await?)
    }
}

/// Fail the load when the readiness selector is absent from the markup.
/// An empty selector disables the check.
pub fn ensure_selector(markup: &str, wait_for: &str, url: &Url) -> Result<(), FetchError> {
    let wait_for = wait_for.trim();
    if wait_for.is_empty() {
        return Ok(());
    }

    let selector =
        Selector::parse(wait_for).map_err(|_| FetchError::InvalidSelector(wait_for.to_string()))?;

    if Html::parse_document(markup).select(&selector).next().is_none() {
        return Err(FetchError::MissingElement {
            url: url.to_string(),
            selector: wait_for.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_url_adds_https_scheme() {
        let url = PageLoader::normalize_url("example.com/pricing").unwrap();
        assert_eq!(url.as_str(), "https://example.com/pricing");

        let explicit = PageLoader::normalize_url(" http://www.acme.io ").unwrap();
        assert_eq!(explicit.as_str(), "http://www.acme.io/");
    }

    #[test]
    fn normalize_url_rejects_unusable_input() {
        assert!(matches!(
            PageLoader::normalize_url("ftp://files.example.com"),
            Err(FetchError::InvalidUrl { .. })
        ));
        assert!(matches!(
            PageLoader::normalize_url("https://"),
            Err(FetchError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn readiness_selector_must_be_present() {
        let url = Url::parse("https://acme.io").unwrap();

        assert!(ensure_selector("<h1>Hello</h1>", "h1", &url).is_ok());
        assert!(ensure_selector("<p>no heading</p>", "", &url).is_ok());

        let err = ensure_selector("<p>no heading</p>", "h1", &url).unwrap_err();
        assert!(matches!(err, FetchError::MissingElement { ref selector, .. } if selector == "h1"));

        assert!(matches!(
            ensure_selector("<p></p>", "h1[", &url),
            Err(FetchError::InvalidSelector(_))
        ));
    }

    #[test]
    fn rendered_request_scrolls_before_capture() {
        let loader = PageLoader::new(LoaderConfig {
            browserless_url: Some("http://localhost:3000".to_string()),
            ..LoaderConfig::default()
        })
        .unwrap();
        let url = Url::parse("https://acme.io/pricing").unwrap();
        let body = loader.rendered_request_body(&url);

        assert_eq!(body["url"], "https://acme.io/pricing");
        let scroll = body["waitForFunction"]["fn"].as_str().unwrap();
        assert!(scroll.contains("document.body.scrollHeight"));
        assert!(scroll.contains("const step = 1000"));
        assert!(scroll.contains("setTimeout(resolve, 1000)"));
        assert_eq!(body["waitForFunction"]["timeout"], 30_000);
        assert_eq!(body["waitForSelector"]["selector"], "h1");
    }

    #[test]
    fn scroll_and_selector_steps_can_be_disabled() {
        let loader = PageLoader::new(LoaderConfig {
            browserless_url: Some("http://localhost:3000".to_string()),
            wait_for: String::new(),
            scroll_for_lazy_content: false,
            ..LoaderConfig::default()
        })
        .unwrap();
        let body = loader.rendered_request_body(&Url::parse("https://acme.io").unwrap());

        assert!(body.get("waitForFunction").is_none());
        assert!(body.get("waitForSelector").is_none());
    }

    #[test]
    fn loader_mode_follows_config() {
        let direct = PageLoader::new(LoaderConfig::default()).unwrap();
        assert!(!direct.uses_browser());

        let rendered = PageLoader::new(LoaderConfig {
            browserless_url: Some("http://localhost:3000".to_string()),
            ..LoaderConfig::default()
        })
        .unwrap();
        assert!(rendered.uses_browser());
    }
}
