//! Remote script loading

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use shared::{ExperienceMetadata, GameList};

use super::error::{ExperienceError, TransportError};
use crate::state::settings::CatalogSettings;

/// Anything that can hand back script text for a URL
#[async_trait]
pub trait ScriptSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, TransportError>;
}

/// Fetch the script named by the metadata. No retries.
pub async fn load_script<S>(source: &S, metadata: &ExperienceMetadata) -> Result<String, ExperienceError>
where
    S: ScriptSource + ?Sized,
{
    let url = metadata.script_url().ok_or(ExperienceError::InvalidMetadata)?;
    tracing::info!("Loading script: {url}");
    let text = source.fetch(url).await?;
    tracing::debug!("Fetched {} bytes from {url}", text.len());
    Ok(text)
}

/// HTTP source; relative URLs resolve against the catalog base URL
#[derive(Clone)]
pub struct HttpScriptSource {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl HttpScriptSource {
    pub fn new(base_url: Option<&str>, timeout: Duration) -> Result<Self, String> {
        let base_url = base_url
            .map(|b| Url::parse(b).map_err(|e| format!("Invalid base URL '{b}': {e}")))
            .transpose()?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;
        Ok(Self { client, base_url })
    }

    pub fn from_settings(settings: &CatalogSettings) -> Result<Self, String> {
        Self::new(
            Some(&settings.base_url),
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    /// Absolute URLs pass through, relative ones join the base URL
    pub fn resolve(&self, url: &str) -> Result<Url, TransportError> {
        if let Ok(absolute) = Url::parse(url) {
            return Ok(absolute);
        }
        match &self.base_url {
            Some(base) => base
                .join(url)
                .map_err(|e| TransportError::network(url, e.to_string())),
            None => Err(TransportError::network(url, "relative URL without a base URL")),
        }
    }

    /// Fetch and parse the game list from the catalog
    pub async fn fetch_games(&self, path: &str) -> Result<GameList, TransportError> {
        let text = self.fetch(path).await?;
        shared::parse_game_list(&text)
            .map_err(|e| TransportError::network(path, format!("invalid game list: {e}")))
    }
}

#[async_trait]
impl ScriptSource for HttpScriptSource {
    async fn fetch(&self, url: &str) -> Result<String, TransportError> {
        let resolved = self.resolve(url)?;
        let response = self
            .client
            .get(resolved)
            .send()
            .await
            .map_err(|e| TransportError::network(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::status(
                url,
                status.as_u16(),
                status.canonical_reason().unwrap_or("request failed"),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| TransportError::network(url, e.to_string()))
    }
}

/// In-memory source. Unknown URLs answer 404.
#[derive(Default, Clone)]
pub struct StaticScriptSource {
    scripts: HashMap<String, String>,
}

impl StaticScriptSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(url, text);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, text: impl Into<String>) {
        self.scripts.insert(url.into(), text.into());
    }
}

#[async_trait]
impl ScriptSource for StaticScriptSource {
    async fn fetch(&self, url: &str) -> Result<String, TransportError> {
        self.scripts
            .get(url)
            .cloned()
            .ok_or_else(|| TransportError::status(url, 404, "Not Found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(url: Option<&str>) -> ExperienceMetadata {
        ExperienceMetadata {
            url: url.map(String::from),
            name: "Test".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_load_missing_url() {
        let source = StaticScriptSource::new();
        let err = load_script(&source, &meta(None)).await.unwrap_err();
        assert!(matches!(err, ExperienceError::InvalidMetadata));
    }

    #[tokio::test]
    async fn test_load_not_found_carries_status() {
        let source = StaticScriptSource::new();
        let err = load_script(&source, &meta(Some("/exp/none.json"))).await.unwrap_err();
        match err {
            ExperienceError::Transport(t) => {
                assert_eq!(t.status, Some(404));
                assert_eq!(t.url, "/exp/none.json");
            }
            other => panic!("Expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_returns_body() {
        let source = StaticScriptSource::new().with("/exp/a.json", "[]");
        let text = load_script(&source, &meta(Some("/exp/a.json"))).await.unwrap();
        assert_eq!(text, "[]");
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let src = HttpScriptSource::new(Some("http://localhost:3001"), Duration::from_secs(5)).unwrap();
        assert_eq!(
            src.resolve("/exp/a.json").unwrap().as_str(),
            "http://localhost:3001/exp/a.json"
        );
        assert_eq!(
            src.resolve("https://example.com/x.json").unwrap().as_str(),
            "https://example.com/x.json"
        );
    }

    #[test]
    fn test_resolve_relative_without_base() {
        let src = HttpScriptSource::new(None, Duration::from_secs(5)).unwrap();
        let err = src.resolve("/exp/a.json").unwrap_err();
        assert_eq!(err.status, None);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(HttpScriptSource::new(Some("not a url"), Duration::from_secs(5)).is_err());
    }
}
