//! Schema document sources.
//!
//! A locator is classified before anything is loaded:
//! - absent or empty: the embedded site-script schema
//! - `/...`, `http://...`, `https://...`: fetched over HTTP
//! - anything else: a literal JSON document

use async_trait::async_trait;
use scriptwright_core::SchemaConfig;
use serde_json::Value;
use std::time::Duration;

use crate::error::SchemaError;

/// Site-script schema shipped with the crate.
pub const DEFAULT_SCHEMA: &str = include_str!("../schema/site-script.schema.json");

/// How a schema locator is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind<'a> {
    Embedded,
    Remote(&'a str),
    Inline(&'a str),
}

impl<'a> SourceKind<'a> {
    pub fn classify(source: Option<&'a str>) -> Self {
        match source.map(str::trim) {
            None | Some("") => SourceKind::Embedded,
            Some(s)
                if s.starts_with('/') || s.starts_with("http://") || s.starts_with("https://") =>
            {
                SourceKind::Remote(s)
            }
            Some(s) => SourceKind::Inline(s),
        }
    }
}

/// Parse a schema document from text.
pub fn parse_document(text: &str) -> Result<Value, SchemaError> {
    let document: Value = serde_json::from_str(text)?;
    if !document.is_object() {
        return Err(SchemaError::ParseFailure(
            "schema document must be a JSON object".to_string(),
        ));
    }
    Ok(document)
}

/// Provider of schema documents.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Load the document the locator designates.
    async fn fetch(&self, source: Option<&str>) -> Result<Value, SchemaError>;
}

/// Default [`SchemaSource`]: embedded, inline or fetched with `reqwest`.
pub struct HttpSchemaSource {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl HttpSchemaSource {
    pub fn new(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self, SchemaError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
        })
    }

    pub fn from_config(config: &SchemaConfig) -> Result<Self, SchemaError> {
        Self::new(
            config.base_url.clone(),
            Some(Duration::from_secs(config.timeout_secs)),
        )
    }

    /// Absolute URL for a remote locator.
    pub fn resolve_url(&self, locator: &str) -> Result<String, SchemaError> {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            return Ok(locator.to_string());
        }

        match &self.base_url {
            Some(base) => Ok(format!("{}{}", base, locator)),
            None => Err(SchemaError::FetchFailure(format!(
                "'{}' is relative and no schema.base_url is configured",
                locator
            ))),
        }
    }

    async fn fetch_remote(&self, locator: &str) -> Result<Value, SchemaError> {
        let url = self.resolve_url(locator)?;
        tracing::info!(url = %url, "Fetching schema document");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SchemaError::FetchFailure(format!(
                "GET {} returned {}",
                url, status
            )));
        }

        let text = response.text().await?;
        parse_document(&text)
    }
}

#[async_trait]
impl SchemaSource for HttpSchemaSource {
    async fn fetch(&self, source: Option<&str>) -> Result<Value, SchemaError> {
        match SourceKind::classify(source) {
            SourceKind::Embedded => {
                tracing::debug!("Using embedded schema document");
                parse_document(DEFAULT_SCHEMA)
            }
            SourceKind::Remote(locator) => self.fetch_remote(locator).await,
            SourceKind::Inline(text) => {
                tracing::debug!(len = text.len(), "Parsing inline schema document");
                parse_document(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(SourceKind::classify(None), SourceKind::Embedded);
        assert_eq!(SourceKind::classify(Some("  ")), SourceKind::Embedded);
        assert_eq!(
            SourceKind::classify(Some("/sites/a/schema.json")),
            SourceKind::Remote("/sites/a/schema.json")
        );
        assert_eq!(
            SourceKind::classify(Some("https://x.example/s.json")),
            SourceKind::Remote("https://x.example/s.json")
        );
        assert_eq!(
            SourceKind::classify(Some("{\"properties\": {}}")),
            SourceKind::Inline("{\"properties\": {}}")
        );
    }

    #[test]
    fn test_resolve_url() {
        let source =
            HttpSchemaSource::new(Some("https://contoso.example.com/".to_string()), None).unwrap();
        assert_eq!(
            source.resolve_url("/SiteAssets/schema.json").unwrap(),
            "https://contoso.example.com/SiteAssets/schema.json"
        );
        assert_eq!(
            source.resolve_url("http://other.example/s.json").unwrap(),
            "http://other.example/s.json"
        );

        let no_base = HttpSchemaSource::new(None, None).unwrap();
        assert!(matches!(
            no_base.resolve_url("/SiteAssets/schema.json"),
            Err(SchemaError::FetchFailure(_))
        ));
    }

    #[test]
    fn test_parse_document_errors() {
        assert!(matches!(
            parse_document("{not json"),
            Err(SchemaError::ParseFailure(_))
        ));
        assert!(matches!(
            parse_document("[1, 2]"),
            Err(SchemaError::ParseFailure(_))
        ));
        assert!(parse_document(DEFAULT_SCHEMA).is_ok());
    }

    #[tokio::test]
    async fn test_fetch_embedded_and_inline() {
        let source = HttpSchemaSource::new(None, None).unwrap();

        let embedded = source.fetch(None).await.unwrap();
        assert!(embedded["properties"]["actions"].is_object());

        let inline = source
            .fetch(Some(r#"{"properties": {"actions": {"type": "array"}}}"#))
            .await
            .unwrap();
        assert_eq!(inline["properties"]["actions"]["type"], "array");

        let relative = source.fetch(Some("/schema.json")).await;
        assert!(matches!(relative, Err(SchemaError::FetchFailure(_))));
    }
}
