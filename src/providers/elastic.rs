//! Elasticsearch REST client
//!
//! One long-lived [`reqwest::Client`] per process, TLS-verified against the
//! configured CA certificate, basic auth on every request.

use async_trait::async_trait;
use reqwest::{Certificate, Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};

use crate::config::ElasticsearchSettings;
use crate::error::{Error, Result};

use super::SearchStore;

/// How long the engine keeps a scroll cursor alive between pages
const SCROLL_KEEP_ALIVE: &str = "5m";
/// Documents fetched per scroll page
const SCROLL_PAGE_SIZE: usize = 1000;

/// Elasticsearch client backing the [`SearchStore`] trait
#[derive(Debug)]
pub struct EsClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl EsClient {
    /// Build a client from settings, pinning TLS to the configured CA
    /// certificate
    pub fn new(settings: &ElasticsearchSettings) -> Result<Self> {
        let pem = std::fs::read(&settings.ca_cert).map_err(|e| {
            Error::Config(format!(
                "Failed to read CA certificate {}: {}",
                settings.ca_cert.display(),
                e
            ))
        })?;
        let ca = Certificate::from_pem(&pem)
            .map_err(|e| Error::Config(format!("Invalid CA certificate: {}", e)))?;

        let client = Client::builder()
            .add_root_certificate(ca)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url(),
            username: settings.username.clone(),
            password: settings.password.clone(),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.base_url, path))
            .basic_auth(&self.username, Some(&self.password))
    }

    async fn scroll_page(&self, path: &str, body: &Value, index: &str) -> Result<Value> {
        let response = self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Search(format!("Scan of '{}' failed: {}", index, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Search(format!(
                "Scan of '{}' failed: {} {}",
                index, status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Search(format!("Invalid scroll response from '{}': {}", index, e)))
    }

    /// Best-effort cursor cleanup once a scan is done
    async fn clear_scroll(&self, scroll_id: &str) {
        let result = self
            .request(reqwest::Method::DELETE, "_search/scroll")
            .json(&json!({ "scroll_id": scroll_id }))
            .send()
            .await;
        if let Err(e) = result {
            tracing::debug!("Failed to clear scroll cursor: {}", e);
        }
    }
}

/// Pull the raw hit objects out of a search response body
fn hit_array(body: &Value) -> Vec<Value> {
    body["hits"]["hits"].as_array().cloned().unwrap_or_default()
}

#[async_trait]
impl SearchStore for EsClient {
    async fn index_exists(&self, index: &str) -> Result<bool> {
        let response = self
            .request(reqwest::Method::HEAD, index)
            .send()
            .await
            .map_err(|e| Error::Search(format!("Existence check for '{}' failed: {}", index, e)))?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(Error::Search(format!(
                "Unexpected status {} checking index '{}'",
                status, index
            ))),
        }
    }

    async fn create_index(&self, index: &str) -> Result<()> {
        let response = self
            .request(reqwest::Method::PUT, index)
            .send()
            .await
            .map_err(|e| Error::Search(format!("Failed to create index '{}': {}", index, e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        // Two uploads can race on the first-ever creation; the loser is fine
        if body.contains("resource_already_exists_exception") {
            tracing::debug!("Index '{}' was created concurrently", index);
            return Ok(());
        }
        Err(Error::Search(format!(
            "Failed to create index '{}': {} {}",
            index, status, body
        )))
    }

    async fn index_document(&self, index: &str, document: &Value) -> Result<()> {
        let response = self
            .request(reqwest::Method::POST, &format!("{}/_doc", index))
            .json(document)
            .send()
            .await
            .map_err(|e| Error::Search(format!("Failed to index into '{}': {}", index, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Search(format!(
                "Failed to index into '{}': {} {}",
                index, status, body
            )));
        }
        Ok(())
    }

    async fn refresh_index(&self, index: &str) -> Result<()> {
        let response = self
            .request(reqwest::Method::POST, &format!("{}/_refresh", index))
            .send()
            .await
            .map_err(|e| Error::Search(format!("Failed to refresh '{}': {}", index, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Search(format!(
                "Failed to refresh '{}': {}",
                index, status
            )));
        }
        Ok(())
    }

    async fn search(&self, index: &str, query: &Value) -> Result<Vec<Value>> {
        let response = self
            .request(reqwest::Method::POST, &format!("{}/_search", index))
            .json(query)
            .send()
            .await
            .map_err(|e| Error::Search(format!("Search on '{}' failed: {}", index, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Search(format!(
                "Search on '{}' failed: {} {}",
                index, status, body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::Search(format!("Invalid search response from '{}': {}", index, e)))?;

        let hits = hit_array(&body);
        tracing::debug!("Search on '{}' returned {} hits", index, hits.len());
        Ok(hits)
    }

    async fn scan(&self, index: &str) -> Result<Vec<Value>> {
        let mut sources = Vec::new();
        let mut scroll_id: Option<String> = None;

        let mut page = self
            .scroll_page(
                &format!("{}/_search?scroll={}", index, SCROLL_KEEP_ALIVE),
                &json!({ "size": SCROLL_PAGE_SIZE, "query": { "match_all": {} } }),
                index,
            )
            .await?;

        loop {
            if let Some(id) = page["_scroll_id"].as_str() {
                scroll_id = Some(id.to_string());
            }

            let hits = hit_array(&page);
            if hits.is_empty() {
                break;
            }
            for hit in &hits {
                if let Some(source) = hit.get("_source") {
                    sources.push(source.clone());
                }
            }

            let Some(id) = scroll_id.as_deref() else {
                break;
            };
            page = self
                .scroll_page(
                    "_search/scroll",
                    &json!({ "scroll": SCROLL_KEEP_ALIVE, "scroll_id": id }),
                    index,
                )
                .await?;
        }

        if let Some(id) = scroll_id {
            self.clear_scroll(&id).await;
        }

        tracing::debug!("Scan of '{}' returned {} documents", index, sources.len());
        Ok(sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn settings(ca_cert: PathBuf) -> ElasticsearchSettings {
        ElasticsearchSettings {
            host: "localhost".to_string(),
            port: 9200,
            xml_index: "xml".to_string(),
            docx_index: "docx".to_string(),
            pdf_index: "pdf".to_string(),
            ca_cert,
            username: "elastic".to_string(),
            password: "changeme".to_string(),
        }
    }

    #[test]
    fn test_missing_ca_certificate_fails() {
        let err = EsClient::new(&settings(PathBuf::from("no/such/ca.crt"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_ca_certificate_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not a certificate").unwrap();

        let err = EsClient::new(&settings(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_hit_array_extraction() {
        let body = json!({
            "hits": {
                "total": { "value": 2 },
                "hits": [
                    { "_id": "a", "_source": { "Id": "1" } },
                    { "_id": "b", "_source": { "Id": "2" } }
                ]
            }
        });
        let hits = hit_array(&body);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0]["_source"]["Id"], "1");
    }

    #[test]
    fn test_hit_array_of_malformed_body_is_empty() {
        assert!(hit_array(&json!({})).is_empty());
        assert!(hit_array(&json!({ "hits": {} })).is_empty());
    }
}
