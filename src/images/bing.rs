//! Bing image search client.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use super::ImageSearch;
use crate::error::{PensieveError, Result};

const SERVICE: &str = "image search";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    value: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchHit {
    content_url: Option<String>,
}

/// Queries the Bing image search API with strict safe search.
pub struct BingImageSearch {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl BingImageSearch {
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|e| PensieveError::external(SERVICE, e))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

impl ImageSearch for BingImageSearch {
    fn search(&self, query: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("mkt", "en-us"), ("safeSearch", "strict")])
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .send()
            .map_err(|e| PensieveError::external(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PensieveError::external(
                SERVICE,
                format!("HTTP {status} for query {query:?}"),
            ));
        }

        let body: SearchResponse = response
            .json()
            .map_err(|e| PensieveError::external(SERVICE, e))?;
        Ok(content_urls(body))
    }
}

fn content_urls(body: SearchResponse) -> Vec<String> {
    body.value
        .into_iter()
        .filter_map(|hit| hit.content_url)
        .filter(|url| !url.is_empty())
        .collect()
}
