//! DuckDuckGo Instant Answer API を使う WebSearch 実装
//!
//! HTTP 取得（`fetch`）と応答 JSON からの本文抽出（`extract_answer`）を分けている。

use crate::ports::outbound::{SearchError, WebSearch};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.duckduckgo.com/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub struct InstantAnswerSearch {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl InstantAnswerSearch {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("agent/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SearchError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    fn fetch(&self, query: &str) -> Result<String, SearchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Network(format!("HTTP {}", status)));
        }
        response.text().map_err(map_reqwest_error)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> SearchError {
    if e.is_timeout() {
        SearchError::Timeout
    } else {
        SearchError::Network(e.to_string())
    }
}

impl WebSearch for InstantAnswerSearch {
    fn search(&self, query: &str) -> Result<String, SearchError> {
        let body = self.fetch(query)?;
        extract_answer(&body, query)
    }
}

/// 応答 JSON から表示用テキストを取り出す。
/// AbstractText → Answer → Definition → 最初の RelatedTopics の順。
pub fn extract_answer(body: &str, query: &str) -> Result<String, SearchError> {
    let v: Value = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("invalid JSON: {}", e)))?;

    let non_empty = |key: &str| {
        v.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    if let Some(text) = non_empty("AbstractText") {
        return Ok(match non_empty("AbstractURL") {
            Some(url) => format!("{}\nSource: {}", text, url),
            None => text,
        });
    }
    if let Some(answer) = non_empty("Answer") {
        return Ok(answer);
    }
    if let Some(def) = non_empty("Definition") {
        return Ok(def);
    }
    // RelatedTopics は入れ子（Topics）を含むことがある
    let first_topic = v["RelatedTopics"].as_array().and_then(|topics| {
        topics.iter().find_map(|t| {
            t["Text"].as_str().filter(|s| !s.is_empty()).or_else(|| {
                t["Topics"]
                    .as_array()
                    .and_then(|inner| inner.iter().find_map(|i| i["Text"].as_str()))
            })
        })
    });
    if let Some(text) = first_topic {
        return Ok(text.to_string());
    }
    Ok(format!("No instant answer found for '{}'.", query))
}

/// `--no-search` 時の WebSearch。常に Disabled を返す。
#[derive(Debug, Clone, Default)]
pub struct DisabledSearch;

impl WebSearch for DisabledSearch {
    fn search(&self, _query: &str) -> Result<String, SearchError> {
        Err(SearchError::Disabled)
    }
}
