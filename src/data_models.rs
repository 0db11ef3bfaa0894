use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Largest page the provider serves for a single search request.
pub const PROVIDER_MAX_RESULTS: usize = 100;

/// A trending topic label as returned by the provider.
pub type Trend = String;

/// One item returned by the provider. Fields this crate doesn't look at are
/// kept in `extra` so documents are written out exactly as received.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Document {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Document {
        Document {
            id: id.into(),
            source: "twitter".to_string(),
            content: content.into(),
            metadata: None,
            extra: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Document {
        self.metadata
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value);
        self
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// A single page request against the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: usize,
}

impl SearchRequest {
    /// Clamps `max_results` into `1..=PROVIDER_MAX_RESULTS`.
    pub fn new(query: impl Into<String>, max_results: usize) -> SearchRequest {
        SearchRequest {
            query: query.into(),
            max_results: max_results.clamp(1, PROVIDER_MAX_RESULTS),
        }
    }
}

/// Capability requested from the provider's job endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    #[serde(rename = "searchbyquery")]
    SearchByQuery,
    #[serde(rename = "gettrends")]
    GetTrends,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct JobArguments {
    #[serde(rename = "type")]
    pub kind: JobKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
}

impl JobArguments {
    pub fn search(request: &SearchRequest) -> JobArguments {
        JobArguments {
            kind: JobKind::SearchByQuery,
            query: Some(request.query.clone()),
            max_results: Some(request.max_results),
        }
    }

    pub fn trends() -> JobArguments {
        JobArguments {
            kind: JobKind::GetTrends,
            query: None,
            max_results: None,
        }
    }
}

/// Answer to an async job submission. `error` is empty on success.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct JobTicket {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub error: String,
}

/// What ends up on disk for one run or one trend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CollectionResult {
    pub total_tweets: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    pub query: String,
    pub collected_at: String,
    pub tweets: Vec<Document>,
}

impl CollectionResult {
    pub fn new(tweets: Vec<Document>, query: &str, trend: Option<&str>) -> CollectionResult {
        CollectionResult {
            total_tweets: tweets.len(),
            trend: trend.map(str::to_string),
            query: query.to_string(),
            collected_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            tweets,
        }
    }
}
