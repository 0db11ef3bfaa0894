use std::fmt;

use serde_json::Value;

use crate::data_models::Document;
use crate::error::CursorError;

/// Metadata key holding the canonical numeric tweet id.
pub const TWEET_ID_KEY: &str = "tweet_id";

/// The `max_id` boundary for the next page of older results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor(pub i64);

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Cursor {
    /// Pagination always restarts from the base query so the query string
    /// doesn't grow with every page.
    pub fn apply_to(&self, base_query: &str) -> String {
        format!("{base_query} max_id:{}", self.0)
    }
}

/// The shapes a metadata id shows up in on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum RawId<'a> {
    Integer(i64),
    Float(f64),
    Text(&'a str),
}

impl<'a> RawId<'a> {
    /// `None` for JSON types that can never carry an id.
    pub fn from_value(value: &'a Value) -> Option<RawId<'a>> {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(RawId::Integer(i)),
                None => n.as_f64().map(RawId::Float),
            },
            Value::String(s) => Some(RawId::Text(s)),
            _ => None,
        }
    }

    pub fn resolve(&self) -> Result<i64, CursorError> {
        match self {
            RawId::Integer(i) => Ok(*i),
            RawId::Float(f) => {
                let whole = f.trunc();
                // i64::MAX as f64 rounds up to 2^63, which is already out of range.
                if whole.is_finite() && whole >= i64::MIN as f64 && whole < i64::MAX as f64 {
                    Ok(whole as i64)
                } else {
                    Err(CursorError::Malformed(format!("{f} is outside the id range")))
                }
            }
            RawId::Text(s) => s
                .parse::<i64>()
                .map_err(|e| CursorError::Malformed(format!("{s:?}: {e}"))),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Extraction {
    Found(Cursor),
    NotApplicable,
    Invalid(CursorError),
}

pub trait CursorStrategy: Send + Sync {
    fn extract(&self, doc: &Document) -> Extraction;
}

/// Reads `metadata.tweet_id`. A value that is present but unusable is an
/// error rather than a reason to fall back.
#[derive(Debug, Default)]
pub struct MetadataTweetId;

impl CursorStrategy for MetadataTweetId {
    fn extract(&self, doc: &Document) -> Extraction {
        let Some(raw) = doc
            .metadata
            .as_ref()
            .and_then(|m| m.get(TWEET_ID_KEY))
            .and_then(RawId::from_value)
        else {
            return Extraction::NotApplicable;
        };
        match raw.resolve() {
            Ok(id) => Extraction::Found(Cursor(id)),
            Err(e) => Extraction::Invalid(e),
        }
    }
}

/// Parses the document's own `id` field.
#[derive(Debug, Default)]
pub struct DocumentId;

impl CursorStrategy for DocumentId {
    fn extract(&self, doc: &Document) -> Extraction {
        match doc.id.parse::<i64>() {
            Ok(id) => Extraction::Found(Cursor(id)),
            Err(_) => Extraction::NotApplicable,
        }
    }
}

/// Ordered list of strategies, first hit wins.
pub struct CursorExtractor {
    strategies: Vec<Box<dyn CursorStrategy>>,
}

impl Default for CursorExtractor {
    fn default() -> Self {
        CursorExtractor::new(vec![Box::new(MetadataTweetId), Box::new(DocumentId)])
    }
}

impl CursorExtractor {
    pub fn new(strategies: Vec<Box<dyn CursorStrategy>>) -> CursorExtractor {
        CursorExtractor { strategies }
    }

    pub fn extract(&self, doc: &Document) -> Result<Cursor, CursorError> {
        for strategy in &self.strategies {
            match strategy.extract(doc) {
                Extraction::Found(cursor) => return Ok(cursor),
                Extraction::Invalid(e) => return Err(e),
                Extraction::NotApplicable => continue,
            }
        }
        Err(CursorError::Missing {
            document_id: doc.id.clone(),
        })
    }

    /// Cursor for the page after `batch`, taken from its last (oldest) item.
    pub fn next_cursor(&self, batch: &[Document]) -> Result<Cursor, CursorError> {
        let last = batch.last().ok_or(CursorError::EmptyBatch)?;
        self.extract(last)
    }
}
