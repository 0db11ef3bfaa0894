#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use tweet_harvest::cursor::TWEET_ID_KEY;
use tweet_harvest::data_models::{Document, JobArguments, JobTicket, SearchRequest};
use tweet_harvest::error::ProviderError;
use tweet_harvest::provider::SearchProvider;

type Responder = Box<dyn Fn(&SearchRequest) -> Result<Vec<Document>, ProviderError> + Send + Sync>;

/// In-memory provider that answers searches from a closure and records every
/// request it sees.
pub struct MockProvider {
    responder: Responder,
    requests: Mutex<Vec<SearchRequest>>,
    ticket: JobTicket,
    job_docs: Vec<Document>,
    job_error: Option<String>,
}

impl MockProvider {
    pub fn with_responder<F>(f: F) -> MockProvider
    where
        F: Fn(&SearchRequest) -> Result<Vec<Document>, ProviderError> + Send + Sync + 'static,
    {
        MockProvider {
            responder: Box::new(f),
            requests: Mutex::new(Vec::new()),
            ticket: JobTicket {
                uuid: "job-1".to_string(),
                error: String::new(),
            },
            job_docs: Vec::new(),
            job_error: None,
        }
    }

    /// Serves `pages` in order, verbatim, then empty pages.
    pub fn scripted(pages: Vec<Result<Vec<Document>, ProviderError>>) -> MockProvider {
        let pages = Mutex::new(VecDeque::from(pages));
        MockProvider::with_responder(move |_| {
            pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        })
    }

    /// Always fills the requested page size with ever older tweets.
    pub fn endless(first_id: i64) -> MockProvider {
        let next = Mutex::new(first_id);
        MockProvider::with_responder(move |req| {
            let mut next = next.lock().unwrap();
            let page = page_starting_at(*next, req.max_results);
            *next -= req.max_results as i64;
            Ok(page)
        })
    }

    pub fn with_trends(mut self, labels: &[&str]) -> MockProvider {
        self.job_docs = labels.iter().map(|l| Document::new(*l, "")).collect();
        self
    }

    pub fn with_ticket(mut self, uuid: &str, error: &str) -> MockProvider {
        self.ticket = JobTicket {
            uuid: uuid.to_string(),
            error: error.to_string(),
        };
        self
    }

    pub fn with_job_error(mut self, message: &str) -> MockProvider {
        self.job_error = Some(message.to_string());
        self
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for MockProvider {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        (self.responder)(request)
    }

    async fn submit_job(&self, _args: &JobArguments) -> Result<JobTicket, ProviderError> {
        Ok(self.ticket.clone())
    }

    async fn wait_for_job(&self, job_id: &str) -> Result<Vec<Document>, ProviderError> {
        match &self.job_error {
            Some(message) => Err(ProviderError::JobFailed {
                job_id: job_id.to_string(),
                message: message.clone(),
            }),
            None => Ok(self.job_docs.clone()),
        }
    }
}

pub fn tweet(id: i64) -> Document {
    Document::new(id.to_string(), format!("tweet {id}")).with_metadata(TWEET_ID_KEY, json!(id))
}

/// `len` tweets, newest first, the first one having id `first_id`.
pub fn page_starting_at(first_id: i64, len: usize) -> Vec<Document> {
    (0..len as i64).map(|i| tweet(first_id - i)).collect()
}

/// `len` tweets, newest first, the last (oldest) one having id `last_id`.
pub fn page_ending_at(last_id: i64, len: usize) -> Vec<Document> {
    page_starting_at(last_id + len as i64 - 1, len)
}

pub fn ids(docs: &[Document]) -> Vec<String> {
    docs.iter().map(|d| d.id.clone()).collect()
}
