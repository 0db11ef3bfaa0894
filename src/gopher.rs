use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::time::Instant;

use crate::data_models::{Document, JobArguments, JobTicket, SearchRequest};
use crate::error::ProviderError;
use crate::provider::SearchProvider;

pub const DEFAULT_BASE_URL: &str = "https://data.gopher-ai.com/api";

const LIVE_TWITTER_PATH: &str = "v1/search/live/twitter";

/// Connection settings for [`GopherClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub token: String,
    pub base_url: String,
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub max_wait: Duration,
}

#[derive(Serialize)]
struct JobEnvelope<'a> {
    #[serde(rename = "type")]
    source: &'static str,
    arguments: &'a JobArguments,
}

#[derive(Deserialize, Debug)]
struct JobStatus {
    #[serde(default)]
    status: String,
    #[serde(default)]
    error: Option<String>,
}

enum JobState {
    Done,
    Failed(String),
    Pending(String),
}

impl JobStatus {
    fn state(self) -> JobState {
        match self.status.to_ascii_lowercase().as_str() {
            "done" | "completed" | "success" => JobState::Done,
            "error" | "failed" => JobState::Failed(self.error.unwrap_or(self.status)),
            _ => JobState::Pending(self.status),
        }
    }
}

/// HTTP client for the Gopher data API's live Twitter search jobs.
pub struct GopherClient {
    client: reqwest::Client,
    settings: ClientSettings,
}

impl GopherClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self { client, settings })
    }

    fn url(&self, tail: &str) -> String {
        let base = format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            LIVE_TWITTER_PATH
        );
        match tail.trim_start_matches('/') {
            "" => base,
            tail => format!("{base}/{tail}"),
        }
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ProviderError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.settings.token)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatus, ProviderError> {
        self.get(&self.url(&format!("status/{job_id}"))).await
    }

    async fn job_result(&self, job_id: &str) -> Result<Vec<Document>, ProviderError> {
        // Jobs with nothing to report answer `null` instead of `[]`.
        let docs: Option<Vec<Document>> = self.get(&self.url(&format!("result/{job_id}"))).await?;
        Ok(docs.unwrap_or_default())
    }
}

#[async_trait]
impl SearchProvider for GopherClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ProviderError> {
        let ticket = self.submit_job(&JobArguments::search(request)).await?;
        if !ticket.error.is_empty() {
            return Err(ProviderError::Rejected(ticket.error));
        }
        if ticket.uuid.is_empty() {
            return Err(ProviderError::Rejected("no job ID returned".to_string()));
        }
        self.wait_for_job(&ticket.uuid).await
    }

    async fn submit_job(&self, args: &JobArguments) -> Result<JobTicket, ProviderError> {
        let envelope = JobEnvelope {
            source: "twitter",
            arguments: args,
        };
        let resp = self
            .client
            .post(self.url(""))
            .bearer_auth(&self.settings.token)
            .json(&envelope)
            .send()
            .await?;

        let ticket: JobTicket = Self::decode(resp).await?;
        tracing::debug!(job_id = %ticket.uuid, kind = ?args.kind, "job submitted");
        Ok(ticket)
    }

    async fn wait_for_job(&self, job_id: &str) -> Result<Vec<Document>, ProviderError> {
        let started = Instant::now();
        loop {
            match self.job_status(job_id).await?.state() {
                JobState::Done => return self.job_result(job_id).await,
                JobState::Failed(message) => {
                    return Err(ProviderError::JobFailed {
                        job_id: job_id.to_string(),
                        message,
                    });
                }
                JobState::Pending(status) => {
                    if started.elapsed() >= self.settings.max_wait {
                        return Err(ProviderError::JobTimeout {
                            job_id: job_id.to_string(),
                            waited_secs: started.elapsed().as_secs(),
                        });
                    }
                    tracing::debug!(job_id, status = %status, "job still in progress");
                    tokio::time::sleep(self.settings.poll_interval).await;
                }
            }
        }
    }
}
