use async_trait::async_trait;

use crate::data_models::{Document, JobArguments, JobTicket, SearchRequest};
use crate::error::ProviderError;

/// The hosted search API as the collectors see it. Every call is awaited
/// before the next one is issued.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run a search and return its documents in provider order.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ProviderError>;

    /// Submit a job without waiting for it.
    async fn submit_job(&self, args: &JobArguments) -> Result<JobTicket, ProviderError>;

    /// Block until a submitted job completes and return its documents.
    async fn wait_for_job(&self, job_id: &str) -> Result<Vec<Document>, ProviderError>;
}

#[async_trait]
impl<P: SearchProvider + ?Sized> SearchProvider for &P {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ProviderError> {
        (**self).search(request).await
    }

    async fn submit_job(&self, args: &JobArguments) -> Result<JobTicket, ProviderError> {
        (**self).submit_job(args).await
    }

    async fn wait_for_job(&self, job_id: &str) -> Result<Vec<Document>, ProviderError> {
        (**self).wait_for_job(job_id).await
    }
}
