use std::time::Duration;

use crate::cursor::CursorExtractor;
use crate::data_models::{Document, PROVIDER_MAX_RESULTS, SearchRequest};
use crate::error::{CursorError, PaginationError, ProviderError};
use crate::provider::SearchProvider;

pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(1);

/// Why the loop stopped asking for more pages.
#[derive(Debug)]
pub enum StopReason {
    TargetReached,
    Exhausted,
    ProviderFailed(ProviderError),
    CursorFailed(CursorError),
}

impl StopReason {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            StopReason::ProviderFailed(_) | StopReason::CursorFailed(_)
        )
    }
}

/// Everything one pagination run gathered, including partial results when it
/// stopped on a failure.
#[derive(Debug)]
pub struct Collected {
    pub items: Vec<Document>,
    pub requests: usize,
    pub stop: StopReason,
}

/// Walks a search backwards in time with `max_id` cursors until the target
/// is reached or the provider runs dry.
pub struct Paginator<P> {
    provider: P,
    extractor: CursorExtractor,
    page_ceiling: usize,
    delay: Duration,
}

impl<P: SearchProvider> Paginator<P> {
    pub fn new(provider: P) -> Paginator<P> {
        Paginator {
            provider,
            extractor: CursorExtractor::default(),
            page_ceiling: PROVIDER_MAX_RESULTS,
            delay: DEFAULT_REQUEST_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Paginator<P> {
        self.delay = delay;
        self
    }

    /// Clamped to the provider's maximum page size.
    pub fn with_page_ceiling(mut self, ceiling: usize) -> Paginator<P> {
        self.page_ceiling = ceiling.clamp(1, PROVIDER_MAX_RESULTS);
        self
    }

    pub fn with_extractor(mut self, extractor: CursorExtractor) -> Paginator<P> {
        self.extractor = extractor;
        self
    }

    pub async fn collect(
        &self,
        base_query: &str,
        target: usize,
    ) -> Result<Collected, PaginationError> {
        if target == 0 {
            return Err(PaginationError::InvalidTarget);
        }

        let mut items: Vec<Document> = Vec::new();
        let mut requests = 0;
        let mut query = base_query.to_string();

        let stop = loop {
            let remaining = target - items.len();
            let request = SearchRequest::new(query.as_str(), remaining.min(self.page_ceiling));
            tracing::info!(
                current = items.len(),
                target,
                page_size = request.max_results,
                "fetching batch"
            );

            requests += 1;
            let mut batch = match self.provider.search(&request).await {
                Ok(batch) => batch,
                Err(e) => {
                    tracing::warn!(error = %e, collected = items.len(), "error fetching tweets");
                    break StopReason::ProviderFailed(e);
                }
            };

            if batch.is_empty() {
                tracing::info!("no more results available");
                break StopReason::Exhausted;
            }

            let fetched = batch.len();
            let batch_start = items.len();
            batch.truncate(remaining);
            items.extend(batch);
            tracing::info!(fetched, total = items.len(), target, "batch fetched");

            if items.len() >= target {
                break StopReason::TargetReached;
            }

            match self.extractor.next_cursor(&items[batch_start..]) {
                Ok(cursor) => query = cursor.apply_to(base_query),
                Err(e) => {
                    tracing::warn!(error = %e, collected = items.len(), "error extracting last tweet ID");
                    break StopReason::CursorFailed(e);
                }
            }

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        };

        Ok(Collected {
            items,
            requests,
            stop,
        })
    }
}
