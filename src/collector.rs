use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Config;
use crate::data_models::{CollectionResult, Trend};
use crate::error::{CollectError, PaginationError};
use crate::paginator::{Paginator, StopReason};
use crate::provider::SearchProvider;
use crate::sanitize::{NameKind, output_path};
use crate::storage::write_collection;
use crate::trends::{fetch_trends, trend_query};

#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub data_dir: PathBuf,
    pub request_delay: Duration,
    pub trend_min_faves: u32,
}

impl From<&Config> for CollectorSettings {
    fn from(config: &Config) -> Self {
        CollectorSettings {
            data_dir: config.data_dir.clone(),
            request_delay: config.request_delay,
            trend_min_faves: config.trend_min_faves,
        }
    }
}

/// One written collection file.
#[derive(Debug)]
pub struct QueryReport {
    pub query: String,
    pub path: PathBuf,
    pub saved: usize,
    pub requests: usize,
    pub stop: StopReason,
}

#[derive(Debug)]
pub enum TopicOutcome {
    Saved(QueryReport),
    Skipped(String),
    Failed(CollectError),
}

#[derive(Debug)]
pub struct TopicReport {
    pub trend: Trend,
    pub outcome: TopicOutcome,
}

#[derive(Debug, Default)]
pub struct TrendsReport {
    pub topics: Vec<TopicReport>,
}

impl TrendsReport {
    pub fn saved(&self) -> usize {
        self.count(|o| matches!(o, TopicOutcome::Saved(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, TopicOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, TopicOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&TopicOutcome) -> bool) -> usize {
        self.topics.iter().filter(|t| pred(&t.outcome)).count()
    }
}

/// Sequences pagination and storage for a single query or for every
/// trending topic.
pub struct Collector<P> {
    provider: P,
    settings: CollectorSettings,
}

impl<P: SearchProvider> Collector<P> {
    pub fn new(provider: P, settings: CollectorSettings) -> Collector<P> {
        Collector { provider, settings }
    }

    fn paginator(&self) -> Paginator<&P> {
        Paginator::new(&self.provider).with_delay(self.settings.request_delay)
    }

    /// Collect `target` tweets for `query` into `<data_dir>/<query>_<target>.json`.
    /// Whatever was gathered before a failing page is still written.
    pub async fn collect_query(&self, query: &str, target: usize) -> Result<QueryReport, CollectError> {
        let path = output_path(&self.settings.data_dir, query, target, NameKind::Query)
            .ok_or_else(|| CollectError::UnnamedOutput(query.to_string()))?;

        tracing::info!(query, target, path = %path.display(), "starting tweet collection");
        self.collect_into(query, None, &path, target).await
    }

    /// Fetch the trending topics and collect `target` tweets for each one in
    /// turn. Only a failure to fetch the trends themselves ends the run.
    pub async fn collect_trends(&self, target: usize) -> Result<TrendsReport, CollectError> {
        if target == 0 {
            return Err(PaginationError::InvalidTarget.into());
        }

        tracing::info!("fetching twitter trends");
        let trends = fetch_trends(&self.provider).await?;
        tracing::info!(count = trends.len(), "found trending topics");
        for (i, trend) in trends.iter().enumerate() {
            tracing::info!("{}. {}", i + 1, trend);
        }

        let mut report = TrendsReport::default();
        for trend in trends {
            tracing::info!(trend = %trend, "processing trend");
            let outcome = self.collect_topic(&trend, target).await;
            match &outcome {
                TopicOutcome::Saved(saved) => tracing::info!(
                    trend = %trend,
                    saved = saved.saved,
                    path = %saved.path.display(),
                    "saved tweets for trend"
                ),
                TopicOutcome::Skipped(reason) => {
                    tracing::info!(trend = %trend, reason = %reason, "skipping trend")
                }
                TopicOutcome::Failed(e) => {
                    tracing::error!(trend = %trend, error = %e, "error collecting trend")
                }
            }
            report.topics.push(TopicReport { trend, outcome });
        }

        tracing::info!(
            saved = report.saved(),
            skipped = report.skipped(),
            failed = report.failed(),
            "all trends processed"
        );
        Ok(report)
    }

    async fn collect_topic(&self, trend: &str, target: usize) -> TopicOutcome {
        let Some(path) = output_path(&self.settings.data_dir, trend, target, NameKind::Trend) else {
            return TopicOutcome::Skipped("empty after sanitization".to_string());
        };
        let query = trend_query(trend, self.settings.trend_min_faves);

        match self.collect_into(&query, Some(trend), &path, target).await {
            Ok(report) => TopicOutcome::Saved(report),
            Err(e) => TopicOutcome::Failed(e),
        }
    }

    async fn collect_into(
        &self,
        query: &str,
        trend: Option<&str>,
        path: &Path,
        target: usize,
    ) -> Result<QueryReport, CollectError> {
        let collected = self.paginator().collect(query, target).await?;
        if collected.stop.is_failure() {
            tracing::warn!(
                query,
                kept = collected.items.len(),
                stop = ?collected.stop,
                "collection stopped early, saving partial results"
            );
        }

        let result = CollectionResult::new(collected.items, query, trend);
        tracing::info!(total = result.total_tweets, path = %path.display(), "saving tweets");
        write_collection(path, &result)?;

        Ok(QueryReport {
            query: query.to_string(),
            path: path.to_path_buf(),
            saved: result.total_tweets,
            requests: collected.requests,
            stop: collected.stop,
        })
    }
}
