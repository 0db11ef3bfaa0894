use crate::data_models::{Document, JobArguments, Trend};
use crate::error::TrendsError;
use crate::provider::SearchProvider;

/// Submit a get-trends job, wait for it, and return the trend labels in the
/// order the provider ranked them.
pub async fn fetch_trends<P: SearchProvider + ?Sized>(provider: &P) -> Result<Vec<Trend>, TrendsError> {
    let ticket = provider
        .submit_job(&JobArguments::trends())
        .await
        .map_err(TrendsError::Submit)?;
    if !ticket.error.is_empty() {
        return Err(TrendsError::Job(ticket.error));
    }
    if ticket.uuid.is_empty() {
        return Err(TrendsError::MissingJobId);
    }

    tracing::info!(job_id = %ticket.uuid, "get trends job submitted, waiting for completion");
    let docs = provider
        .wait_for_job(&ticket.uuid)
        .await
        .map_err(TrendsError::Wait)?;
    if docs.is_empty() {
        return Err(TrendsError::Empty);
    }

    Ok(docs.iter().filter_map(trend_label).collect())
}

/// Trend documents carry the label in `id`, falling back to `content`.
fn trend_label(doc: &Document) -> Option<Trend> {
    let raw = if doc.id.is_empty() { &doc.content } else { &doc.id };
    let label = raw.trim();
    (!label.is_empty()).then(|| label.to_string())
}

/// The search query collected for a trend: the quoted label plus a likes
/// filter.
pub fn trend_query(trend: &str, min_faves: u32) -> String {
    format!("\"{trend}\" min_faves:{min_faves}")
}
