//! Analytics loading for the admin dashboard.
//!
//! Each load wraps one API call in the retry loop. Once retries are exhausted
//! the failure is classified, logged, and turned into an error banner with an
//! empty item list so the rest of the view keeps working.

mod types;

pub use types::{BatchSummary, CourseProgress, UserProgress};

use serde::de::DeserializeOwned;

use crate::api::{ApiClient, ApiError};
use crate::retry::{run_with_retry, ErrorKind, RetryPolicy};
use crate::tree::NodeKey;
use crate::validity::ValidityGrant;

/// How a failed load is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    ServerFault,
    NetworkFailure,
    Other,
}

impl FailureCategory {
    pub fn of(err: &ApiError) -> Self {
        match err.kind() {
            ErrorKind::ServerFault(_) => FailureCategory::ServerFault,
            ErrorKind::Network => FailureCategory::NetworkFailure,
            ErrorKind::Client(_) | ErrorKind::Other => FailureCategory::Other,
        }
    }

    pub fn user_message(self) -> &'static str {
        match self {
            FailureCategory::ServerFault => {
                "Analytics are temporarily unavailable. Please try again later."
            }
            FailureCategory::NetworkFailure => {
                "Unable to reach the server. Please check your connection."
            }
            FailureCategory::Other => "Failed to load analytics.",
        }
    }
}

/// Items for a view section plus the banner to show, if loading failed.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsView<T> {
    pub items: Vec<T>,
    pub banner: Option<String>,
    pub failure: Option<FailureCategory>,
}

impl<T> AnalyticsView<T> {
    pub fn loaded(items: Vec<T>) -> Self {
        Self {
            items,
            banner: None,
            failure: None,
        }
    }

    pub fn failed(category: FailureCategory) -> Self {
        Self {
            items: Vec::new(),
            banner: Some(category.user_message().to_string()),
            failure: Some(category),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// GET a JSON list with retry; the last error is returned unchanged.
///
/// `segments` are appended to the API base one per path segment. A malformed
/// endpoint fails before the first attempt.
pub async fn fetch_list<T: DeserializeOwned>(
    client: &ApiClient,
    policy: &RetryPolicy,
    segments: &[&str],
) -> Result<Vec<T>, ApiError> {
    let endpoint = &client.endpoint_at(segments)?;
    run_with_retry(policy, || async move {
        let response = client.get_at(segments).await.map_err(|err| {
            if let ErrorKind::ServerFault(status) = err.kind() {
                tracing::warn!(status, %endpoint, "analytics endpoint returned a server fault");
            }
            err
        })?;
        response.json::<Vec<T>>()
    })
    .await
}

/// Load a list into a view, degrading to an empty list plus banner on failure.
pub async fn load_list<T: DeserializeOwned>(
    client: &ApiClient,
    policy: &RetryPolicy,
    segments: &[&str],
) -> AnalyticsView<T> {
    match fetch_list(client, policy, segments).await {
        Ok(items) => AnalyticsView::loaded(items),
        Err(err) => {
            let category = FailureCategory::of(&err);
            let path = segments.join("/");
            tracing::error!(%path, ?category, error = %err, "failed to load analytics");
            AnalyticsView::failed(category)
        }
    }
}

pub const BATCHES_PATH: [&str; 2] = ["analytics", "batches"];

/// Path segments of a batch's user list; `batch_id` stays a single segment.
pub fn batch_users_path(batch_id: &str) -> [&str; 4] {
    ["analytics", "batches", batch_id, "users"]
}

pub async fn load_batches(
    client: &ApiClient,
    policy: &RetryPolicy,
) -> AnalyticsView<BatchSummary> {
    load_list(client, policy, &BATCHES_PATH).await
}

pub async fn load_batch_users(
    client: &ApiClient,
    policy: &RetryPolicy,
    batch_id: &str,
) -> AnalyticsView<UserProgress> {
    load_list(client, policy, &batch_users_path(batch_id)).await
}

/// Countdown rows for a batch list, keyed for a `CountdownBoard`.
pub fn batch_rows(batches: &[BatchSummary]) -> Vec<(NodeKey, ValidityGrant)> {
    batches
        .iter()
        .map(|b| (NodeKey::batch(b.id.clone()), b.grant.clone()))
        .collect()
}

/// Countdown rows for every user-course of one batch.
pub fn course_rows(batch_id: &str, users: &[UserProgress]) -> Vec<(NodeKey, ValidityGrant)> {
    users
        .iter()
        .flat_map(|u| {
            u.courses.iter().map(move |c| {
                (
                    NodeKey::course(batch_id, u.username.clone(), c.course_id.clone()),
                    c.grant.clone(),
                )
            })
        })
        .collect()
}
