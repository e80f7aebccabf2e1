use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use combobox_types::MatchPolicy;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::coordinator::FetchTicket;
use crate::pool::CandidatePool;

/// Parameters handed to a fetcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    /// Text typed so far; fetchers may use it to narrow the result.
    pub query: String,
    /// How the widget matches labels, so narrowing agrees with the dropdown.
    pub policy: MatchPolicy,
}

impl FetchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            policy: MatchPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("candidate source unavailable: {message}")]
    Unavailable { message: String },
}

/// External collaborator that supplies candidates.
///
/// The result carries association marks so the widget can apply the
/// known-set restriction locally when the toggle flips.
#[async_trait]
pub trait CandidateFetcher: Send + Sync + Debug {
    async fn fetch_candidates(&self, request: &FetchRequest) -> Result<CandidatePool, FetchError>;
}

/// Serves candidates from an in-memory pool, optionally after a delay.
#[derive(Clone, Debug, Default)]
pub struct StaticFetcher {
    pool: CandidatePool,
    latency: Option<Duration>,
}

impl StaticFetcher {
    pub fn new(pool: CandidatePool) -> Self {
        Self { pool, latency: None }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

#[async_trait]
impl CandidateFetcher for StaticFetcher {
    async fn fetch_candidates(&self, request: &FetchRequest) -> Result<CandidatePool, FetchError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        Ok(self.pool.narrowed(&request.query, request.policy))
    }
}

/// Fetcher that never has anything to offer.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullFetcher;

#[async_trait]
impl CandidateFetcher for NullFetcher {
    async fn fetch_candidates(&self, _request: &FetchRequest) -> Result<CandidatePool, FetchError> {
        Ok(CandidatePool::default())
    }
}

/// Result of a dispatched fetch, tagged with the ticket it was issued under.
#[derive(Debug)]
pub struct FetchCompletion {
    pub ticket: FetchTicket,
    pub result: Result<CandidatePool, FetchError>,
}

/// Run a fetch on the Tokio runtime and deliver its completion over `sender`.
///
/// The receiver decides whether the completion is still current.
pub fn spawn_fetch(
    fetcher: Arc<dyn CandidateFetcher>,
    ticket: FetchTicket,
    request: FetchRequest,
    sender: mpsc::UnboundedSender<FetchCompletion>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!(generation = ticket.generation, query = %request.query, "candidate fetch started");
        let result = fetcher.fetch_candidates(&request).await;
        if let Err(error) = &result {
            warn!(generation = ticket.generation, error = %error, "candidate fetch failed");
        }
        if sender.send(FetchCompletion { ticket, result }).is_err() {
            debug!("candidate fetch receiver dropped");
        }
    })
}
