//! Query-driven movie search.
//!
//! Every query change cancels the previous request. Only the resolution
//! carrying the current request id is applied, so a slow answer to an old
//! query can never overwrite a newer one.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use popcorn_api::traits::{Classify, FetchFailure, MovieService, MovieSummary};

use crate::failure::user_message;
use crate::session::SessionEvent;

const STATUS_MESSAGE: &str = "Something went wrong while retrieving movies.";

/// Observable search state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<MovieSummary>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// What [`SearchController::set_query`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDispatch {
    /// Query identical to the current one.
    Unchanged,
    /// Query too short, state cleared without a request.
    Skipped,
    /// A request went out.
    Started { request_id: u64 },
}

/// A finished search, posted back to the session.
#[derive(Debug)]
pub struct SearchResolved {
    pub request_id: u64,
    pub query: String,
    pub outcome: Result<Vec<MovieSummary>, FetchFailure>,
}

struct InFlight {
    request_id: u64,
    cancel: CancellationToken,
}

pub struct SearchController<S> {
    service: Arc<S>,
    events: mpsc::UnboundedSender<SessionEvent>,
    min_query_len: usize,
    state: SearchState,
    in_flight: Option<InFlight>,
    next_request_id: u64,
}

impl<S: MovieService + 'static> SearchController<S> {
    pub fn new(
        service: Arc<S>,
        events: mpsc::UnboundedSender<SessionEvent>,
        min_query_len: usize,
    ) -> Self {
        Self {
            service,
            events,
            min_query_len,
            state: SearchState::default(),
            in_flight: None,
            next_request_id: 1,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Update the query and react to it.
    ///
    /// Must be called from within a tokio runtime when the query is long
    /// enough to be sent.
    pub fn set_query(&mut self, text: impl Into<String>) -> SearchDispatch {
        let text = text.into();
        if text == self.state.query {
            return SearchDispatch::Unchanged;
        }
        self.cancel_in_flight();
        self.state.query = text;

        let query = self.state.query.trim().to_string();
        if query.chars().count() <= self.min_query_len {
            self.state.results.clear();
            self.state.error = None;
            self.state.is_loading = false;
            return SearchDispatch::Skipped;
        }

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        let cancel = CancellationToken::new();
        self.in_flight = Some(InFlight {
            request_id,
            cancel: cancel.clone(),
        });
        self.state.is_loading = true;
        self.state.error = None;

        debug!(request_id, query = %query, "Dispatching search");
        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = service
                .search_movies(&query, &cancel)
                .await
                .map_err(|e| e.classify());
            let _ = events.send(SessionEvent::Search(SearchResolved {
                request_id,
                query,
                outcome,
            }));
        });

        SearchDispatch::Started { request_id }
    }

    /// Apply a resolution. Returns `false` if it was stale and dropped.
    pub fn apply(&mut self, resolved: SearchResolved) -> bool {
        match &self.in_flight {
            Some(current) if current.request_id == resolved.request_id => {}
            _ => {
                debug!(
                    request_id = resolved.request_id,
                    query = %resolved.query,
                    "Discarding stale search result"
                );
                return false;
            }
        }
        self.in_flight = None;
        self.state.is_loading = false;

        match resolved.outcome {
            Ok(results) => {
                debug!(query = %resolved.query, count = results.len(), "Search resolved");
                self.state.results = results;
                self.state.error = None;
            }
            Err(failure) => {
                if let Some(message) = user_message(failure, STATUS_MESSAGE) {
                    debug!(query = %resolved.query, error = %message, "Search failed");
                    self.state.results.clear();
                    self.state.error = Some(message);
                }
            }
        }
        true
    }

    fn cancel_in_flight(&mut self) {
        if let Some(prev) = self.in_flight.take() {
            debug!(request_id = prev.request_id, "Cancelling superseded search");
            prev.cancel.cancel();
        }
    }
}

impl<S> Drop for SearchController<S> {
    fn drop(&mut self) {
        if let Some(prev) = self.in_flight.take() {
            prev.cancel.cancel();
        }
    }
}
