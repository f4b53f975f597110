//! The detail panel: which movie is open, its fetched details and the rating
//! the user is about to submit.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use popcorn_api::traits::{Classify, FetchFailure, MovieDetail, MovieService};
use popcorn_core::error::PopcornError;
use popcorn_core::models::WatchedEntry;
use popcorn_core::watched::{WatchedList, WatchedUpdate};

use crate::failure::user_message;
use crate::session::SessionEvent;

const STATUS_MESSAGE: &str = "Something went wrong while getting movie details.";

/// Observable detail-panel state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailState {
    pub selected: Option<String>,
    pub detail: Option<MovieDetail>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Last rating picked in this panel.
    pub pending_rating: Option<u8>,
    /// Ratings picked since the panel opened.
    pub rating_decisions: u32,
}

/// What [`SelectionController::select_movie`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Opened { request_id: u64 },
    Closed,
}

/// What [`SelectionController::submit_rating`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingSubmit {
    Saved(WatchedUpdate),
    /// Details were not loaded, nothing to save. `error` carries the failed
    /// fetch's message, or `None` if the fetch was still pending.
    NoDetail { error: Option<String> },
}

/// A finished detail fetch, posted back to the session.
#[derive(Debug)]
pub struct DetailResolved {
    pub request_id: u64,
    pub id: String,
    pub outcome: Result<MovieDetail, FetchFailure>,
}

struct InFlight {
    request_id: u64,
    cancel: CancellationToken,
}

pub struct SelectionController<S> {
    service: Arc<S>,
    events: mpsc::UnboundedSender<SessionEvent>,
    state: DetailState,
    in_flight: Option<InFlight>,
    next_request_id: u64,
}

impl<S: MovieService + 'static> SelectionController<S> {
    pub fn new(service: Arc<S>, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            service,
            events,
            state: DetailState::default(),
            in_flight: None,
            next_request_id: 1,
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn selected(&self) -> Option<&str> {
        self.state.selected.as_deref()
    }

    /// Toggle selection: the open movie closes, any other id opens.
    pub fn select_movie(&mut self, id: &str) -> SelectOutcome {
        if self.state.selected.as_deref() == Some(id) {
            self.close();
            return SelectOutcome::Closed;
        }

        self.cancel_in_flight();
        self.state = DetailState {
            selected: Some(id.to_string()),
            is_loading: true,
            ..DetailState::default()
        };

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        let cancel = CancellationToken::new();
        self.in_flight = Some(InFlight {
            request_id,
            cancel: cancel.clone(),
        });

        debug!(request_id, id, "Fetching movie details");
        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        let id = id.to_string();
        tokio::spawn(async move {
            let outcome = service
                .get_movie(&id, &cancel)
                .await
                .map_err(|e| e.classify());
            let _ = events.send(SessionEvent::Detail(DetailResolved {
                request_id,
                id,
                outcome,
            }));
        });

        SelectOutcome::Opened { request_id }
    }

    /// Close the panel unconditionally.
    pub fn close(&mut self) {
        self.cancel_in_flight();
        if self.state.selected.is_some() {
            debug!(id = ?self.state.selected, "Closing movie details");
        }
        self.state = DetailState::default();
    }

    /// Apply a resolution. Returns `false` if it no longer matches the
    /// open movie and was dropped.
    pub fn apply(&mut self, resolved: DetailResolved) -> bool {
        let current = matches!(
            &self.in_flight,
            Some(f) if f.request_id == resolved.request_id
        ) && self.state.selected.as_deref() == Some(resolved.id.as_str());
        if !current {
            debug!(
                request_id = resolved.request_id,
                id = %resolved.id,
                "Discarding stale movie details"
            );
            return false;
        }
        self.in_flight = None;
        self.state.is_loading = false;

        match resolved.outcome {
            Ok(detail) => {
                self.state.detail = Some(detail);
                self.state.error = None;
            }
            Err(failure) => {
                if let Some(message) = user_message(failure, STATUS_MESSAGE) {
                    debug!(id = %resolved.id, error = %message, "Movie details failed");
                    self.state.error = Some(message);
                }
            }
        }
        true
    }

    pub fn is_watched(&self, watched: &WatchedList) -> bool {
        self.state
            .selected
            .as_deref()
            .is_some_and(|id| watched.contains(id))
    }

    pub fn existing_user_rating(&self, watched: &WatchedList) -> Option<u8> {
        let id = self.state.selected.as_deref()?;
        watched.get(id).map(|e| e.user_rating)
    }

    /// Record a rating picked in the panel. Zero is "no rating" and is not
    /// counted as a decision.
    pub fn choose_rating(&mut self, rating: u8) {
        if rating == 0 || self.state.selected.is_none() {
            return;
        }
        self.state.pending_rating = Some(rating);
        self.state.rating_decisions += 1;
    }

    /// Save `rating` for the open movie and close the panel.
    ///
    /// Submitting the rating that was just chosen does not count as another
    /// decision.
    pub fn submit_rating(
        &mut self,
        rating: u8,
        watched: &mut WatchedList,
    ) -> Result<RatingSubmit, PopcornError> {
        if self.state.pending_rating != Some(rating) {
            self.choose_rating(rating);
        }
        let entry = self.build_entry(rating, watched);
        let error = self.state.error.take();
        self.close();

        match entry {
            Some(entry) => watched.add_or_update(entry).map(RatingSubmit::Saved),
            None => {
                debug!(error = ?error, "Rating submitted without details");
                Ok(RatingSubmit::NoDetail { error })
            }
        }
    }

    fn build_entry(&self, rating: u8, watched: &WatchedList) -> Option<WatchedEntry> {
        let id = self.state.selected.as_deref()?;
        let detail = self.state.detail.as_ref()?;
        let previous_revisions = watched
            .get(id)
            .map(|e| e.rating_revision_count)
            .unwrap_or(0);

        Some(WatchedEntry {
            id: id.to_string(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster_url: detail.poster_url.clone(),
            external_rating: detail.external_rating,
            runtime_minutes: detail.runtime_minutes,
            user_rating: rating,
            rating_revision_count: previous_revisions + self.state.rating_decisions,
        })
    }

    fn cancel_in_flight(&mut self) {
        if let Some(prev) = self.in_flight.take() {
            prev.cancel.cancel();
        }
    }
}

impl<S> Drop for SelectionController<S> {
    fn drop(&mut self) {
        if let Some(prev) = self.in_flight.take() {
            prev.cancel.cancel();
        }
    }
}
