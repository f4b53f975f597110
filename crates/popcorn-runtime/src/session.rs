//! The movie screen's event loop.
//!
//! Controllers spawn their fetches and the results come back as
//! [`SessionEvent`]s on a single channel. The owner pulls them with
//! [`MovieSession::next_event`] and applies them with
//! [`MovieSession::handle`], so all state changes happen on one task.

use std::sync::Arc;

use tokio::sync::mpsc;

use popcorn_api::traits::MovieService;
use popcorn_core::error::PopcornError;
use popcorn_core::watched::WatchedList;

use crate::search::{SearchController, SearchDispatch, SearchResolved, SearchState};
use crate::selection::{
    DetailResolved, DetailState, RatingSubmit, SelectOutcome, SelectionController,
};

/// A fetch resolution waiting to be applied.
#[derive(Debug)]
pub enum SessionEvent {
    Search(SearchResolved),
    Detail(DetailResolved),
}

pub struct MovieSession<S> {
    search: SearchController<S>,
    selection: SelectionController<S>,
    watched: WatchedList,
    events: mpsc::UnboundedReceiver<SessionEvent>,
}

impl<S: MovieService + 'static> MovieSession<S> {
    pub fn new(service: Arc<S>, watched: WatchedList, min_query_len: usize) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        Self {
            search: SearchController::new(Arc::clone(&service), tx.clone(), min_query_len),
            selection: SelectionController::new(service, tx),
            watched,
            events,
        }
    }

    pub fn search(&self) -> &SearchState {
        self.search.state()
    }

    pub fn detail(&self) -> &DetailState {
        self.selection.state()
    }

    pub fn watched(&self) -> &WatchedList {
        &self.watched
    }

    /// Update the query. Starting a new search closes the detail panel.
    pub fn set_query(&mut self, text: impl Into<String>) -> SearchDispatch {
        let dispatch = self.search.set_query(text);
        if matches!(dispatch, SearchDispatch::Started { .. }) {
            self.selection.close();
        }
        dispatch
    }

    pub fn select_movie(&mut self, id: &str) -> SelectOutcome {
        self.selection.select_movie(id)
    }

    pub fn close_movie(&mut self) {
        self.selection.close();
    }

    pub fn is_watched(&self) -> bool {
        self.selection.is_watched(&self.watched)
    }

    pub fn existing_user_rating(&self) -> Option<u8> {
        self.selection.existing_user_rating(&self.watched)
    }

    pub fn choose_rating(&mut self, rating: u8) {
        self.selection.choose_rating(rating);
    }

    pub fn submit_rating(&mut self, rating: u8) -> Result<RatingSubmit, PopcornError> {
        self.selection.submit_rating(rating, &mut self.watched)
    }

    pub fn delete_watched(&mut self, id: &str) -> Result<bool, PopcornError> {
        self.watched.delete(id)
    }

    /// Wait for the next fetch resolution.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    /// Apply a resolution. Returns `false` if it was stale and dropped.
    pub fn handle(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::Search(resolved) => self.search.apply(resolved),
            SessionEvent::Detail(resolved) => self.selection.apply(resolved),
        }
    }

    /// Wait for one resolution and apply it. Returns whether it was applied.
    pub async fn process_next(&mut self) -> bool {
        match self.next_event().await {
            Some(event) => self.handle(event),
            None => false,
        }
    }
}
