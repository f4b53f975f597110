//! Scripted services for controller tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use popcorn_api::traits::{
    Classify, Currency, ExchangeService, FetchFailure, MovieDetail, MovieService, MovieSummary,
};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, thiserror::Error)]
#[error("{0:?}")]
pub struct FakeError(pub FetchFailure);

impl Classify for FakeError {
    fn classify(&self) -> FetchFailure {
        self.0.clone()
    }
}

#[derive(Clone)]
struct Scripted<T> {
    delay: Duration,
    result: Result<T, FetchFailure>,
}

/// A movie service answering from a script after a fixed delay.
#[derive(Default)]
pub struct FakeMovies {
    searches: HashMap<String, Scripted<Vec<MovieSummary>>>,
    details: HashMap<String, Scripted<MovieDetail>>,
    /// When set, cancellation is ignored and late answers still arrive.
    pub ignore_cancel: bool,
    pub search_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub queries: Mutex<Vec<String>>,
}

impl FakeMovies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(
        mut self,
        query: &str,
        delay_ms: u64,
        result: Result<Vec<MovieSummary>, FetchFailure>,
    ) -> Self {
        self.searches.insert(
            query.into(),
            Scripted {
                delay: Duration::from_millis(delay_ms),
                result,
            },
        );
        self
    }

    pub fn detail(
        mut self,
        id: &str,
        delay_ms: u64,
        result: Result<MovieDetail, FetchFailure>,
    ) -> Self {
        self.details.insert(
            id.into(),
            Scripted {
                delay: Duration::from_millis(delay_ms),
                result,
            },
        );
        self
    }

    pub fn ignoring_cancel(mut self) -> Self {
        self.ignore_cancel = true;
        self
    }

    async fn answer<T: Clone>(
        &self,
        script: Option<&Scripted<T>>,
        cancel: &CancellationToken,
    ) -> Result<T, FakeError> {
        let Some(script) = script else {
            return Err(FakeError(FetchFailure::Provider("Movie not found!".into())));
        };
        if self.ignore_cancel {
            tokio::time::sleep(script.delay).await;
        } else {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FakeError(FetchFailure::Cancelled)),
                _ = tokio::time::sleep(script.delay) => {}
            }
        }
        script.result.clone().map_err(FakeError)
    }
}

impl MovieService for FakeMovies {
    type Error = FakeError;

    async fn search_movies(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<MovieSummary>, FakeError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        self.answer(self.searches.get(query), cancel).await
    }

    async fn get_movie(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<MovieDetail, FakeError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.answer(self.details.get(id), cancel).await
    }
}

/// Exchange service with a fixed rate table.
pub struct FakeRates {
    rates: HashMap<(Currency, Currency), f64>,
    delay: Duration,
    pub calls: AtomicUsize,
}

impl FakeRates {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            rates: HashMap::new(),
            delay: Duration::from_millis(delay_ms),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn rate(mut self, from: Currency, to: Currency, rate: f64) -> Self {
        self.rates.insert((from, to), rate);
        self
    }
}

impl ExchangeService for FakeRates {
    type Error = FakeError;

    async fn convert(
        &self,
        amount: f64,
        from: Currency,
        to: Currency,
        cancel: &CancellationToken,
    ) -> Result<f64, FakeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FakeError(FetchFailure::Cancelled)),
            _ = tokio::time::sleep(self.delay) => {}
        }
        self.rates
            .get(&(from, to))
            .map(|rate| amount * rate)
            .ok_or(FakeError(FetchFailure::Offline))
    }
}

pub fn summary(id: &str, title: &str, year: &str) -> MovieSummary {
    MovieSummary {
        id: id.into(),
        title: title.into(),
        year: year.into(),
        poster_url: format!("https://img.example/{id}.jpg"),
    }
}

pub fn inception_detail() -> MovieDetail {
    MovieDetail {
        id: "tt1375666".into(),
        title: "Inception".into(),
        year: "2010".into(),
        poster_url: "https://img.example/tt1375666.jpg".into(),
        runtime: "148 min".into(),
        runtime_minutes: Some(148),
        release_date: "16 Jul 2010".into(),
        genre: "Action, Adventure, Sci-Fi".into(),
        external_rating: Some(8.8),
        plot: "A thief who steals corporate secrets through dream-sharing technology.".into(),
        cast: "Leonardo DiCaprio, Joseph Gordon-Levitt, Elliot Page".into(),
        director: "Christopher Nolan".into(),
    }
}

pub fn interstellar_detail() -> MovieDetail {
    MovieDetail {
        id: "tt0816692".into(),
        title: "Interstellar".into(),
        year: "2014".into(),
        runtime: "169 min".into(),
        runtime_minutes: Some(169),
        external_rating: Some(8.7),
        director: "Christopher Nolan".into(),
        ..MovieDetail::default()
    }
}
