//! Currency converter.
//!
//! Same request discipline as search: every input change cancels the
//! previous conversion and only the latest request id is applied.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use popcorn_api::traits::{Classify, Currency, ExchangeService, FetchFailure};

use crate::failure::user_message;

const STATUS_MESSAGE: &str = "Something went wrong while converting.";
const INVALID_AMOUNT_MESSAGE: &str = "Enter a positive amount.";

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionState {
    pub amount: f64,
    pub from: Currency,
    pub to: Currency,
    pub converted: Option<f64>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for ConversionState {
    fn default() -> Self {
        Self {
            amount: 1.0,
            from: Currency::Usd,
            to: Currency::Eur,
            converted: None,
            is_loading: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionDispatch {
    /// Nothing to convert, the amount was copied through.
    Immediate,
    /// Amount is negative or not a finite number, no request was made.
    Invalid,
    Started { request_id: u64 },
}

#[derive(Debug)]
pub struct ConversionResolved {
    pub request_id: u64,
    pub outcome: Result<f64, FetchFailure>,
}

struct InFlight {
    request_id: u64,
    cancel: CancellationToken,
}

pub struct Converter<X> {
    service: Arc<X>,
    state: ConversionState,
    in_flight: Option<InFlight>,
    next_request_id: u64,
    tx: mpsc::UnboundedSender<ConversionResolved>,
    rx: mpsc::UnboundedReceiver<ConversionResolved>,
}

impl<X: ExchangeService + 'static> Converter<X> {
    pub fn new(service: Arc<X>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            service,
            state: ConversionState::default(),
            in_flight: None,
            next_request_id: 1,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &ConversionState {
        &self.state
    }

    pub fn set_amount(&mut self, amount: f64) -> ConversionDispatch {
        self.state.amount = amount;
        self.refresh()
    }

    pub fn set_from(&mut self, from: Currency) -> ConversionDispatch {
        self.state.from = from;
        self.refresh()
    }

    pub fn set_to(&mut self, to: Currency) -> ConversionDispatch {
        self.state.to = to;
        self.refresh()
    }

    /// Recompute `converted` for the current inputs.
    pub fn refresh(&mut self) -> ConversionDispatch {
        self.cancel_in_flight();
        self.state.error = None;

        let ConversionState {
            amount, from, to, ..
        } = self.state;
        if !amount.is_finite() || amount < 0.0 {
            debug!(amount, "Refusing to convert invalid amount");
            self.state.converted = None;
            self.state.is_loading = false;
            self.state.error = Some(INVALID_AMOUNT_MESSAGE.to_string());
            return ConversionDispatch::Invalid;
        }
        if amount == 0.0 || from == to {
            self.state.converted = Some(amount);
            self.state.is_loading = false;
            return ConversionDispatch::Immediate;
        }

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        let cancel = CancellationToken::new();
        self.in_flight = Some(InFlight {
            request_id,
            cancel: cancel.clone(),
        });
        self.state.is_loading = true;

        debug!(request_id, amount, %from, %to, "Dispatching conversion");
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = service
                .convert(amount, from, to, &cancel)
                .await
                .map_err(|e| e.classify());
            let _ = tx.send(ConversionResolved {
                request_id,
                outcome,
            });
        });

        ConversionDispatch::Started { request_id }
    }

    /// Apply a resolution. Returns `false` if it was stale and dropped.
    pub fn apply(&mut self, resolved: ConversionResolved) -> bool {
        match &self.in_flight {
            Some(current) if current.request_id == resolved.request_id => {}
            _ => {
                debug!(request_id = resolved.request_id, "Discarding stale conversion");
                return false;
            }
        }
        self.in_flight = None;
        self.state.is_loading = false;

        match resolved.outcome {
            Ok(value) => {
                self.state.converted = Some(value);
                self.state.error = None;
            }
            Err(failure) => {
                if let Some(message) = user_message(failure, STATUS_MESSAGE) {
                    warn!(error = %message, "Conversion failed");
                    self.state.error = Some(message);
                }
            }
        }
        true
    }

    pub async fn next_event(&mut self) -> Option<ConversionResolved> {
        self.rx.recv().await
    }

    pub fn handle(&mut self, resolved: ConversionResolved) -> bool {
        self.apply(resolved)
    }

    /// Wait for one resolution and apply it. Returns whether it was applied.
    pub async fn process_next(&mut self) -> bool {
        match self.next_event().await {
            Some(resolved) => self.apply(resolved),
            None => false,
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some(prev) = self.in_flight.take() {
            prev.cancel.cancel();
        }
    }
}

impl<X> Drop for Converter<X> {
    fn drop(&mut self) {
        if let Some(prev) = self.in_flight.take() {
            prev.cancel.cancel();
        }
    }
}
