//! Turns a burst of typed query terms into a throttled sequence of results.
//!
//! Three stages, in order: a debounce buffer that only releases a term after
//! a quiet period, an adjacent-duplicate filter against the last released
//! term, and latest-wins delivery keyed on a request sequence number.

use std::{sync::Arc, time::Duration};

use shared::domain::Hero;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::debug;

use crate::service::HeroApi;

/// A term released by [`SearchState`] that should be searched now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub term: String,
}

#[derive(Debug, Clone)]
pub struct SearchState {
    debounce: Duration,
    pending: Option<(String, Instant)>,
    last_released: Option<String>,
    latest_seq: u64,
}

impl SearchState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            pending: None,
            last_released: None,
            latest_seq: 0,
        }
    }

    /// Buffers `term`, replacing any pending one and restarting the quiet period.
    pub fn push(&mut self, term: impl Into<String>, now: Instant) {
        self.pending = Some((term.into(), now + self.debounce));
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Releases the pending term once its quiet period has elapsed.
    pub fn poll_due(&mut self, now: Instant) -> Option<SearchTicket> {
        if self.deadline()? > now {
            return None;
        }
        let (term, _) = self.pending.take()?;
        self.release(term)
    }

    /// Releases the pending term without waiting; used when input ends.
    pub fn flush(&mut self) -> Option<SearchTicket> {
        let (term, _) = self.pending.take()?;
        self.release(term)
    }

    fn release(&mut self, term: String) -> Option<SearchTicket> {
        if self.last_released.as_deref() == Some(term.as_str()) {
            debug!(%term, "search term unchanged; skipping");
            return None;
        }
        self.last_released = Some(term.clone());
        self.latest_seq += 1;
        Some(SearchTicket {
            seq: self.latest_seq,
            term,
        })
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest_seq
    }

    /// Passes `heroes` through only when they answer the newest ticket.
    pub fn accept(&self, seq: u64, heroes: Vec<Hero>) -> Option<Vec<Hero>> {
        self.is_current(seq).then_some(heroes)
    }
}

/// Handle to a running search stream.
///
/// Feed keystrokes with [`HeroSearch::search`] and read result collections
/// with [`HeroSearch::next_results`]. Dropping the handle, or turning it into
/// a stream with [`HeroSearch::into_results`], closes the input; a term still
/// waiting out its quiet period is then searched right away.
pub struct HeroSearch {
    terms: mpsc::UnboundedSender<String>,
    results: mpsc::UnboundedReceiver<Vec<Hero>>,
}

impl HeroSearch {
    /// Starts the driver task on the current tokio runtime.
    pub fn spawn(api: Arc<dyn HeroApi>, debounce: Duration) -> Self {
        let (terms_tx, terms_rx) = mpsc::unbounded_channel();
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        tokio::spawn(drive(api, SearchState::new(debounce), terms_rx, results_tx));
        Self {
            terms: terms_tx,
            results: results_rx,
        }
    }

    pub fn search(&self, term: impl Into<String>) {
        if self.terms.send(term.into()).is_err() {
            debug!("search driver stopped; dropping term");
        }
    }

    pub async fn next_results(&mut self) -> Option<Vec<Hero>> {
        self.results.recv().await
    }

    pub fn into_results(self) -> UnboundedReceiverStream<Vec<Hero>> {
        UnboundedReceiverStream::new(self.results)
    }
}

async fn drive(
    api: Arc<dyn HeroApi>,
    mut state: SearchState,
    mut terms: mpsc::UnboundedReceiver<String>,
    results: mpsc::UnboundedSender<Vec<Hero>>,
) {
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<(u64, Vec<Hero>)>();
    let mut in_flight: Option<JoinHandle<()>> = None;
    let mut input_open = true;

    loop {
        if !input_open {
            if let Some(ticket) = state.flush() {
                start_search(&api, ticket, &done_tx, &mut in_flight);
            }
        }
        let deadline = state.deadline();
        if !input_open && deadline.is_none() && in_flight.is_none() {
            break;
        }

        tokio::select! {
            term = terms.recv(), if input_open => match term {
                Some(term) => state.push(term, Instant::now()),
                None => input_open = false,
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some(ticket) = state.poll_due(Instant::now()) {
                    start_search(&api, ticket, &done_tx, &mut in_flight);
                }
            }
            Some((seq, heroes)) = done_rx.recv() => {
                let Some(heroes) = state.accept(seq, heroes) else {
                    debug!(seq, latest = state.latest_seq(), "discarding stale search result");
                    continue;
                };
                in_flight = None;
                if results.send(heroes).is_err() {
                    break;
                }
            }
        }
    }

    if let Some(task) = in_flight {
        task.abort();
    }
}

fn start_search(
    api: &Arc<dyn HeroApi>,
    ticket: SearchTicket,
    done: &mpsc::UnboundedSender<(u64, Vec<Hero>)>,
    in_flight: &mut Option<JoinHandle<()>>,
) {
    debug!(seq = ticket.seq, term = %ticket.term, "starting search");
    let api = Arc::clone(api);
    let done = done.clone();
    let task = tokio::spawn(async move {
        let heroes = api.search(&ticket.term).await;
        let _ = done.send((ticket.seq, heroes));
    });
    if let Some(superseded) = in_flight.replace(task) {
        superseded.abort();
    }
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;
