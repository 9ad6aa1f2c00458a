//! Debounced, latest-wins query pipeline.
//!
//! A [`QueryPipeline`] turns a stream of user submissions into a stream of
//! fetch results:
//!
//! 1. **Debounce**: a fetch is dispatched only once the input has been quiet
//!    for the debounce window. Every submission restarts the window.
//! 2. **Latest wins**: dispatching a fetch aborts the one in flight, and a
//!    result from an older dispatch that still arrives is discarded.
//! 3. **Distinct**: a result structurally equal to the previously emitted one
//!    is not re-emitted.
//! 4. **Replay**: [`results`](QueryPipeline::results) receivers see the latest
//!    emitted result immediately.
//!
//! Submissions never block and never fail. Unread input is overwritten by
//! newer input, so only the most recent query of a burst is ever fetched.
//!
//! Each submission is stamped with a ticket. Once a dispatched fetch
//! completes, its ticket is published on [`settled`](QueryPipeline::settled)
//! whether or not the result itself was emitted. Callers that track a
//! loading flag wait on the ticket rather than on the result.
//!
//! One driver task runs per pipeline and is aborted when the pipeline is
//! dropped, together with any fetch it has in flight.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use tipple_core::Resource;

/// A query waiting to be fetched.
#[derive(Debug, Clone)]
struct Submission<Q> {
    ticket: u64,
    query: Q,
}

pub struct QueryPipeline<Q, T> {
    input: watch::Sender<Option<Submission<Q>>>,
    results: Arc<watch::Sender<Option<Resource<T>>>>,
    settled: Arc<watch::Sender<u64>>,
    driver: JoinHandle<()>,
}

impl<Q, T> QueryPipeline<Q, T>
where
    Q: Clone + Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Start a pipeline that runs `fetch` for each debounced query.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, Fut>(debounce: Duration, fetch: F) -> Self
    where
        F: Fn(Q) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Resource<T>> + Send + 'static,
    {
        let (input, input_rx) = watch::channel(None);
        let (results, _) = watch::channel(None);
        let (settled, _) = watch::channel(0);
        let results = Arc::new(results);
        let settled = Arc::new(settled);

        let driver = tokio::spawn(drive(
            input_rx,
            Arc::clone(&results),
            Arc::clone(&settled),
            debounce,
            fetch,
        ));

        Self {
            input,
            results,
            settled,
            driver,
        }
    }

    /// Queue `query` and return its ticket.
    ///
    /// Tickets start at 1 and increase by one per submission.
    pub fn submit(&self, query: Q) -> u64 {
        let mut ticket = 0;
        self.input.send_modify(|slot| {
            ticket = slot.as_ref().map_or(0, |s| s.ticket) + 1;
            *slot = Some(Submission { ticket, query });
        });
        ticket
    }

    /// Subscribe to emitted results. `None` until the first fetch completes.
    pub fn results(&self) -> watch::Receiver<Option<Resource<T>>> {
        self.results.subscribe()
    }

    /// Subscribe to the ticket of the newest completed fetch. `0` until the
    /// first fetch completes.
    pub fn settled(&self) -> watch::Receiver<u64> {
        self.settled.subscribe()
    }

    pub fn latest(&self) -> Option<Resource<T>> {
        self.results.borrow().clone()
    }

    /// The most recently submitted query, fetched or not.
    pub fn last_query(&self) -> Option<Q> {
        self.input.borrow().as_ref().map(|s| s.query.clone())
    }
}

impl<Q, T> Drop for QueryPipeline<Q, T> {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

async fn drive<Q, T, F, Fut>(
    mut input: watch::Receiver<Option<Submission<Q>>>,
    results: Arc<watch::Sender<Option<Resource<T>>>>,
    settled: Arc<watch::Sender<u64>>,
    debounce: Duration,
    fetch: F,
) where
    Q: Clone + Send + Sync + 'static,
    T: PartialEq + Send + Sync + 'static,
    F: Fn(Q) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Resource<T>> + Send + 'static,
{
    let mut pending: Option<Submission<Q>> = None;
    let mut deadline = Instant::now();
    let mut generation: u64 = 0;
    let mut in_flight: JoinSet<(u64, u64, Resource<T>)> = JoinSet::new();

    loop {
        tokio::select! {
            changed = input.changed() => {
                if changed.is_err() {
                    break;
                }
                pending = input.borrow_and_update().clone();
                deadline = Instant::now() + debounce;
            }

            _ = sleep_until(deadline), if pending.is_some() => {
                let Some(submission) = pending.take() else {
                    continue;
                };
                generation += 1;
                if !in_flight.is_empty() {
                    debug!(ticket = submission.ticket, "superseding in-flight fetch");
                    in_flight.abort_all();
                }

                let dispatched = generation;
                let ticket = submission.ticket;
                let fut = fetch(submission.query);
                in_flight.spawn(async move { (dispatched, ticket, fut.await) });
            }

            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                let (dispatched, ticket, result) = match joined {
                    Ok(done) => done,
                    Err(e) if e.is_cancelled() => continue,
                    Err(e) => {
                        warn!(error = %e, "query fetch panicked");
                        continue;
                    }
                };

                if dispatched != generation {
                    debug!(ticket, "discarding stale result");
                    continue;
                }
                if let Resource::Error(e) = &result {
                    warn!(ticket, error = %e, "query failed");
                }

                let emitted = results.send_if_modified(|latest| {
                    if latest.as_ref() == Some(&result) {
                        false
                    } else {
                        *latest = Some(result);
                        true
                    }
                });
                if !emitted {
                    debug!(ticket, "suppressing duplicate result");
                }
                settled.send_replace(ticket);
            }
        }
    }
}
