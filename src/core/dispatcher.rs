//! Fan-out of one record to many transports
//!
//! Every dispatch allocates its own aggregation state: the number of
//! transports still pending, the first error seen, and the resolver to call
//! once. Each transport gets a [`Done`] handle pointing at that state.
//! Completions are applied under a mutex and the resolver is taken out of its
//! slot in the same critical section that brings `pending` to zero, so the
//! outcome is reported exactly once no matter how completions interleave.
//!
//! The resolver is caller code and never runs inside the per-transport
//! `catch_unwind`. An outcome reached while transports are still being
//! invoked is parked and delivered by `dispatch` once the loop is done. An
//! outcome reached by a `Done` dropped during unwinding on another thread is
//! delivered from a short-lived `logger-resolver` thread.

use super::error::{LoggerError, Result};
use super::log_record::LogRecord;
use super::metrics::DispatchMetrics;
use super::transport::Transport;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Aggregate result of one dispatch: `Ok` or the first transport error
pub type DispatchOutcome = Result<()>;

/// Receives the outcome of a dispatch, once
pub type Resolver = Box<dyn FnOnce(DispatchOutcome) + Send + 'static>;

struct Aggregate {
    pending: usize,
    first_error: Option<LoggerError>,
    resolver: Option<Resolver>,
    /// Set while `dispatch` is still invoking transports
    dispatching: bool,
    /// Outcome reached while `dispatching`, delivered when the loop ends
    parked: Option<DispatchOutcome>,
}

struct DispatchState {
    aggregate: Mutex<Aggregate>,
    metrics: Arc<DispatchMetrics>,
}

impl DispatchState {
    fn settle(&self, result: Result<()>) {
        let resolution = {
            let mut aggregate = self.aggregate.lock();

            if let Err(err) = result {
                self.metrics.record_transport_failure();
                if aggregate.first_error.is_none() {
                    aggregate.first_error = Some(err);
                } else {
                    self.metrics.record_suppressed_error();
                }
            }

            // Each Done settles once, so pending cannot underflow
            aggregate.pending -= 1;
            if aggregate.pending > 0 {
                return;
            }

            let outcome = match aggregate.first_error.take() {
                None => {
                    self.metrics.record_resolved_ok();
                    Ok(())
                }
                Some(err) => {
                    self.metrics.record_resolved_err();
                    Err(err)
                }
            };
            if aggregate.dispatching {
                aggregate.parked = Some(outcome);
                return;
            }
            (aggregate.resolver.take(), outcome)
        };

        if let (Some(resolver), outcome) = resolution {
            deliver(resolver, outcome);
        }
    }

    /// End the invocation loop and hand back an outcome parked during it
    fn finish_dispatching(&self) -> Option<(Resolver, DispatchOutcome)> {
        let mut aggregate = self.aggregate.lock();
        aggregate.dispatching = false;
        let outcome = aggregate.parked.take()?;
        aggregate.resolver.take().map(|resolver| (resolver, outcome))
    }
}

/// Run the caller's resolver, never while this thread is unwinding
fn deliver(resolver: Resolver, outcome: DispatchOutcome) {
    if !std::thread::panicking() {
        resolver(outcome);
        return;
    }

    let spawned = std::thread::Builder::new()
        .name("logger-resolver".to_string())
        .spawn(move || resolver(outcome));
    if let Err(e) = spawned {
        eprintln!(
            "[LOGGER ERROR] Failed to deliver dispatch outcome after a transport panic: {}",
            e
        );
    }
}

/// One-shot completion handle given to a transport for one record
///
/// Consuming it reports the transport's result. Dropping it unconsumed reports
/// [`LoggerError::CompletionDropped`], or [`LoggerError::TransportPanicked`] if
/// the drop happens while the thread is unwinding.
pub struct Done {
    state: Option<Arc<DispatchState>>,
    transport: String,
}

impl Done {
    pub fn complete(mut self, result: Result<()>) {
        if let Some(state) = self.state.take() {
            state.settle(result);
        }
    }

    pub fn succeed(self) {
        self.complete(Ok(()));
    }

    pub fn fail(self, error: LoggerError) {
        self.complete(Err(error));
    }

    /// Name of the transport this handle belongs to
    pub fn transport(&self) -> &str {
        &self.transport
    }
}

impl Drop for Done {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            let err = if std::thread::panicking() {
                LoggerError::transport_panicked(
                    self.transport.as_str(),
                    "panicked before signalling completion",
                )
            } else {
                LoggerError::completion_dropped(self.transport.as_str())
            };
            state.settle(Err(err));
        }
    }
}

impl fmt::Debug for Done {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Done")
            .field("transport", &self.transport)
            .field("settled", &self.state.is_none())
            .finish()
    }
}

/// Stateless fan-out engine; all per-call state lives in the [`Done`] handles
#[derive(Debug, Clone)]
pub struct Dispatcher {
    metrics: Arc<DispatchMetrics>,
}

impl Dispatcher {
    pub fn new(metrics: Arc<DispatchMetrics>) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// Hand `record` to every transport and resolve once all have completed
    ///
    /// With no transports the resolver runs immediately with `Ok(())`. A
    /// transport that panics inside `log` counts as a failure of that
    /// transport only; the remaining transports are still invoked.
    pub fn dispatch(
        &self,
        transports: &[Box<dyn Transport>],
        record: LogRecord,
        resolver: Option<Resolver>,
    ) {
        self.metrics.record_dispatch();

        if transports.is_empty() {
            self.metrics.record_resolved_ok();
            if let Some(resolver) = resolver {
                resolver(Ok(()));
            }
            return;
        }

        let record = Arc::new(record);
        let state = Arc::new(DispatchState {
            aggregate: Mutex::new(Aggregate {
                pending: transports.len(),
                first_error: None,
                resolver,
                dispatching: true,
                parked: None,
            }),
            metrics: Arc::clone(&self.metrics),
        });

        for (idx, transport) in transports.iter().enumerate() {
            let done = Done {
                state: Some(Arc::clone(&state)),
                transport: transport.name().to_string(),
            };
            let record = Arc::clone(&record);

            let invoke_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                transport.log(record, done)
            }));

            if let Err(panic_info) = invoke_result {
                // The unwound Done has already reported the failure
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!(
                    "[LOGGER CRITICAL] Transport #{} ({}) panicked: {}. \
                     Other transports continue to function.",
                    idx,
                    transport.name(),
                    panic_msg
                );
            }
        }

        // Outside every catch_unwind, so a panicking resolver reaches the caller
        if let Some((resolver, outcome)) = state.finish_dispatching() {
            resolver(outcome);
        }
    }
}
