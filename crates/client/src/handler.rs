use std::{fmt, future::Future, sync::Arc};

use fixpoint_core::Observer;
use serde_json::Value;
use tokio::sync::watch;

use crate::{
    chart::ChartHandle,
    config::{ClientConfig, ConfigError},
    event::{ConsoleLog, Event},
    request::{FormInput, SolveRequest},
    response::SolveResponse,
    transport::{HttpTransport, Transport, TransportError},
    view::ResultView,
};

/// Identifies one invocation of the handler. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub(crate) u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A shared flag that aborts an in-flight request.
#[derive(Debug, Clone)]
pub struct CancelToken {
    flag: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag: Arc::new(flag),
        }
    }

    pub fn cancel(&self) {
        self.flag.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.flag.borrow()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        let mut rx = self.flag.subscribe();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// A finished request, waiting to be applied to the handler that sent it.
#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub result: Result<Value, TransportError>,
    cancel: CancelToken,
}

/// What [`Handler::apply`] did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The result region and chart now reflect the reply.
    Rendered,
    /// The inputs were rejected locally and nothing was sent.
    Invalid,
    /// A newer request had been issued; nothing changed.
    Stale,
    /// The request was cancelled; nothing changed.
    Cancelled,
}

/// Turns form submissions into solver requests and renders their replies.
///
/// A handler owns its result region and chart. Each submission gets a
/// [`Ticket`]; only the reply to the most recent ticket is ever rendered.
///
/// Submitting is split in two so callers can run the request wherever they
/// like: [`dispatch`](Self::dispatch) returns a `'static` future, and
/// [`apply`](Self::apply) renders what it resolved to. [`submit`](Self::submit)
/// does both in place.
pub struct Handler<T, L = ConsoleLog> {
    transport: T,
    config: ClientConfig,
    log: L,
    latest: Ticket,
    cancel: Option<CancelToken>,
    in_flight: bool,
    result: ResultView,
    chart: ChartHandle,
}

impl Handler<HttpTransport> {
    /// Creates a handler that talks HTTP and logs to standard error.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid.
    pub fn http(config: ClientConfig) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(transport, config))
    }
}

impl<T> Handler<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Handler {
            transport,
            config,
            log: ConsoleLog,
            latest: Ticket(0),
            cancel: None,
            in_flight: false,
            result: ResultView::Empty,
            chart: ChartHandle::Absent,
        }
    }
}

impl<T, L> Handler<T, L>
where
    T: Transport + Clone + Send + Sync + 'static,
    L: for<'a> Observer<Event<'a>, ()>,
{
    /// Reads the form and starts a request.
    ///
    /// The new ticket supersedes any request still in flight, which is
    /// cancelled. If the inputs are rejected the result region shows why, the
    /// chart is cleared, and `None` is returned without sending anything.
    /// Otherwise the returned future performs exactly one POST, bounded by the
    /// configured timeout, and resolves to a [`Completion`] for
    /// [`apply`](Self::apply).
    pub fn dispatch(
        &mut self,
        form: &FormInput,
    ) -> Option<impl Future<Output = Completion> + Send + use<T, L>> {
        self.log.observe(&Event::InputsRead(form));

        self.latest = Ticket(self.latest.0 + 1);
        let ticket = self.latest;
        if let Some(previous) = self.cancel.take() {
            previous.cancel();
        }

        let request = match SolveRequest::from_form(form, self.config.inputs) {
            Ok(request) => request,
            Err(err) => {
                self.log.observe(&Event::InputRejected(&err));
                self.in_flight = false;
                self.chart.destroy();
                self.result = ResultView::Invalid(err);
                return None;
            }
        };

        self.log.observe(&Event::Dispatched {
            ticket,
            request: &request,
        });

        let cancel = CancelToken::new();
        self.cancel = Some(cancel.clone());
        self.in_flight = true;

        let transport = self.transport.clone();
        let timeout = self.config.timeout;

        Some(async move {
            let result = tokio::select! {
                result = tokio::time::timeout(timeout, transport.post(&request)) => {
                    result.unwrap_or(Err(TransportError::Timeout(timeout)))
                }
                () = cancel.cancelled() => Err(TransportError::Cancelled),
            };

            Completion {
                ticket,
                result,
                cancel,
            }
        })
    }

    /// Renders a completion if it belongs to the latest, uncancelled request.
    pub fn apply(&mut self, completion: Completion) -> Applied {
        let Completion {
            ticket,
            result,
            cancel,
        } = completion;

        if ticket != self.latest {
            self.log.observe(&Event::Stale {
                ticket,
                latest: self.latest,
            });
            return Applied::Stale;
        }

        self.in_flight = false;
        self.cancel = None;

        if cancel.is_cancelled() {
            self.log.observe(&Event::Cancelled { ticket });
            return Applied::Cancelled;
        }

        let payload = match result {
            Ok(payload) => payload,
            Err(error) => {
                self.log.observe(&Event::TransportFailed {
                    ticket,
                    error: &error,
                });
                self.chart.destroy();
                self.result = ResultView::Unreachable;
                return Applied::Rendered;
            }
        };

        match SolveResponse::from_json(&payload) {
            SolveResponse::Converged(report) => {
                self.log.observe(&Event::Succeeded {
                    ticket,
                    payload: &payload,
                });
                self.result = ResultView::from(&report);
                match report.series() {
                    Some(values) => self.chart.render(&self.config.canvas, values),
                    None => {
                        self.chart.destroy();
                    }
                }
            }
            SolveResponse::Failed(failure) => {
                self.log.observe(&Event::Failed {
                    ticket,
                    payload: &payload,
                });
                self.chart.destroy();
                self.result = ResultView::from(failure);
            }
        }

        Applied::Rendered
    }

    /// Dispatches and applies in one step.
    pub async fn submit(&mut self, form: &FormInput) -> Applied {
        match self.dispatch(form) {
            Some(request) => {
                let completion = request.await;
                self.apply(completion)
            }
            None => Applied::Invalid,
        }
    }

    /// Cancels the request in flight, if any.
    pub fn cancel(&mut self) {
        if let Some(cancel) = &self.cancel {
            cancel.cancel();
        }
    }

    /// A token that cancels the request currently in flight.
    #[must_use]
    pub fn cancel_token(&self) -> Option<CancelToken> {
        self.cancel.clone()
    }
}

impl<T, L> Handler<T, L> {
    /// Replaces the log observer.
    pub fn with_log<L2>(self, log: L2) -> Handler<T, L2> {
        Handler {
            transport: self.transport,
            config: self.config,
            log,
            latest: self.latest,
            cancel: self.cancel,
            in_flight: self.in_flight,
            result: self.result,
            chart: self.chart,
        }
    }

    #[must_use]
    pub fn result(&self) -> &ResultView {
        &self.result
    }

    #[must_use]
    pub fn chart(&self) -> &ChartHandle {
        &self.chart
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The most recently issued ticket.
    #[must_use]
    pub fn latest(&self) -> Ticket {
        self.latest
    }

    /// Whether the latest request is still awaiting its reply.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}
