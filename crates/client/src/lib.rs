//! Request/render handler for the fixed-point iteration service.
//!
//! A [`Handler`] takes the four raw values of the solver form, posts them to
//! `POST /fixed-point-iteration`, and turns the reply into what a front end
//! shows: a [`ResultView`] for the result region and a [`ChartHandle`] for the
//! convergence chart.
//!
//! The handler knows nothing about the iteration itself; it only consumes the
//! reply contract:
//!
//! - `success: true` with `x`, `f(x)`, `n`, `error`, and an optional
//!   `iterations` table, whose `x_n` column becomes the chart
//! - anything else is a failure, shown as its `message` and `iteration`
//! - no JSON at all (connection refused, timeout, garbage body) shows a fixed
//!   fallback text
//!
//! Each submission is ticketed, and only the latest ticket's reply is
//! rendered.
//!
//! # Example
//! ```no_run
//! use fixpoint_client::{ClientConfig, FormInput, Handler};
//!
//! # async fn demo() -> Result<(), fixpoint_client::ConfigError> {
//! let mut handler = Handler::http(ClientConfig::default())?;
//! handler
//!     .submit(&FormInput::new("cos(x) - x", "1.5", "0.0001", "50"))
//!     .await;
//!
//! for line in handler.result().lines() {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```

mod chart;
mod config;
mod event;
mod handler;
mod request;
mod response;
mod transport;
mod view;

pub use chart::{ChartHandle, LineChart, SERIES_TITLE, X_AXIS_TITLE, Y_AXIS_TITLE};
pub use config::{ClientConfig, ConfigError, DEFAULT_CANVAS, DEFAULT_ENDPOINT};
pub use event::{ConsoleLog, Event};
pub use handler::{Applied, CancelToken, Completion, Handler, Ticket};
pub use request::{FormInput, InputError, InputMode, SolveRequest};
pub use response::{
    Failure, IterationRecord, MALFORMED, Report, SolveResponse, format_number, format_optional,
};
pub use transport::{HttpTransport, Transport, TransportError};
pub use view::{CONVERGED_HEADING, FETCH_FAILED, ResultView};
