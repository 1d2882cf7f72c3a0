//! Metrics Query - parsing of REST-style metrics query URIs.
//!
//! A metrics query names a metric, a scope, an optional position in the
//! application taxonomy and a temporal shape:
//!
//! ```text
//! /<metric>/<scope>[/datasets|streams/<id>][/apps/<app>[/<program kind>/<id>...]]?<params>
//! ```
//!
//! [`parse`] turns such a URI into an immutable [`MetricsRequest`] that a
//! downstream query executor can run against the metrics store.
//!
//! # Key Concepts
//!
//! - **Scope**: the namespace partition, `reactor` for platform metrics or
//!   `user` for metrics emitted by user code.
//! - **Context prefix**: dot-joined path through the taxonomy, e.g.
//!   `app1.f.flow1.flowlet1`. Absent for overview queries.
//! - **Tag prefix**: a queue, dataset or stream the query is narrowed to.
//! - **Request type**: `summary=true` and `aggregate=true` select single-value
//!   queries, anything else is a time series with optional `count`, `start`
//!   and `end`.
//!
//! # Example
//!
//! ```
//! use metrics_query::{RequestType, parse};
//!
//! let request = parse("/process.bytes/reactor/apps/app1/flows/flow1?count=60").unwrap();
//! assert_eq!(request.request_type(), RequestType::TimeSeries);
//! assert_eq!(request.context_prefix(), Some("app1.f.flow1"));
//! assert_eq!(request.count(), Some(60));
//! ```

#[cfg(feature = "cli")]
pub mod cli;
mod context;
mod error;
mod metrics;
mod model;
mod parser;
mod path;
mod request;

pub use error::{ParseError, ParseErrorKind, Result};
pub use metrics::{ErrorLabels, ParserMetrics, RequestLabels};
pub use model::{MetricsRequest, MetricsScope, RequestType};
pub use parser::{MetricsRequestParser, parse, parse_path};
pub use request::MetricsQueryParams;
