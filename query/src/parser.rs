//! Top-level parsing of metrics query URIs.

use std::sync::Arc;

use crate::context::build_context;
use crate::error::{ParseError, Result};
use crate::metrics::ParserMetrics;
use crate::model::{MetricsRequest, MetricsScope, QueryTarget};
use crate::path::{split_uri, tokenize};
use crate::request::MetricsQueryParams;

/// Parse a metrics query URI, such as
/// `/process.bytes/reactor/apps/app1/flows/flow1?count=60`, into a
/// [`MetricsRequest`].
///
/// The path is processed first (metric name, scope, taxonomy), then the query
/// string. The first failing stage determines the returned error.
pub fn parse(uri: &str) -> Result<MetricsRequest> {
    let (path, query) = split_uri(uri);
    let target = parse_target(path)?;
    let params = MetricsQueryParams::from_query_string(query.unwrap_or_default())?;
    assemble(target, &params)
}

/// Parse a request path whose query parameters were already extracted.
pub fn parse_path(path: &str, params: &MetricsQueryParams) -> Result<MetricsRequest> {
    let target = parse_target(path)?;
    assemble(target, params)
}

/// Parser front end that records every outcome in [`ParserMetrics`].
///
/// Parsing itself stays stateless; the counters are atomic, so a single
/// instance can be shared across request handlers.
#[derive(Default)]
pub struct MetricsRequestParser {
    metrics: Arc<ParserMetrics>,
}

impl MetricsRequestParser {
    pub fn new(metrics: Arc<ParserMetrics>) -> Self {
        Self { metrics }
    }

    /// See [`parse`].
    pub fn parse(&self, uri: &str) -> Result<MetricsRequest> {
        self.observe(uri, parse(uri))
    }

    /// See [`parse_path`].
    pub fn parse_path(&self, path: &str, params: &MetricsQueryParams) -> Result<MetricsRequest> {
        self.observe(path, parse_path(path, params))
    }

    pub fn metrics(&self) -> &ParserMetrics {
        &self.metrics
    }

    fn observe(&self, input: &str, result: Result<MetricsRequest>) -> Result<MetricsRequest> {
        if let Err(e) = &result {
            tracing::debug!(input, error = %e, "Rejected metrics request");
        }
        self.metrics.record(&result);
        result
    }
}

fn parse_target(path: &str) -> Result<QueryTarget> {
    let tokens = tokenize(path)?;

    let (scope_segment, taxonomy) = tokens
        .segments
        .split_first()
        .ok_or_else(|| ParseError::MalformedPath("missing scope segment".to_string()))?;
    let scope: MetricsScope = scope_segment.parse()?;

    let context = build_context(taxonomy)?;

    Ok(QueryTarget {
        metric_prefix: tokens.metric,
        scope,
        context_prefix: context.context_prefix,
        tag_prefix: context.tag_prefix,
    })
}

fn assemble(target: QueryTarget, params: &MetricsQueryParams) -> Result<MetricsRequest> {
    let window = params.time_window()?;
    let request = MetricsRequest::new(target, window);
    tracing::debug!(
        metric = request.metric_prefix(),
        scope = %request.scope(),
        request_type = %request.request_type(),
        context = request.context_prefix(),
        tag = request.tag_prefix(),
        "Parsed metrics request"
    );
    Ok(request)
}
