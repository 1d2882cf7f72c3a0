//! Core data types for metrics query requests.

use std::fmt;
use std::str::FromStr;

use prometheus_client::encoding::EncodeLabelValue;
use serde::Serialize;

use crate::error::ParseError;

/// The temporal shape of a metrics query.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, EncodeLabelValue)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    /// Values bucketed over time.
    TimeSeries,
    /// A single summarized value.
    Summary,
    /// A single value aggregated over all time.
    Aggregate,
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestType::TimeSeries => "TIME_SERIES",
            RequestType::Summary => "SUMMARY",
            RequestType::Aggregate => "AGGREGATE",
        };
        f.write_str(name)
    }
}

/// Namespace partition a metric belongs to.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, EncodeLabelValue)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricsScope {
    /// Metrics emitted by the platform itself (`reactor` in the path).
    Reactor,
    /// Metrics emitted by user code (`user` in the path).
    User,
}

impl MetricsScope {
    /// The path token for this scope.
    pub fn segment(self) -> &'static str {
        match self {
            MetricsScope::Reactor => "reactor",
            MetricsScope::User => "user",
        }
    }
}

impl FromStr for MetricsScope {
    type Err = ParseError;

    /// Exact, case-sensitive match on the path token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reactor" => Ok(MetricsScope::Reactor),
            "user" => Ok(MetricsScope::User),
            other => Err(ParseError::UnrecognizedScope(other.to_string())),
        }
    }
}

impl fmt::Display for MetricsScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricsScope::Reactor => f.write_str("REACTOR"),
            MetricsScope::User => f.write_str("USER"),
        }
    }
}

/// A fully parsed metrics query.
///
/// Instances are only produced by [`parse`](crate::parse) and
/// [`parse_path`](crate::parse_path) and cannot be modified afterwards.
/// A downstream query executor reads the fields through the accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRequest {
    #[serde(rename = "type")]
    request_type: RequestType,
    scope: MetricsScope,
    metric_prefix: String,
    context_prefix: Option<String>,
    tag_prefix: Option<String>,
    start_time: Option<i64>,
    end_time: Option<i64>,
    count: Option<u32>,
}

/// Temporal part of a request, as decided by the query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimeWindow {
    pub(crate) request_type: RequestType,
    pub(crate) count: Option<u32>,
    pub(crate) start_time: Option<i64>,
    pub(crate) end_time: Option<i64>,
}

/// What a request path points at: metric, scope and position in the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QueryTarget {
    pub(crate) metric_prefix: String,
    pub(crate) scope: MetricsScope,
    pub(crate) context_prefix: Option<String>,
    pub(crate) tag_prefix: Option<String>,
}

impl MetricsRequest {
    pub(crate) fn new(target: QueryTarget, window: TimeWindow) -> Self {
        Self {
            request_type: window.request_type,
            scope: target.scope,
            metric_prefix: target.metric_prefix,
            context_prefix: target.context_prefix,
            tag_prefix: target.tag_prefix,
            start_time: window.start_time,
            end_time: window.end_time,
            count: window.count,
        }
    }

    pub fn request_type(&self) -> RequestType {
        self.request_type
    }

    pub fn scope(&self) -> MetricsScope {
        self.scope
    }

    /// The decoded metric name.
    pub fn metric_prefix(&self) -> &str {
        &self.metric_prefix
    }

    /// Dot-joined entity path, e.g. `app1.f.flow1.flowlet1`.
    ///
    /// `None` for overview queries that target no application.
    pub fn context_prefix(&self) -> Option<&str> {
        self.context_prefix.as_deref()
    }

    /// Queue, dataset or stream the query is narrowed to.
    pub fn tag_prefix(&self) -> Option<&str> {
        self.tag_prefix.as_deref()
    }

    pub fn start_time(&self) -> Option<i64> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<i64> {
        self.end_time
    }

    /// Number of time buckets requested.
    pub fn count(&self) -> Option<u32> {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::reactor("reactor", MetricsScope::Reactor)]
    #[case::user("user", MetricsScope::User)]
    fn should_parse_scope_token(#[case] token: &str, #[case] expected: MetricsScope) {
        // when
        let scope: MetricsScope = token.parse().unwrap();

        // then
        assert_eq!(scope, expected);
        assert_eq!(scope.segment(), token);
    }

    #[rstest]
    #[case::upper_case("REACTOR")]
    #[case::capitalized("User")]
    #[case::unknown("system")]
    #[case::empty("")]
    fn should_reject_unknown_scope_token(#[case] token: &str) {
        // when
        let result = token.parse::<MetricsScope>();

        // then
        assert_eq!(
            result.unwrap_err(),
            ParseError::UnrecognizedScope(token.to_string())
        );
    }

    #[test]
    fn should_serialize_request_with_wire_names() {
        // given
        let request = MetricsRequest::new(
            QueryTarget {
                metric_prefix: "process.bytes".to_string(),
                scope: MetricsScope::Reactor,
                context_prefix: Some("app1.f.flow1".to_string()),
                tag_prefix: None,
            },
            TimeWindow {
                request_type: RequestType::TimeSeries,
                count: Some(60),
                start_time: Some(1),
                end_time: Some(61),
            },
        );

        // when
        let json = serde_json::to_value(&request).unwrap();

        // then
        assert_eq!(
            json,
            serde_json::json!({
                "type": "TIME_SERIES",
                "scope": "REACTOR",
                "metricPrefix": "process.bytes",
                "contextPrefix": "app1.f.flow1",
                "tagPrefix": null,
                "startTime": 1,
                "endTime": 61,
                "count": 60
            })
        );
    }

    #[test]
    fn should_display_wire_names() {
        assert_eq!(RequestType::TimeSeries.to_string(), "TIME_SERIES");
        assert_eq!(RequestType::Summary.to_string(), "SUMMARY");
        assert_eq!(RequestType::Aggregate.to_string(), "AGGREGATE");
        assert_eq!(MetricsScope::User.to_string(), "USER");
    }
}
