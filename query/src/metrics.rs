//! Prometheus metrics for request parsing.

use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

use crate::error::{ParseErrorKind, Result};
use crate::model::{MetricsRequest, MetricsScope, RequestType};

/// Labels for successfully parsed requests.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct RequestLabels {
    pub request_type: RequestType,
    pub scope: MetricsScope,
}

/// Labels for rejected requests.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ErrorLabels {
    pub kind: ParseErrorKind,
}

/// Container for all parser metrics.
pub struct ParserMetrics {
    registry: Registry,

    /// Counter of requests parsed, by type and scope.
    pub requests_parsed_total: Family<RequestLabels, Counter>,

    /// Counter of requests rejected, by error kind.
    pub parse_errors_total: Family<ErrorLabels, Counter>,
}

impl Default for ParserMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserMetrics {
    /// Create a new metrics registry with all metrics registered.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let requests_parsed_total = Family::<RequestLabels, Counter>::default();
        registry.register(
            "metrics_query_requests_parsed",
            "Total number of metrics query requests parsed",
            requests_parsed_total.clone(),
        );

        let parse_errors_total = Family::<ErrorLabels, Counter>::default();
        registry.register(
            "metrics_query_parse_errors",
            "Total number of metrics query requests rejected",
            parse_errors_total.clone(),
        );

        Self {
            registry,
            requests_parsed_total,
            parse_errors_total,
        }
    }

    /// Count the outcome of one parse.
    pub fn record(&self, result: &Result<MetricsRequest>) {
        match result {
            Ok(request) => {
                self.requests_parsed_total
                    .get_or_create(&RequestLabels {
                        request_type: request.request_type(),
                        scope: request.scope(),
                    })
                    .inc();
            }
            Err(err) => {
                self.parse_errors_total
                    .get_or_create(&ErrorLabels { kind: err.kind() })
                    .inc();
            }
        }
    }

    /// Encode all metrics to Prometheus text format.
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        if let Err(e) = prometheus_client::encoding::text::encode(&mut buffer, &self.registry) {
            tracing::warn!("Failed to encode parser metrics: {}", e);
        }
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    #[test]
    fn should_create_default_metrics() {
        // given/when
        let metrics = ParserMetrics::new();

        // then
        let encoded = metrics.encode();
        assert!(encoded.contains("# HELP metrics_query_requests_parsed"));
        assert!(encoded.contains("# HELP metrics_query_parse_errors"));
    }

    #[test]
    fn should_count_parsed_requests_by_type_and_scope() {
        // given
        let metrics = ParserMetrics::new();
        let request = crate::parse("/reads/user/apps/app1?summary=true");

        // when
        metrics.record(&request);
        metrics.record(&request);

        // then
        let count = metrics
            .requests_parsed_total
            .get_or_create(&RequestLabels {
                request_type: RequestType::Summary,
                scope: MetricsScope::User,
            })
            .get();
        assert_eq!(count, 2);
        let encoded = metrics.encode();
        assert!(encoded.contains("request_type=\"Summary\""));
        assert!(encoded.contains("scope=\"User\""));
    }

    #[test]
    fn should_count_errors_by_kind() {
        // given
        let metrics = ParserMetrics::new();
        let result: Result<MetricsRequest> = Err(ParseError::UnrecognizedScope("x".to_string()));

        // when
        metrics.record(&result);

        // then
        let count = metrics
            .parse_errors_total
            .get_or_create(&ErrorLabels {
                kind: ParseErrorKind::UnrecognizedScope,
            })
            .get();
        assert_eq!(count, 1);
    }
}
