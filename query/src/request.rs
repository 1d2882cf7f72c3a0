//! Query parameters of a metrics request and their interpretation.

use serde::Deserialize;

use crate::error::{ParseError, Result};
use crate::model::{RequestType, TimeWindow};

/// Query parameters recognized by the metrics query endpoint.
///
/// Unknown parameters are ignored, so this can be deserialized directly by a
/// request layer's query extractor and handed to [`parse_path`](crate::parse_path).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MetricsQueryParams {
    /// `true` requests a single summarized value.
    pub summary: Option<String>,
    /// `true` requests a value aggregated over all time.
    pub aggregate: Option<String>,
    /// Number of time buckets.
    pub count: Option<String>,
    /// Start of the time range.
    pub start: Option<String>,
    /// End of the time range.
    pub end: Option<String>,
}

impl MetricsQueryParams {
    /// Decode a raw, form-encoded query string such as `count=60&start=1`.
    ///
    /// Decoding is lenient: unknown or undecodable parameters are ignored and
    /// values are only validated when [`time_window`](Self::time_window)
    /// interprets them. The first occurrence of a repeated parameter wins.
    pub fn from_query_string(query: &str) -> Result<Self> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
            .map_err(|e| ParseError::malformed_parameter("query", query, e))?;

        let mut params = Self::default();
        for (name, value) in pairs {
            let slot = match name.as_str() {
                "summary" => &mut params.summary,
                "aggregate" => &mut params.aggregate,
                "count" => &mut params.count,
                "start" => &mut params.start,
                "end" => &mut params.end,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        Ok(params)
    }

    /// Decide the request type and, for time series, the bucket range.
    ///
    /// `summary=true` wins over `aggregate=true` when both are given.
    pub(crate) fn time_window(&self) -> Result<TimeWindow> {
        if is_true(self.summary.as_deref()) {
            return Ok(TimeWindow::without_range(RequestType::Summary));
        }
        if is_true(self.aggregate.as_deref()) {
            return Ok(TimeWindow::without_range(RequestType::Aggregate));
        }

        Ok(TimeWindow {
            request_type: RequestType::TimeSeries,
            count: parse_number("count", self.count.as_deref())?,
            start_time: parse_number("start", self.start.as_deref())?,
            end_time: parse_number("end", self.end.as_deref())?,
        })
    }
}

impl TimeWindow {
    fn without_range(request_type: RequestType) -> Self {
        Self {
            request_type,
            count: None,
            start_time: None,
            end_time: None,
        }
    }
}

fn is_true(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

fn parse_number<T>(name: &str, value: Option<&str>) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| ParseError::malformed_parameter(name, v, e))
        })
        .transpose()
}
