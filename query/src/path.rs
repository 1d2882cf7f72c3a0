//! URI tokenizing and strict percent-decoding of path segments.

use std::borrow::Cow;

use crate::error::{ParseError, Result};

/// Splits a request URI into its raw path and optional raw query string.
///
/// A fragment, if any, is dropped.
pub(crate) fn split_uri(uri: &str) -> (&str, Option<&str>) {
    let uri = uri.split_once('#').map_or(uri, |(before, _)| before);
    match uri.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (uri, None),
    }
}

/// Decoded path of a metrics request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PathTokens {
    /// Decoded metric name.
    pub(crate) metric: String,
    /// Decoded segments following the metric name, empty ones removed.
    pub(crate) segments: Vec<String>,
}

/// Splits a raw path into the metric name and the taxonomy segments.
///
/// Splitting happens on the encoded path, so an encoded `/` (`%2F`) inside
/// the metric name never acts as a separator. Each segment is decoded on its
/// own.
pub(crate) fn tokenize(path: &str) -> Result<PathTokens> {
    let path = path.strip_prefix('/').unwrap_or(path);
    let mut raw_segments = path.split('/');

    let raw_metric = raw_segments.next().unwrap_or_default();
    if raw_metric.is_empty() {
        return Err(ParseError::MalformedPath(
            "missing metric name segment".to_string(),
        ));
    }
    let metric = decode_segment(raw_metric)?;

    let segments = raw_segments
        .filter(|s| !s.is_empty())
        .map(decode_segment)
        .collect::<Result<Vec<_>>>()?;

    Ok(PathTokens { metric, segments })
}

/// Percent-decodes a single path segment. `+` stays literal.
pub(crate) fn decode_segment(raw: &str) -> Result<String> {
    check_escapes(raw).map_err(|reason| ParseError::BadEncoding {
        segment: raw.to_string(),
        reason,
    })?;
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .map_err(|e| ParseError::BadEncoding {
            segment: raw.to_string(),
            reason: format!("decoded bytes are not valid UTF-8: {}", e),
        })
}

/// Rejects any `%` not followed by two hex digits.
///
/// `urlencoding` passes such sequences through untouched, which would let a
/// truncated escape silently become part of a metric name.
fn check_escapes(raw: &str) -> std::result::Result<(), String> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let is_hex = |offset: usize| bytes.get(i + offset).is_some_and(|b| b.is_ascii_hexdigit());
            if !(is_hex(1) && is_hex(2)) {
                return Err(format!("incomplete escape sequence at offset {}", i));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::path_only("/reads/reactor", "/reads/reactor", None)]
    #[case::with_query("/reads/reactor?count=60", "/reads/reactor", Some("count=60"))]
    #[case::empty_query("/reads/reactor?", "/reads/reactor", Some(""))]
    #[case::fragment("/reads/reactor?summary=true#top", "/reads/reactor", Some("summary=true"))]
    #[case::fragment_without_query("/reads/reactor#top", "/reads/reactor", None)]
    fn should_split_uri(
        #[case] uri: &str,
        #[case] expected_path: &str,
        #[case] expected_query: Option<&str>,
    ) {
        // when
        let (path, query) = split_uri(uri);

        // then
        assert_eq!(path, expected_path);
        assert_eq!(query, expected_query);
    }

    #[test]
    fn should_tokenize_metric_and_segments() {
        // when
        let tokens = tokenize("/process.bytes/reactor/apps/app1").unwrap();

        // then
        assert_eq!(tokens.metric, "process.bytes");
        assert_eq!(tokens.segments, vec!["reactor", "apps", "app1"]);
    }

    #[test]
    fn should_keep_encoded_slash_inside_metric_name() {
        // given
        let path = "/%2Fweird%3Fme%2Btr%20ic%23%24name%2F%2F%2F%2F/user/apps/app1";

        // when
        let tokens = tokenize(path).unwrap();

        // then
        assert_eq!(tokens.metric, "/weird?me+tr ic#$name////");
        assert_eq!(tokens.segments, vec!["user", "apps", "app1"]);
    }

    #[test]
    fn should_drop_empty_segments() {
        // when
        let tokens = tokenize("/loads/user//apps/app1/").unwrap();

        // then
        assert_eq!(tokens.segments, vec!["user", "apps", "app1"]);
    }

    #[test]
    fn should_accept_path_without_leading_slash() {
        // when
        let tokens = tokenize("loads/reactor").unwrap();

        // then
        assert_eq!(tokens.metric, "loads");
        assert_eq!(tokens.segments, vec!["reactor"]);
    }

    #[rstest]
    #[case::root("/")]
    #[case::empty("")]
    #[case::leading_double_slash("//reactor/apps")]
    fn should_reject_missing_metric_name(#[case] path: &str) {
        // when
        let result = tokenize(path);

        // then
        assert!(matches!(result, Err(ParseError::MalformedPath(_))));
    }

    #[rstest]
    #[case::truncated("%2")]
    #[case::lone_percent("%")]
    #[case::non_hex("%zz")]
    #[case::trailing("reads%4")]
    fn should_reject_incomplete_escapes(#[case] raw: &str) {
        // when
        let result = decode_segment(raw);

        // then
        match result {
            Err(ParseError::BadEncoding { segment, .. }) => assert_eq!(segment, raw),
            other => panic!("expected BadEncoding, got {:?}", other),
        }
    }

    #[test]
    fn should_reject_escapes_decoding_to_invalid_utf8() {
        // when
        let result = decode_segment("%FF%FE");

        // then
        assert!(matches!(result, Err(ParseError::BadEncoding { .. })));
    }

    #[test]
    fn should_keep_plus_literal_in_path_segment() {
        assert_eq!(decode_segment("a+b").unwrap(), "a+b");
    }
}
