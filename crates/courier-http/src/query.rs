//! Query string merging for GET and DELETE requests.

use serde_json::Value;

use crate::error::{HttpError, Result};
use crate::payload::{map_pairs, Payload};

/// Merge a payload into the query string of `url`.
///
/// Existing parameters keep their order and come first; parameters from the
/// payload follow. Every existing parameter must be a single `key=value`
/// pair. Empty segments (`a=1&&b=2`, a trailing `&`, a bare `?`) are dropped.
pub fn merge_query(url: &str, payload: &Payload) -> Result<String> {
    let (base, query) = match url.split_once('?') {
        Some((base, query)) => (base, query),
        None => (url, ""),
    };

    let mut params = Vec::new();
    for param in query.split('&').filter(|p| !p.is_empty()) {
        if param.matches('=').count() != 1 {
            return Err(HttpError::MalformedQuery(param.to_string()));
        }
        params.push(param.to_string());
    }

    match payload {
        Payload::Empty | Payload::Value(Value::Null) => {}
        Payload::Value(Value::Object(map)) => params.extend(map_pairs(map)?),
        Payload::Text(fragment) | Payload::Value(Value::String(fragment)) => {
            if !fragment.is_empty() {
                params.push(fragment.clone());
            }
        }
        other => return Err(HttpError::UnsupportedType(other.kind())),
    }

    if params.is_empty() {
        Ok(base.to_string())
    } else {
        Ok(format!("{}?{}", base, params.join("&")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashSet;

    fn query_set(url: &str) -> HashSet<String> {
        url.split_once('?')
            .map(|(_, q)| q.split('&').map(str::to_string).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_empty_payload_keeps_url() {
        assert_eq!(
            merge_query("http://api.test/items", &Payload::Empty).unwrap(),
            "http://api.test/items"
        );
        assert_eq!(
            merge_query("http://api.test/items?a=1&b=2", &Payload::Empty).unwrap(),
            "http://api.test/items?a=1&b=2"
        );
        assert_eq!(
            merge_query("http://api.test/items?a=1", &Payload::Value(Value::Null)).unwrap(),
            "http://api.test/items?a=1"
        );
    }

    #[test]
    fn test_bare_question_mark_is_dropped() {
        assert_eq!(
            merge_query("http://api.test/items?", &Payload::Empty).unwrap(),
            "http://api.test/items"
        );
    }

    #[test]
    fn test_map_payload_without_existing_query() {
        let payload = Payload::from(json!({"q": "shoes", "page": 2}));
        let url = merge_query("http://api.test/items", &payload).unwrap();

        assert!(url.starts_with("http://api.test/items?"));
        let expected: HashSet<String> = ["q=shoes", "page=2"].iter().map(|s| s.to_string()).collect();
        assert_eq!(query_set(&url), expected);
        assert_eq!(url.matches('?').count(), 1);
    }

    #[test]
    fn test_map_payload_appends_after_existing_params() {
        let payload = Payload::from(json!({"page": 2}));
        let url = merge_query("http://api.test/items?q=shoes&sort=asc", &payload).unwrap();
        assert_eq!(url, "http://api.test/items?q=shoes&sort=asc&page=2");
    }

    #[test]
    fn test_map_payload_is_superset_of_existing() {
        let payload = Payload::from(json!({"x": "1", "y": [1, 2], "z": {"k": true}}));
        let url = merge_query("http://h/p?a=1&b=2", &payload).unwrap();
        let params = query_set(&url);

        assert!(params.contains("a=1"));
        assert!(params.contains("b=2"));
        assert!(params.contains("x=1"));
        assert!(params.contains("y=[1,2]"));
        assert!(params.contains(r#"z={"k":true}"#));
        assert_eq!(params.len(), 5);
    }

    #[test]
    fn test_text_fragment_is_appended() {
        let url = merge_query("http://h/p?a=1", &Payload::from("b=2&c=3")).unwrap();
        assert_eq!(url, "http://h/p?a=1&b=2&c=3");

        let url = merge_query("http://h/p?a=1", &Payload::from("")).unwrap();
        assert_eq!(url, "http://h/p?a=1");
    }

    #[test]
    fn test_string_value_is_appended_like_text() {
        let url = merge_query("http://h/p", &Payload::from(json!("a=1"))).unwrap();
        assert_eq!(url, "http://h/p?a=1");

        let url = merge_query("http://h/p?x=0", &Payload::json(&"b=2&c=3").unwrap()).unwrap();
        assert_eq!(url, "http://h/p?x=0&b=2&c=3");

        let url = merge_query("http://h/p", &Payload::from(json!(""))).unwrap();
        assert_eq!(url, "http://h/p");
    }

    #[test]
    fn test_malformed_param_is_rejected() {
        let err = merge_query("http://x?a", &Payload::Empty).unwrap_err();
        assert!(matches!(err, HttpError::MalformedQuery(ref p) if p == "a"));

        let err = merge_query("http://x?a=1&b=2=3", &Payload::Empty).unwrap_err();
        assert!(matches!(err, HttpError::MalformedQuery(ref p) if p == "b=2=3"));
    }

    #[test]
    fn test_empty_segments_are_dropped() {
        let url = merge_query("http://x?a=1&&b=2&", &Payload::Empty).unwrap();
        assert_eq!(url, "http://x?a=1&b=2");
    }

    #[test]
    fn test_unsupported_payloads() {
        for payload in [
            Payload::from(vec![1u8, 2, 3]),
            Payload::from(42i32),
            Payload::from(json!([1, 2])),
            Payload::from(json!(true)),
        ] {
            let err = merge_query("http://x", &payload).unwrap_err();
            assert!(matches!(err, HttpError::UnsupportedType(_)), "{:?}", err);
        }
    }
}
