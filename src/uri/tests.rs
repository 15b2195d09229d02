//! Tests for URI parsing and query parameters.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;
    use serde::{Deserialize, Serialize};

    use crate::config::QueryConfig;
    use crate::scanner::Error as ScanError;
    use crate::uri::{Error, Scheme, Uri};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn pairs(uri: &Uri) -> Vec<(String, String)> {
        uri.query_parameters()
            .into_iter()
            .collect()
    }

    #[rstest]
    #[case("http://example.com:8080/a/b?x=1&y=2", Some("http"), Some("example.com"), Some(8080), "/a/b", Some("x=1&y=2"))]
    #[case("/just/a/path", None, None, None, "/just/a/path", None)]
    #[case("http://host", Some("http"), Some("host"), None, "/", None)]
    #[case("https://host/", Some("https"), Some("host"), None, "/", None)]
    #[case("https://host?q=1", Some("https"), Some("host"), None, "/", Some("q=1"))]
    #[case("http://", Some("http"), None, None, "/", None)]
    #[case("http:///path", Some("http"), None, None, "/path", None)]
    #[case("ws://localhost:9000", Some("ws"), Some("localhost"), Some(9000), "/", None)]
    #[case("/search?q=rust#top", None, None, None, "/search", Some("q=rust"))]
    #[case("relative/path", None, None, None, "relative/path", None)]
    #[case("", None, None, None, "/", None)]
    fn test_uri_components(
        #[case] input: &str,
        #[case] scheme: Option<&str>,
        #[case] host: Option<&str>,
        #[case] port: Option<u16>,
        #[case] path: &str,
        #[case] query: Option<&str>,
    ) {
        init_logger();
        let uri = Uri::new(input);
        assert_eq!(uri.scheme().as_ref().map(Scheme::as_str), scheme);
        assert_eq!(uri.host().as_deref(), host);
        assert_eq!(uri.port(), port);
        assert_eq!(uri.path(), path);
        assert_eq!(uri.query().as_deref(), query);
    }

    #[test]
    fn test_query_parameters_in_order() {
        let uri = Uri::new("http://example.com:8080/a/b?x=1&y=2");
        assert_eq!(
            pairs(&uri),
            vec![("x".to_string(), "1".to_string()), ("y".to_string(), "2".to_string())]
        );
    }

    #[test]
    fn test_query_without_path() {
        let uri = Uri::new("?a=&b");
        assert_eq!(uri.path(), "/");
        assert_eq!(
            pairs(&uri),
            vec![("a".to_string(), String::new()), ("b".to_string(), String::new())]
        );
    }

    #[test]
    fn test_encoded_equals_is_not_a_delimiter() {
        let uri = Uri::new("/?a%3Db=c");
        let params = uri.query_parameters();
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["a%3Db"]);
        assert_eq!(params.get("a%3Db").map(String::as_str), Some("c"));
        assert!(!params.contains_key("a"));

        let decoded = uri.query_parameters_with(&QueryConfig {
            decode_keys: true,
            ..QueryConfig::default()
        });
        assert_eq!(decoded.get("a=b").map(String::as_str), Some("c"));
        assert!(!decoded.contains_key("a"));
    }

    #[test]
    fn test_keys_are_raw_values_are_decoded() {
        let uri = Uri::new("/p?caf%C3%A9=caf%C3%A9");
        let params = uri.query_parameters();
        assert_eq!(params["caf%C3%A9"], "café");

        let form = uri.query_parameters_with(&QueryConfig::form());
        assert_eq!(form["café"], "café");
    }

    #[test]
    fn test_query_value_decoding() {
        let uri = Uri::new("/p?name=J%C3%BCrgen&expr=1%2B1%3D2&plus=a+b");
        let params = uri.query_parameters();
        assert_eq!(params["name"], "Jürgen");
        assert_eq!(params["expr"], "1+1=2");
        assert_eq!(params["plus"], "a+b");

        let form = uri.query_parameters_with(&QueryConfig::form());
        assert_eq!(form["plus"], "a b");
        assert_eq!(form["expr"], "1+1=2");
    }

    #[test]
    fn test_invalid_escape_falls_back_to_raw() {
        init_logger();
        let uri = Uri::new("/p?discount=100%&ok=%41");
        let params = uri.query_parameters();
        assert_eq!(params["discount"], "100%");
        assert_eq!(params["ok"], "A");
    }

    #[test]
    fn test_value_keeps_later_equals() {
        let uri = Uri::new("/p?token=abc==&empty=");
        let params = uri.query_parameters();
        assert_eq!(params["token"], "abc==");
        assert_eq!(params["empty"], "");
    }

    #[test]
    fn test_repeated_keys() {
        let uri = Uri::new("/p?tag=a&tag=b&other=1&tag=c");
        let params = uri.query_parameters();
        assert_eq!(params["tag"], "a");
        assert_eq!(params.get_all("tag"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_custom_separator() {
        let uri = Uri::new("/p?a=1;b=2");
        let params = uri.query_parameters_with(&QueryConfig {
            separator: ';',
            ..QueryConfig::default()
        });
        assert_eq!(params["a"], "1");
        assert_eq!(params["b"], "2");
    }

    #[test]
    fn test_no_query_means_no_parameters() {
        let uri = Uri::new("http://example.com/path");
        assert!(uri.query().is_none());
        assert!(uri.query_parameters().is_empty());
    }

    #[test]
    fn test_invalid_port_is_none() {
        assert_eq!(Uri::new("http://host:http/").port(), None);
        assert_eq!(Uri::new("http://host:99999/").port(), None);
        assert_eq!(Uri::new("http://host:99999/").port_view().unwrap(), "99999");
        assert_eq!(Uri::new("http://host:/").port(), None);
        assert_eq!(Uri::new("http://host:/").path(), "/");
    }

    #[test]
    fn test_unicode_components() {
        let uri = Uri::new("http://bücher.example/straße?q=größe");
        assert_eq!(uri.host().as_deref(), Some("bücher.example"));
        assert_eq!(uri.path(), "/straße");
        assert_eq!(uri.query_parameters()["q"], "größe");
    }

    #[test]
    fn test_component_views_share_input() {
        let uri = Uri::new("http://example.com:8080/a/b?x=1");
        let host = uri.host_view().unwrap();
        assert_eq!(host.bounds(), 7..18);
        assert_eq!(host, "example.com");
        assert_eq!(uri.port_view().unwrap(), "8080");
        assert_eq!(uri.path_view().unwrap(), "/a/b");
        assert_eq!(uri.scheme_view().unwrap(), "http");
        assert_eq!(uri.query_view().unwrap(), "x=1");
        assert_eq!(
            host.buffer().as_bytes().as_ptr(),
            uri.as_bytes().as_ptr()
        );
    }

    #[test]
    fn test_scheme_constants() {
        assert_eq!(Uri::new("https://a").scheme(), Some(Scheme::HTTPS));
        assert_eq!(Uri::new("wss://a").scheme(), Some(Scheme::WSS));
        assert_eq!(Uri::new("http_unix://a").scheme(), Some(Scheme::HTTP_UNIX));
        assert_eq!(Scheme::from("custom").to_string(), "custom");
        assert_ne!(Uri::new("HTTP://a").scheme(), Some(Scheme::HTTP));
    }

    #[test]
    fn test_display_and_from_str() {
        let input = "https://example.com/a?b=c";
        let uri: Uri = input.parse().unwrap();
        assert_eq!(uri.to_string(), input);
        assert_eq!(uri, Uri::from(input.to_string()));
    }

    #[test]
    fn test_from_bytes() {
        let uri = Uri::from_bytes(b"/caf\xC3\xA9?x=1".to_vec()).unwrap();
        assert_eq!(uri.path(), "/café");

        let err = Uri::from_bytes(vec![b'/', 0xC3]).unwrap_err();
        assert_eq!(err, ScanError::InvalidUtf8 { offset: 1 });
    }

    #[test]
    fn test_serde_string_form() {
        #[derive(Serialize, Deserialize)]
        struct Link {
            href: Uri,
        }

        let link: Link = serde_json::from_str(r#"{"href":"http://example.com/x?y=1"}"#).unwrap();
        assert_eq!(link.href.host().as_deref(), Some("example.com"));
        assert_eq!(
            serde_json::to_string(&link).unwrap(),
            r#"{"href":"http://example.com/x?y=1"}"#
        );
    }

    #[test]
    fn test_query_as_struct() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Filter {
            name: String,
            tags: Vec<String>,
            page: Option<String>,
        }

        let uri = Uri::new("/items?name=hello%20world&tags=a&tags=b");
        let filter: Filter = uri.query_as().unwrap();
        assert_eq!(
            filter,
            Filter {
                name: "hello world".to_string(),
                tags: vec!["a".to_string(), "b".to_string()],
                page: None,
            }
        );
    }

    #[test]
    fn test_query_as_single_value_is_a_sequence() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Tags {
            tags: Vec<String>,
        }

        let uri = Uri::new("/items?tags=a");
        let tags: Tags = uri.query_as().unwrap();
        assert_eq!(tags.tags, vec!["a".to_string()]);
    }

    #[test]
    fn test_query_as_parses_scalars() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Page {
            page: u32,
            ratio: f64,
            dense: bool,
            initial: char,
            limit: Option<u16>,
            ids: Vec<u64>,
        }

        let uri = Uri::new("/items?page=2&ratio=0.5&dense=true&initial=x&limit=50&ids=7&ids=9");
        let page: Page = uri.query_as().unwrap();
        assert_eq!(
            page,
            Page {
                page: 2,
                ratio: 0.5,
                dense: true,
                initial: 'x',
                limit: Some(50),
                ids: vec![7, 9],
            }
        );
    }

    #[test]
    fn test_query_as_repeated_key_into_scalar_takes_first() {
        #[derive(Debug, Deserialize)]
        struct Page {
            page: u32,
        }

        let page: Page = Uri::new("/items?page=3&page=4").query_as().unwrap();
        assert_eq!(page.page, 3);
    }

    #[test]
    fn test_query_as_enum_and_map() {
        #[derive(Debug, Deserialize, PartialEq)]
        #[serde(rename_all = "lowercase")]
        enum Order {
            Asc,
            Desc,
        }

        #[derive(Debug, Deserialize)]
        struct Sort {
            order: Order,
        }

        let sort: Sort = Uri::new("/items?order=desc").query_as().unwrap();
        assert_eq!(sort.order, Order::Desc);

        let all: std::collections::BTreeMap<String, String> =
            Uri::new("/items?a=1&b=2").query_as().unwrap();
        assert_eq!(all.get("b").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_query_as_rejects_unparsable_scalar() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Page {
            page: u32,
        }

        let err = Uri::new("/items?page=two").query_as::<Page>().unwrap_err();
        assert!(matches!(err, Error::QueryDecode(_)));
        assert!(err.to_string().contains("two"));
    }

    #[test]
    fn test_query_as_mismatch() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Required {
            id: String,
        }

        let uri = Uri::new("/items?name=x");
        let result: Result<Required, Error> = uri.query_as();
        assert!(matches!(result, Err(Error::QueryDecode(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_views_are_shared_across_threads() {
        let uri = Arc::new(Uri::new("http://example.com:8080/a/b?x=1&y=2"));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let uri = Arc::clone(&uri);
            handles.push(tokio::spawn(async move {
                let params = uri.query_parameters();
                (uri.host(), uri.port(), params.get("y").cloned())
            }));
        }
        for handle in handles {
            let (host, port, y) = handle.await.unwrap();
            assert_eq!(host.as_deref(), Some("example.com"));
            assert_eq!(port, Some(8080));
            assert_eq!(y.as_deref(), Some("2"));
        }
    }

    #[tokio::test]
    async fn test_host_view_outlives_uri() {
        let host = {
            let uri = Uri::new("http://example.com/");
            uri.host_view().cloned()
        };
        let host = tokio::task::spawn_blocking(move || host.map(|h| h.materialize()))
            .await
            .unwrap();
        assert_eq!(host.as_deref(), Some("example.com"));
    }
}
