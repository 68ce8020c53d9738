use firmsearch_core::config::LexicalSettings;
use firmsearch_core::error::Error;
use firmsearch_core::retry::RetryPolicy;
use firmsearch_text::{LexicalBackend, QueryExpr, QueryParser, SelectRequest, SolrClient, SuggestRequest};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, timeout_ms: u64) -> SolrClient {
    let settings = LexicalSettings {
        base_url: format!("{}/solr/company/", server.uri()),
        timeout_ms,
        ..LexicalSettings::default()
    };
    SolrClient::new(&settings, RetryPolicy { max_retries: 1, backoff_ms: 1 }).expect("client")
}

#[tokio::test]
async fn select_parses_docs_and_facets() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/solr/company/select"))
        .and(query_param("q", "acme"))
        .and(query_param("defType", "edismax"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"numFound": 42, "docs": [{"id": "1", "name": "Acme", "score": 2.5}]},
            "facet_counts": {"facet_fields": {"industry": ["Software", 12, "Retail", 3]}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = SelectRequest::new(QueryExpr::text(Some("acme"))).parser(QueryParser::edismax(&["name"]));
    let response = client(&server, 1_000).select(&request).await?;

    assert_eq!(response.response.num_found, 42);
    assert_eq!(response.response.docs.len(), 1);
    assert_eq!(
        response.facet_counts.pairs("industry"),
        vec![("Software".to_string(), 12), ("Retail".to_string(), 3)]
    );
    Ok(())
}

#[tokio::test]
async fn missing_response_section_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/solr/company/select"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"responseHeader": {"status": 0}})))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, 1_000).select(&SelectRequest::new(QueryExpr::MatchAll)).await;
    assert!(matches!(result, Err(Error::Malformed(_))), "got {result:?}");
}

#[tokio::test]
async fn server_error_is_reported_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, 1_000).select(&SelectRequest::new(QueryExpr::MatchAll)).await;
    assert!(matches!(result, Err(Error::UpstreamStatus(500))), "got {result:?}");
}

#[tokio::test]
async fn slow_engine_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": {"numFound": 0, "docs": []}}))
                .set_delay(std::time::Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let result = client(&server, 50).select(&SelectRequest::new(QueryExpr::MatchAll)).await;
    assert!(matches!(result, Err(Error::Timeout(_))), "got {result:?}");
}

#[tokio::test]
async fn suggest_reads_terms_for_query() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/solr/company/suggest"))
        .and(query_param("suggest.q", "acm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "suggest": {"companySuggester": {"acm": {"numFound": 2, "suggestions": [
                {"term": "Acme Corp", "weight": 10, "payload": ""},
                {"term": "Acme Labs", "weight": 4, "payload": ""}
            ]}}}
        })))
        .mount(&server)
        .await;

    let request = SuggestRequest { dictionary: "companySuggester".into(), query: "acm".into(), count: 5 };
    let response = client(&server, 1_000).suggest(&request).await?;
    let terms: Vec<&str> = response.terms("companySuggester", "acm").iter().map(|t| t.term.as_str()).collect();
    assert_eq!(terms, vec!["Acme Corp", "Acme Labs"]);
    assert!(response.terms("otherSuggester", "acm").is_empty());
    Ok(())
}
