use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use firmsearch_core::config::SearchSettings;
use firmsearch_core::error::{Error, Result};
use firmsearch_core::filters::{FilterSet, FilterValue, RangeBounds, ScalarValue};
use firmsearch_core::traits::Embedder;
use firmsearch_core::types::{MatchKind, RetrievalStrategy, SearchMode};
use firmsearch_core::{DegradeReason, Outcome};
use firmsearch_embed::FakeEmbedder;
use firmsearch_hybrid::{ComprehensiveSearchRequest, HybridClassifier, LexicalSearchRequest, SearchService};
use firmsearch_query::{Lexicon, QueryUnderstanding};
use firmsearch_text::{LexicalBackend, SelectRequest, SelectResponse, SuggestRequest, SuggestResponse};
use serde_json::{json, Value};

type Params = Vec<(String, String)>;

/// Answers every select with one canned body (or fails when there is none) and keeps the
/// parameters it was sent.
struct Recording {
    reply: Option<Value>,
    sent: Mutex<Vec<Params>>,
}

impl Recording {
    fn answering(reply: Value) -> Arc<Self> { Arc::new(Self { reply: Some(reply), sent: Mutex::new(Vec::new()) }) }

    fn down() -> Arc<Self> { Arc::new(Self { reply: None, sent: Mutex::new(Vec::new()) }) }

    fn last(&self) -> Params { self.sent.lock().expect("lock").last().cloned().expect("a select was sent") }
}

#[async_trait]
impl LexicalBackend for Recording {
    async fn select(&self, request: &SelectRequest) -> Result<SelectResponse> {
        self.sent.lock().expect("lock").push(request.to_params());
        match &self.reply {
            Some(body) => Ok(serde_json::from_value(body.clone())?),
            None => Err(Error::Transport("connection refused".into())),
        }
    }

    async fn suggest(&self, _request: &SuggestRequest) -> Result<SuggestResponse> {
        Err(Error::Transport("connection refused".into()))
    }
}

/// Embedder that always reports the same shortfall.
struct Unavailable(Outcome<Vec<f32>>);

#[async_trait]
impl Embedder for Unavailable {
    fn embedder_id(&self) -> &str { "unavailable" }

    async fn embed(&self, _text: &str) -> Outcome<Vec<f32>> { self.0.clone() }
}

fn one(params: &Params, key: &str) -> Option<String> {
    params.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
}

fn all(params: &Params, key: &str) -> Vec<String> {
    params.iter().filter(|(k, _)| k == key).map(|(_, v)| v.clone()).collect()
}

fn service(backend: Arc<Recording>, embedder: Arc<dyn Embedder>) -> SearchService<Arc<Recording>> {
    let understanding = Arc::new(QueryUnderstanding::new(Arc::new(Lexicon::builtin().expect("lexicon"))).expect("qu"));
    SearchService::new(backend, embedder, understanding, HybridClassifier::default(), SearchSettings::default())
}

fn fake() -> Arc<dyn Embedder> { Arc::new(FakeEmbedder::new(8)) }

fn acme_docs() -> Value {
    json!({
        "response": {"numFound": 2, "docs": [
            {"id": "1", "name": "Acme", "score": 1.0, "name_embedding_vector": [0.1, 0.2]},
            {"id": "2", "name": "Other", "score": 3.5, "industry_embedding_vector": [0.3]}
        ]}
    })
}

#[tokio::test]
async fn lexical_mode_uses_edismax_and_labels_everything_lexical() -> anyhow::Result<()> {
    let backend = Recording::answering(acme_docs());
    let page = service(backend.clone(), fake()).comprehensive_search(&ComprehensiveSearchRequest::new("acme")).await?;

    let sent = backend.last();
    assert_eq!(one(&sent, "defType").as_deref(), Some("edismax"));
    assert_eq!(one(&sent, "qf").as_deref(), Some("industry name locality"));
    assert_eq!(one(&sent, "q").as_deref(), Some("acme"));
    assert!(all(&sent, "bq").is_empty());

    assert_eq!(page.total_results, 2);
    assert!(page.documents.iter().all(|d| d.search_type == Some(MatchKind::Lexical)));
    assert!(page.documents.iter().all(|d| !d.fields.keys().any(|k| k.ends_with("_embedding_vector"))));
    assert_eq!(page.search_metadata.search_type, SearchMode::Lexical);
    assert_eq!(page.search_metadata.effective_mode, RetrievalStrategy::Lexical);
    assert_eq!(page.search_metadata.lexical_results_count, 2);
    assert_eq!(page.search_metadata.degradation, None);
    assert_eq!(page.query_info.sort, "relevance");
    assert_eq!(page.pagination.total_pages, 1);
    Ok(())
}

#[tokio::test]
async fn missing_query_matches_everything_in_every_mode() -> anyhow::Result<()> {
    for mode in [SearchMode::Lexical, SearchMode::Semantic, SearchMode::Hybrid] {
        let backend = Recording::answering(acme_docs());
        let request = ComprehensiveSearchRequest { query: Some("   ".into()), ..Default::default() }.with_mode(mode);
        let page = service(backend.clone(), fake()).comprehensive_search(&request).await?;

        assert_eq!(one(&backend.last(), "q").as_deref(), Some("*:*"), "mode {mode}");
        assert_eq!(page.query_info.query, None);
    }
    Ok(())
}

#[tokio::test]
async fn location_only_query_matches_everything_inside_the_location() -> anyhow::Result<()> {
    for mode in [SearchMode::Lexical, SearchMode::Semantic, SearchMode::Hybrid] {
        let backend = Recording::answering(acme_docs());
        let request = ComprehensiveSearchRequest::new("california").with_mode(mode);
        let page = service(backend.clone(), fake()).comprehensive_search(&request).await?;

        let sent = backend.last();
        assert_eq!(one(&sent, "q").as_deref(), Some("*:*"), "mode {mode}");
        assert!(all(&sent, "bq").is_empty(), "mode {mode}");
        assert!(all(&sent, "fq").iter().any(|f| f.starts_with("locality:(")), "mode {mode}");
        assert_eq!(page.search_metadata.degradation, None, "mode {mode}");
        assert_eq!(page.query_info.query, None);
    }
    Ok(())
}

#[tokio::test]
async fn detected_entities_become_filters_and_rewrite_the_query() -> anyhow::Result<()> {
    let backend = Recording::answering(acme_docs());
    let page = service(backend.clone(), fake())
        .comprehensive_search(&ComprehensiveSearchRequest::new("tech companies in california"))
        .await?;

    let sent = backend.last();
    assert_eq!(one(&sent, "q").as_deref(), Some("technology"));
    let fq = all(&sent, "fq");
    let industry = fq.iter().find(|f| f.starts_with("industry:(")).expect("industry clause");
    let locality = fq.iter().find(|f| f.starts_with("locality:(")).expect("locality clause");
    assert!(industry.contains("\"Software Development\""));
    assert!(locality.contains("California"));
    assert!(locality.contains("\"San Francisco\""));

    assert_eq!(page.query_info.query.as_deref(), Some("technology"));
    assert!(page.query_info.filters.contains("industry"));
    assert!(page.query_info.filters.contains("location"));
    Ok(())
}

#[tokio::test]
async fn caller_filters_are_mapped_to_engine_fields() -> anyhow::Result<()> {
    let backend = Recording::answering(acme_docs());
    let filters = FilterSet::new()
        .with("country", FilterValue::Scalar("Australia".into()))
        .with("employees", FilterValue::Range(RangeBounds { from: Some(ScalarValue::Integer(100)), to: None }))
        .with("industry", FilterValue::any_of(Vec::<String>::new()));
    let request = ComprehensiveSearchRequest { filters, ..ComprehensiveSearchRequest::new("acme") };
    service(backend.clone(), fake()).comprehensive_search(&request).await?;

    let fq = all(&backend.last(), "fq");
    assert!(fq.contains(&"country_s:Australia".to_string()), "{fq:?}");
    assert!(fq.contains(&"current_employee_estimate_l:[100 TO *]".to_string()), "{fq:?}");
    assert_eq!(fq.len(), 2, "empty lists produce no clause");
    Ok(())
}

#[tokio::test]
async fn semantic_mode_queries_the_vector_field() -> anyhow::Result<()> {
    let backend = Recording::answering(acme_docs());
    let request = ComprehensiveSearchRequest { page: 1, ..ComprehensiveSearchRequest::new("acme") }
        .with_mode(SearchMode::Semantic);
    let page = service(backend.clone(), fake()).comprehensive_search(&request).await?;

    let sent = backend.last();
    let q = one(&sent, "q").expect("q");
    assert!(q.starts_with("{!knn f=name_embedding_vector topK=20}["), "{q}");
    assert_eq!(one(&sent, "start").as_deref(), Some("10"));
    assert_eq!(one(&sent, "defType"), None);

    assert!(page.documents.iter().all(|d| d.search_type == Some(MatchKind::Semantic)));
    assert_eq!(page.search_metadata.semantic_results_count, 2);
    assert_eq!(page.search_metadata.effective_mode, RetrievalStrategy::Vector);
    Ok(())
}

#[tokio::test]
async fn semantic_mode_degrades_to_boosted_lexical() -> anyhow::Result<()> {
    let backend = Recording::answering(acme_docs());
    let embedder = Arc::new(Unavailable(Outcome::Degraded(DegradeReason::Timeout)));
    let request = ComprehensiveSearchRequest::new("acme").with_mode(SearchMode::Semantic);
    let page = service(backend.clone(), embedder).comprehensive_search(&request).await?;

    let sent = backend.last();
    assert_eq!(one(&sent, "q").as_deref(), Some("acme"));
    assert_eq!(one(&sent, "qf").as_deref(), Some("name^3.0 industry^2.0 locality^1.0"));
    assert_eq!(one(&sent, "pf").as_deref(), Some("name^4.0 industry^3.0"));
    assert_eq!(one(&sent, "mm").as_deref(), Some("1"));
    assert_eq!(all(&sent, "bq"), vec!["name:\"acme\"^5.0".to_string(), "industry:(acme)^2.0".to_string()]);

    assert_eq!(page.search_metadata.effective_mode, RetrievalStrategy::BoostedLexical);
    assert_eq!(page.search_metadata.degradation, Some(DegradeReason::Timeout));
    assert!(page.documents.iter().all(|d| d.search_type == Some(MatchKind::Semantic)));
    Ok(())
}

#[tokio::test]
async fn hybrid_mode_boosts_with_the_vector_and_splits_labels() -> anyhow::Result<()> {
    let backend = Recording::answering(acme_docs());
    let request = ComprehensiveSearchRequest::new("acme").with_mode(SearchMode::Hybrid);
    let page = service(backend.clone(), fake()).comprehensive_search(&request).await?;

    let sent = backend.last();
    let bq = all(&sent, "bq");
    assert_eq!(bq.len(), 1);
    assert!(bq[0].starts_with("{!knn f=name_embedding_vector topK=10}["));
    assert!(bq[0].ends_with("]^2.0"));
    assert_eq!(one(&sent, "qf").as_deref(), Some("name^3.0 industry^2.0 locality^1.0"));
    assert_eq!(one(&sent, "mm"), None);

    assert_eq!(page.documents[0].search_type, Some(MatchKind::Lexical));
    assert_eq!(page.documents[1].search_type, Some(MatchKind::Semantic));
    assert_eq!(page.search_metadata.lexical_results_count, 1);
    assert_eq!(page.search_metadata.semantic_results_count, 1);
    assert_eq!(page.search_metadata.total_results_count, 2);
    assert_eq!(page.search_metadata.effective_mode, RetrievalStrategy::VectorBoostedLexical);
    Ok(())
}

#[tokio::test]
async fn hybrid_mode_without_embedding_drops_the_vector_clause() -> anyhow::Result<()> {
    let backend = Recording::answering(acme_docs());
    let request = ComprehensiveSearchRequest::new("acme").with_mode(SearchMode::Hybrid);
    let page = service(backend.clone(), Arc::new(Unavailable(Outcome::Empty))).comprehensive_search(&request).await?;

    assert!(all(&backend.last(), "bq").is_empty());
    assert_eq!(page.search_metadata.degradation, Some(DegradeReason::NoEmbedding));
    assert_eq!(page.search_metadata.effective_mode, RetrievalStrategy::BoostedLexical);
    Ok(())
}

#[tokio::test]
async fn engine_failure_yields_an_empty_degraded_page() -> anyhow::Result<()> {
    let page = service(Recording::down(), fake()).comprehensive_search(&ComprehensiveSearchRequest::new("acme")).await?;

    assert!(page.documents.is_empty());
    assert_eq!(page.total_results, 0);
    assert!(!page.pagination.has_next);
    assert!(matches!(page.search_metadata.degradation, Some(DegradeReason::Unreachable(_))));
    Ok(())
}

#[tokio::test]
async fn zero_page_size_is_rejected() {
    let request = ComprehensiveSearchRequest { page_size: 0, ..ComprehensiveSearchRequest::new("acme") };
    let result = service(Recording::answering(acme_docs()), fake()).comprehensive_search(&request).await;
    assert!(matches!(result, Err(Error::InvalidRequest(_))));
}

#[tokio::test]
async fn huge_page_numbers_saturate() -> anyhow::Result<()> {
    for mode in [SearchMode::Lexical, SearchMode::Semantic, SearchMode::Hybrid] {
        let backend = Recording::answering(acme_docs());
        let request = ComprehensiveSearchRequest { page: usize::MAX, ..ComprehensiveSearchRequest::new("acme") }.with_mode(mode);
        let page = service(backend.clone(), fake()).comprehensive_search(&request).await?;

        assert!(!page.pagination.has_next, "mode {mode}");
        assert!(page.pagination.has_previous, "mode {mode}");
    }

    let request = LexicalSearchRequest { page: usize::MAX, ..LexicalSearchRequest::default() };
    let page = service(Recording::answering(acme_docs()), fake()).search(&request).await?;
    assert_eq!(page.pagination.current_page, usize::MAX);
    assert!(!page.pagination.has_next);
    Ok(())
}

#[tokio::test]
async fn unknown_mode_name_searches_lexically() -> anyhow::Result<()> {
    let backend = Recording::answering(acme_docs());
    let request = ComprehensiveSearchRequest { search_type: Some("fuzzy".into()), ..ComprehensiveSearchRequest::new("acme") };
    let page = service(backend.clone(), fake()).comprehensive_search(&request).await?;

    assert_eq!(one(&backend.last(), "qf").as_deref(), Some("industry name locality"));
    assert_eq!(page.search_metadata.search_type, SearchMode::Lexical);
    Ok(())
}

#[tokio::test]
async fn sort_projection_and_facets_are_forwarded() -> anyhow::Result<()> {
    let backend = Recording::answering(json!({
        "response": {"numFound": 25, "docs": [{"id": "1", "name": "Acme"}]},
        "facet_counts": {"facet_fields": {"industry": ["Software", 3, "Retail", 1]}}
    }));
    let request = ComprehensiveSearchRequest {
        sort_field: Some("name_s".into()),
        sort_direction: Some("DESC".into()),
        facet_fields: vec!["industry".into(), "locality".into()],
        return_fields: vec!["id".into(), "name".into()],
        page_size: 10,
        page: 1,
        ..ComprehensiveSearchRequest::new("acme")
    };
    let page = service(backend.clone(), fake()).comprehensive_search(&request).await?;

    let sent = backend.last();
    assert_eq!(one(&sent, "sort").as_deref(), Some("name_s desc"));
    assert_eq!(one(&sent, "fl").as_deref(), Some("id,name"));
    assert_eq!(one(&sent, "facet.limit").as_deref(), Some("100"));
    assert_eq!(one(&sent, "facet.mincount").as_deref(), Some("1"));
    assert_eq!(all(&sent, "facet.field"), vec!["industry".to_string(), "locality".to_string()]);

    assert_eq!(page.facets["industry"]["Software"], 3);
    assert!(page.facets["locality"].is_empty());
    assert_eq!(page.query_info.sort, "name_s desc");
    assert_eq!(page.pagination.total_pages, 3);
    assert!(page.pagination.has_next);
    assert!(page.pagination.has_previous);
    Ok(())
}

#[tokio::test]
async fn convenience_search_builds_structured_filters() -> anyhow::Result<()> {
    let backend = Recording::answering(json!({
        "response": {"numFound": 1, "docs": [{"id": "1", "name": "Acme", "score": 4.0}]},
        "facet_counts": {
            "facet_fields": {"totalemployeeestimate_l": []},
            "facet_queries": {
                "totalemployeeestimate_l:[10001 TO *]": 4,
                "totalemployeeestimate_l:[1000 TO 10000]": 9,
                "totalemployeeestimate_l:[* TO 999]": 20
            }
        }
    }));
    let request = LexicalSearchRequest {
        query: Some("acme".into()),
        industry: vec!["Software".into()],
        size: vec!["Large".into(), "Small".into(), "Huge".into()],
        country: Some("Australia".into()),
        founding_year_from: Some(1990),
        tags: vec!["b2b".into()],
        sort: Some("name".into()),
        facet_fields: vec!["totalemployeeestimate_l".into()],
        facet_limit: Some(5),
        ..LexicalSearchRequest::default()
    };
    let page = service(backend.clone(), fake()).search(&request).await?;

    let sent = backend.last();
    assert_eq!(one(&sent, "qf").as_deref(), Some("industry name locality"));
    assert_eq!(
        all(&sent, "fq"),
        vec![
            "industry:(Software)".to_string(),
            "employees_count:[10001 TO *] OR employees_count:[* TO 999]".to_string(),
            "country:Australia".to_string(),
            "foundingYear:[1990 TO *]".to_string(),
            "tags:(b2b)".to_string(),
        ]
    );
    assert_eq!(one(&sent, "sort").as_deref(), Some("name_sort asc"));
    assert_eq!(one(&sent, "facet.limit").as_deref(), Some("5"));
    assert_eq!(all(&sent, "facet.query").len(), 3);

    let sizes = page.employee_size_facets.expect("size facets requested");
    assert_eq!(sizes["Large"], 4);
    assert_eq!(sizes["Medium"], 9);
    assert_eq!(sizes["Small"], 20);
    assert!(page.documents.iter().all(|d| d.search_type == Some(MatchKind::Lexical)));
    assert_eq!(page.query_info.sort, "name_sort asc");
    Ok(())
}

#[tokio::test]
async fn convenience_search_without_query_matches_all() -> anyhow::Result<()> {
    let backend = Recording::answering(acme_docs());
    let page = service(backend.clone(), fake()).search(&LexicalSearchRequest::default()).await?;

    let sent = backend.last();
    assert_eq!(one(&sent, "q").as_deref(), Some("*:*"));
    assert!(all(&sent, "fq").is_empty());
    assert_eq!(one(&sent, "sort"), None);
    assert_eq!(page.employee_size_facets, None);
    Ok(())
}
