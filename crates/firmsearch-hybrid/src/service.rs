use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use firmsearch_core::config::{SearchSettings, Settings};
use firmsearch_core::error::{Error, Result};
use firmsearch_core::traits::Embedder;
use firmsearch_core::types::{
    Facets, MatchKind, PaginationInfo, ParsedQuery, QueryInfo, ResultPage, RetrievalStrategy, RetrievedDocument,
    SearchMetadata, SearchMode,
};
use firmsearch_core::{DegradeReason, Outcome};
use firmsearch_embed::get_default_embedder;
use firmsearch_query::{filters, Lexicon, QueryUnderstanding};
use firmsearch_text::{FacetRequest, FilterClause, LexicalBackend, QueryExpr, QueryParser, SelectRequest, SelectResponse};
use tracing::{debug, info, warn};

use crate::classifier::{FallbackPolicy, HybridClassifier};
use crate::requests::{CompanySize, ComprehensiveSearchRequest, LexicalSort, LexicalSearchRequest};

pub const LEXICAL_FIELDS: &[&str] = &["industry", "name", "locality"];
pub const VECTOR_FIELD_SUFFIX: &str = "_embedding_vector";
pub const EMPLOYEE_ESTIMATE_FIELD: &str = "totalemployeeestimate_l";
const WEIGHTED_QF: &[(&str, f32)] = &[("name", 3.0), ("industry", 2.0), ("locality", 1.0)];
const WEIGHTED_PF: &[(&str, f32)] = &[("name", 4.0), ("industry", 3.0)];

/// Caller-facing filter names to engine field names.
pub fn engine_field(field: &str) -> String {
    match field.to_lowercase().as_str() {
        "industry" => "industry".to_string(),
        "location" => "locality".to_string(),
        "country" => "country_s".to_string(),
        "size" => "size_range_s".to_string(),
        "employees" => "current_employee_estimate_l".to_string(),
        "founded" => "year_founded_d".to_string(),
        _ => field.to_string(),
    }
}

/// How one comprehensive request will be put to the engine.
struct Plan {
    request: SelectRequest,
    strategy: RetrievalStrategy,
    degradation: Option<DegradeReason>,
}

impl Plan {
    fn new(request: SelectRequest, strategy: RetrievalStrategy) -> Self { Self { request, strategy, degradation: None } }

    fn degraded(mut self, reason: Option<DegradeReason>) -> Self {
        self.degradation = reason;
        self
    }
}

/// Query understanding, mode dispatch and result labelling over one lexical backend.
pub struct SearchService<B: LexicalBackend> {
    backend: B,
    embedder: Arc<dyn Embedder>,
    understanding: Arc<QueryUnderstanding>,
    classifier: HybridClassifier,
    settings: SearchSettings,
}

impl<B: LexicalBackend> SearchService<B> {
    pub fn new(
        backend: B,
        embedder: Arc<dyn Embedder>,
        understanding: Arc<QueryUnderstanding>,
        classifier: HybridClassifier,
        settings: SearchSettings,
    ) -> Self {
        Self { backend, embedder, understanding, classifier, settings }
    }

    /// Wire the configured embedder and the built-in vocabulary around `backend`.
    pub fn from_settings(backend: B, settings: &Settings) -> Result<Self> {
        let embedder = get_default_embedder(&settings.embedding, settings.retry)?;
        let understanding = Arc::new(QueryUnderstanding::new(Arc::new(Lexicon::builtin()?))?);
        let classifier = HybridClassifier::new(FallbackPolicy::from_settings(&settings.classifier));
        Ok(Self::new(backend, embedder, understanding, classifier, settings.search.clone()))
    }

    pub fn understanding(&self) -> &Arc<QueryUnderstanding> { &self.understanding }

    pub fn parse_query(&self, query: &str) -> ParsedQuery { self.understanding.parse(query) }

    /// Lexical search with fixed filter fields and optional employee-size aggregates.
    pub async fn search(&self, request: &LexicalSearchRequest) -> Result<ResultPage> {
        let started = Instant::now();
        if request.page_size == 0 {
            return Err(Error::InvalidRequest("page_size must be positive".into()));
        }

        let mut select = SelectRequest::new(QueryExpr::text(request.query.as_deref()))
            .parser(QueryParser::edismax(LEXICAL_FIELDS))
            .page(request.page, request.page_size);
        for clause in request.clauses() {
            select = select.filter(clause);
        }
        if let Some(sort) = request.sort.as_deref() {
            select = select.sort(LexicalSort::from_name(sort).spec());
        }

        let size_facets: Vec<(CompanySize, FilterClause)> =
            if request.facet_fields.iter().any(|f| f == EMPLOYEE_ESTIMATE_FIELD) {
                CompanySize::ALL.into_iter().map(|s| (s, s.clause(EMPLOYEE_ESTIMATE_FIELD))).collect()
            } else {
                Vec::new()
            };
        if !request.facet_fields.is_empty() {
            let mut facets = FacetRequest::fields(request.facet_fields.iter().map(String::as_str));
            if let Some(limit) = request.facet_limit {
                facets = facets.limit(limit);
            }
            for (_, clause) in &size_facets {
                facets = facets.query(clause.clone());
            }
            select = select.facets(facets);
        }

        let sort = select.sort.as_ref().map_or_else(|| "relevance".to_string(), |s| s.to_wire());
        let mut metadata = SearchMetadata::new(SearchMode::Lexical, RetrievalStrategy::Lexical);
        let mut page = match self.backend.select(&select).await {
            Ok(response) => {
                let employee_size_facets = (!size_facets.is_empty()).then(|| {
                    size_facets
                        .iter()
                        .map(|(size, clause)| {
                            (size.label().to_string(), response.facet_counts.query_count(&clause.to_wire()))
                        })
                        .collect::<BTreeMap<_, _>>()
                });
                let mut page = page_from(response, &request.facet_fields, request.page, request.page_size);
                page.employee_size_facets = employee_size_facets;
                page
            }
            Err(e) => {
                warn!("Lexical search failed: {}", e);
                metadata.degradation = Some(DegradeReason::from(&e));
                empty_page(request.page, request.page_size)
            }
        };

        for doc in &mut page.documents {
            doc.search_type = Some(MatchKind::Lexical);
        }
        metadata.count(&page.documents);
        page.search_metadata = metadata;
        page.query_info = QueryInfo {
            query: request.query.clone(),
            filters: request.filter_set(),
            sort,
            execution_time_ms: elapsed_ms(started),
        };
        Ok(page)
    }

    /// Full pipeline: understand the query, merge filters, retrieve in the requested mode and
    /// label every document.
    ///
    /// Backend trouble never fails the call; it shows up in `search_metadata.degradation`.
    pub async fn comprehensive_search(&self, request: &ComprehensiveSearchRequest) -> Result<ResultPage> {
        let started = Instant::now();
        if request.page_size == 0 {
            return Err(Error::InvalidRequest("page_size must be positive".into()));
        }
        let mode = request.mode();
        let original = request.query.as_deref().map(str::trim).filter(|q| !q.is_empty());

        let (effective, merged) = match original {
            Some(query) => {
                let parsed = self.understanding.parse(query);
                let inferred = self.understanding.build_filters(&parsed);
                let merged = filters::merge(&request.filters, &inferred);
                let effective =
                    if parsed.has_entities() { parsed.cleaned_query.trim().to_string() } else { query.to_string() };
                debug!("Effective query '{}' with {} filters", effective, merged.len());
                (Some(effective).filter(|q| !q.is_empty()), merged)
            }
            None => (None, request.filters.clone()),
        };

        let plan = self.plan(mode, effective.as_deref(), request.page, request.page_size).await;
        let mut select = plan.request.page(request.page, request.page_size).fields(request.return_fields.iter());
        for (field, value) in merged.iter() {
            if let Some(clause) = FilterClause::from_filter(&engine_field(field), value) {
                select = select.filter(clause);
            }
        }
        if let Some(sort) = request.sort() {
            select = select.sort(sort);
        }
        if !request.facet_fields.is_empty() {
            select = select.facets(
                FacetRequest::fields(request.facet_fields.iter().map(String::as_str))
                    .limit(self.settings.facet_limit)
                    .mincount(1),
            );
        }

        let mut metadata = SearchMetadata::new(mode, plan.strategy);
        metadata.degradation = plan.degradation;
        let mut page = match self.backend.select(&select).await {
            Ok(response) => page_from(response, &request.facet_fields, request.page, request.page_size),
            Err(e) => {
                warn!("{} search failed at the engine: {}", mode, e);
                metadata.degradation = Some(DegradeReason::from(&e));
                empty_page(request.page, request.page_size)
            }
        };

        for doc in &mut page.documents {
            doc.search_type = Some(self.classifier.classify(doc, original, mode));
        }
        metadata.count(&page.documents);
        page.search_metadata = metadata;
        page.query_info = QueryInfo {
            query: effective,
            filters: merged,
            sort: select.sort.as_ref().map_or_else(|| "relevance".to_string(), |s| s.to_wire()),
            execution_time_ms: elapsed_ms(started),
        };
        info!(
            "{} search: {} of {} results ({:?}) in {}ms",
            mode,
            page.documents.len(),
            page.total_results,
            page.search_metadata.effective_mode,
            page.query_info.execution_time_ms
        );
        Ok(page)
    }

    async fn plan(&self, mode: SearchMode, query: Option<&str>, page: usize, page_size: usize) -> Plan {
        let text = QueryExpr::text(query);
        let Some(query) = query.filter(|_| !text.is_match_all()) else {
            return match mode {
                SearchMode::Lexical => {
                    Plan::new(lexical_request(QueryExpr::MatchAll), RetrievalStrategy::Lexical)
                }
                _ => Plan::new(weighted_request(QueryExpr::MatchAll), RetrievalStrategy::BoostedLexical),
            };
        };

        match mode {
            SearchMode::Lexical => Plan::new(lexical_request(text), RetrievalStrategy::Lexical),
            SearchMode::Semantic => match self.embedder.embed(query).await {
                Outcome::Success(vector) => {
                    let top_k =
                        page.saturating_add(1).saturating_mul(page_size).saturating_add(self.settings.semantic_overfetch);
                    let knn = QueryExpr::knn(self.settings.vector_field.as_str(), top_k, vector);
                    Plan::new(SelectRequest::new(knn), RetrievalStrategy::Vector)
                }
                outcome => {
                    let reason = outcome.shortfall();
                    warn!("Semantic search without embedding ({:?}), using boosted lexical", reason);
                    let request = weighted_request(text)
                        .boost(QueryExpr::phrase("name", query).boosted(5.0))
                        .boost(QueryExpr::field_text("industry", query).boosted(2.0));
                    Plan::new(request, RetrievalStrategy::BoostedLexical).degraded(reason)
                }
            },
            SearchMode::Hybrid => {
                let parser = QueryParser { mm: None, ..weighted_parser() };
                let request = SelectRequest::new(text).parser(parser);
                match self.embedder.embed(query).await {
                    Outcome::Success(vector) => {
                        let knn = QueryExpr::knn(self.settings.vector_field.as_str(), self.settings.hybrid_top_k, vector)
                            .boosted(self.settings.hybrid_vector_boost);
                        Plan::new(request.boost(knn), RetrievalStrategy::VectorBoostedLexical)
                    }
                    outcome => {
                        let reason = outcome.shortfall();
                        warn!("Hybrid search without embedding ({:?}), lexical only", reason);
                        Plan::new(request, RetrievalStrategy::BoostedLexical).degraded(reason)
                    }
                }
            }
        }
    }
}

fn lexical_request(query: QueryExpr) -> SelectRequest {
    SelectRequest::new(query).parser(QueryParser::edismax(LEXICAL_FIELDS))
}

fn weighted_request(query: QueryExpr) -> SelectRequest { SelectRequest::new(query).parser(weighted_parser()) }

fn page_from(response: SelectResponse, facet_fields: &[String], page: usize, page_size: usize) -> ResultPage {
    let total_results = response.response.num_found;
    let documents: Vec<RetrievedDocument> = response
        .response
        .docs
        .into_iter()
        .map(|fields| {
            let mut doc = RetrievedDocument::new(fields);
            doc.strip_fields_ending_with(VECTOR_FIELD_SUFFIX);
            doc
        })
        .collect();
    let facets: Facets = facet_fields
        .iter()
        .map(|field| (field.clone(), response.facet_counts.pairs(field).into_iter().collect()))
        .collect();
    ResultPage {
        documents,
        total_results,
        facets,
        pagination: PaginationInfo::new(page, page_size, total_results),
        query_info: QueryInfo::default(),
        search_metadata: SearchMetadata::new(SearchMode::Lexical, RetrievalStrategy::Lexical),
        employee_size_facets: None,
    }
}

fn weighted_parser() -> QueryParser { QueryParser::weighted(WEIGHTED_QF, WEIGHTED_PF, "1") }

fn empty_page(page: usize, page_size: usize) -> ResultPage {
    ResultPage {
        documents: Vec::new(),
        total_results: 0,
        facets: Facets::new(),
        pagination: PaginationInfo::new(page, page_size, 0),
        query_info: QueryInfo::default(),
        search_metadata: SearchMetadata::new(SearchMode::Lexical, RetrievalStrategy::Lexical),
        employee_size_facets: None,
    }
}

fn elapsed_ms(started: Instant) -> u64 { u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX) }
