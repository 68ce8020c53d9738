//! Structured lexical-engine requests.
//!
//! Requests are built as values (`QueryExpr`, `FilterClause`, ...) and only turned into
//! `select` parameters by [`SelectRequest::to_params`]. All term quoting and escaping lives
//! in this module.

use firmsearch_core::filters::{FilterValue, ScalarValue};

pub type Params = Vec<(String, String)>;

const SPECIAL: &[char] = &[
    '\\', '+', '-', '!', '(', ')', ':', '^', '[', ']', '"', '{', '}', '~', '*', '?', '|', '&', '/',
];

/// Escape query syntax in free text, keeping whitespace so terms still split.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape a single token, whitespace included.
pub fn escape_token(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL.contains(&c) || c.is_whitespace() {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Plain tokens go bare, anything else is quoted.
fn term(value: &ScalarValue) -> String {
    let text = value.to_string();
    let plain = !text.is_empty() && text.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.');
    if plain { text } else { quote(&text) }
}

fn range_bound(value: Option<&ScalarValue>) -> String {
    match value {
        None => "*".to_string(),
        Some(v) if v.is_numeric() => v.to_string(),
        Some(ScalarValue::Text(s)) if s == "*" || s.parse::<f64>().is_ok() => s.clone(),
        Some(other) => quote(&other.to_string()),
    }
}

fn boost_suffix(boost: Option<f32>) -> String { boost.map(|b| format!("^{b:.1}")).unwrap_or_default() }

#[derive(Debug, Clone, PartialEq)]
pub enum QueryExpr {
    MatchAll,
    /// Free user text, parsed by the configured query parser.
    Text(String),
    Prefix { field: String, prefix: String },
    Phrase { field: String, text: String, boost: Option<f32> },
    /// Free text restricted to one field.
    FieldText { field: String, text: String, boost: Option<f32> },
    /// Nearest neighbours over a dense vector field.
    Knn { field: String, top_k: usize, vector: Vec<f32>, boost: Option<f32> },
}

impl QueryExpr {
    /// Blank input and the literal match-all syntax both mean every document.
    pub fn text(query: Option<&str>) -> Self {
        match query.map(str::trim) {
            None | Some("" | "*:*") => QueryExpr::MatchAll,
            Some(q) => QueryExpr::Text(q.to_string()),
        }
    }

    pub fn knn(field: impl Into<String>, top_k: usize, vector: Vec<f32>) -> Self {
        QueryExpr::Knn { field: field.into(), top_k, vector, boost: None }
    }

    pub fn phrase(field: impl Into<String>, text: impl Into<String>) -> Self {
        QueryExpr::Phrase { field: field.into(), text: text.into(), boost: None }
    }

    pub fn field_text(field: impl Into<String>, text: impl Into<String>) -> Self {
        QueryExpr::FieldText { field: field.into(), text: text.into(), boost: None }
    }

    pub fn prefix(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        QueryExpr::Prefix { field: field.into(), prefix: prefix.into() }
    }

    pub fn boosted(self, weight: f32) -> Self {
        match self {
            QueryExpr::Phrase { field, text, .. } => QueryExpr::Phrase { field, text, boost: Some(weight) },
            QueryExpr::FieldText { field, text, .. } => QueryExpr::FieldText { field, text, boost: Some(weight) },
            QueryExpr::Knn { field, top_k, vector, .. } => QueryExpr::Knn { field, top_k, vector, boost: Some(weight) },
            other => other,
        }
    }

    pub fn is_match_all(&self) -> bool { matches!(self, QueryExpr::MatchAll) }

    pub fn to_wire(&self) -> String {
        match self {
            QueryExpr::MatchAll => "*:*".to_string(),
            QueryExpr::Text(text) => escape_text(text),
            QueryExpr::Prefix { field, prefix } => format!("{field}:{}*", escape_token(prefix)),
            QueryExpr::Phrase { field, text, boost } => format!("{field}:{}{}", quote(text), boost_suffix(*boost)),
            QueryExpr::FieldText { field, text, boost } => {
                format!("{field}:({}){}", escape_text(text), boost_suffix(*boost))
            }
            QueryExpr::Knn { field, top_k, vector, boost } => {
                let values = vector.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
                format!("{{!knn f={field} topK={top_k}}}[{values}]{}", boost_suffix(*boost))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    AnyOf { field: String, values: Vec<ScalarValue> },
    Equals { field: String, value: ScalarValue },
    /// Inclusive; `None` is unbounded.
    Range { field: String, from: Option<ScalarValue>, to: Option<ScalarValue> },
    Either(Vec<FilterClause>),
}

impl FilterClause {
    /// Translate one caller filter; empty lists and unbounded ranges produce no clause.
    pub fn from_filter(field: &str, value: &FilterValue) -> Option<Self> {
        let field = field.to_string();
        match value {
            FilterValue::List(values) if values.is_empty() => None,
            FilterValue::Range(bounds) if bounds.is_unbounded() => None,
            FilterValue::List(values) => Some(FilterClause::AnyOf { field, values: values.clone() }),
            FilterValue::Range(bounds) => {
                Some(FilterClause::Range { field, from: bounds.from.clone(), to: bounds.to.clone() })
            }
            FilterValue::Scalar(value) => Some(FilterClause::Equals { field, value: value.clone() }),
        }
    }

    pub fn range(field: impl Into<String>, from: Option<i64>, to: Option<i64>) -> Self {
        FilterClause::Range { field: field.into(), from: from.map(ScalarValue::from), to: to.map(ScalarValue::from) }
    }

    pub fn to_wire(&self) -> String {
        match self {
            FilterClause::AnyOf { values, .. } if values.is_empty() => "-*:*".to_string(),
            FilterClause::AnyOf { field, values } => {
                format!("{field}:({})", values.iter().map(term).collect::<Vec<_>>().join(" OR "))
            }
            FilterClause::Equals { field, value } => format!("{field}:{}", term(value)),
            FilterClause::Range { field, from, to } => {
                format!("{field}:[{} TO {}]", range_bound(from.as_ref()), range_bound(to.as_ref()))
            }
            FilterClause::Either(clauses) => clauses.iter().map(FilterClause::to_wire).collect::<Vec<_>>().join(" OR "),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldWeight {
    pub field: String,
    pub weight: Option<f32>,
}

impl FieldWeight {
    fn to_wire(&self) -> String { format!("{}{}", self.field, boost_suffix(self.weight)) }
}

/// Extended dismax settings.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParser {
    pub qf: Vec<FieldWeight>,
    pub pf: Vec<FieldWeight>,
    pub mm: Option<String>,
}

impl QueryParser {
    pub fn edismax(qf: &[&str]) -> Self {
        Self {
            qf: qf.iter().map(|f| FieldWeight { field: (*f).to_string(), weight: None }).collect(),
            pf: Vec::new(),
            mm: None,
        }
    }

    pub fn weighted(qf: &[(&str, f32)], pf: &[(&str, f32)], mm: &str) -> Self {
        let weights = |fields: &[(&str, f32)]| {
            fields.iter().map(|(f, w)| FieldWeight { field: (*f).to_string(), weight: Some(*w) }).collect::<Vec<_>>()
        };
        Self { qf: weights(qf), pf: weights(pf), mm: Some(mm.to_string()) }
    }

    fn push_params(&self, params: &mut Params) {
        let join = |fields: &[FieldWeight]| fields.iter().map(FieldWeight::to_wire).collect::<Vec<_>>().join(" ");
        params.push(("defType".into(), "edismax".into()));
        params.push(("qf".into(), join(self.qf.as_slice())));
        if !self.pf.is_empty() {
            params.push(("pf".into(), join(self.pf.as_slice())));
        }
        if let Some(mm) = &self.mm {
            params.push(("mm".into(), mm.clone()));
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self { Self { field: field.into(), descending: false } }
    pub fn desc(field: impl Into<String>) -> Self { Self { field: field.into(), descending: true } }

    /// Any direction other than `desc` (case-insensitive) sorts ascending.
    pub fn parse(field: &str, direction: Option<&str>) -> Self {
        match direction {
            Some(d) if d.eq_ignore_ascii_case("desc") => Self::desc(field),
            _ => Self::asc(field),
        }
    }

    pub fn to_wire(&self) -> String {
        format!("{} {}", self.field, if self.descending { "desc" } else { "asc" })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacetRequest {
    pub fields: Vec<String>,
    pub limit: Option<i64>,
    pub mincount: Option<u32>,
    /// Only keep facet values containing this text, ignoring case.
    pub contains: Option<String>,
    pub queries: Vec<FilterClause>,
}

impl FacetRequest {
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { fields: fields.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    pub fn limit(mut self, limit: i64) -> Self { self.limit = Some(limit); self }
    pub fn mincount(mut self, mincount: u32) -> Self { self.mincount = Some(mincount); self }
    pub fn contains(mut self, text: impl Into<String>) -> Self { self.contains = Some(text.into()); self }
    pub fn query(mut self, clause: FilterClause) -> Self { self.queries.push(clause); self }

    fn push_params(&self, params: &mut Params) {
        if self.fields.is_empty() && self.queries.is_empty() {
            return;
        }
        params.push(("facet".into(), "true".into()));
        for field in &self.fields {
            params.push(("facet.field".into(), field.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("facet.limit".into(), limit.to_string()));
        }
        if let Some(mincount) = self.mincount {
            params.push(("facet.mincount".into(), mincount.to_string()));
        }
        if let Some(text) = &self.contains {
            params.push(("facet.contains".into(), text.clone()));
            params.push(("facet.contains.ignoreCase".into(), "true".into()));
        }
        for clause in &self.queries {
            params.push(("facet.query".into(), clause.to_wire()));
        }
    }
}

/// One `select` call.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectRequest {
    pub query: QueryExpr,
    pub parser: Option<QueryParser>,
    pub boosts: Vec<QueryExpr>,
    pub filters: Vec<FilterClause>,
    pub sort: Option<SortSpec>,
    pub start: usize,
    pub rows: usize,
    pub fields: Vec<String>,
    pub facets: Option<FacetRequest>,
}

impl SelectRequest {
    pub fn new(query: QueryExpr) -> Self {
        Self {
            query,
            parser: None,
            boosts: Vec::new(),
            filters: Vec::new(),
            sort: None,
            start: 0,
            rows: 10,
            fields: Vec::new(),
            facets: None,
        }
    }

    pub fn parser(mut self, parser: QueryParser) -> Self { self.parser = Some(parser); self }
    pub fn boost(mut self, expr: QueryExpr) -> Self { self.boosts.push(expr); self }
    pub fn filter(mut self, clause: FilterClause) -> Self { self.filters.push(clause); self }
    pub fn sort(mut self, sort: SortSpec) -> Self { self.sort = Some(sort); self }
    pub fn rows(mut self, rows: usize) -> Self { self.rows = rows; self }
    pub fn facets(mut self, facets: FacetRequest) -> Self { self.facets = Some(facets); self }

    /// Zero-based page of `page_size` rows.
    pub fn page(mut self, page: usize, page_size: usize) -> Self {
        self.start = page.saturating_mul(page_size);
        self.rows = page_size;
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn to_params(&self) -> Params {
        let mut params: Params = vec![("wt".into(), "json".into())];
        if let Some(parser) = &self.parser {
            parser.push_params(&mut params);
        }
        params.push(("q".into(), self.query.to_wire()));
        for boost in &self.boosts {
            params.push(("bq".into(), boost.to_wire()));
        }
        for clause in &self.filters {
            params.push(("fq".into(), clause.to_wire()));
        }
        if let Some(sort) = &self.sort {
            params.push(("sort".into(), sort.to_wire()));
        }
        params.push(("start".into(), self.start.to_string()));
        params.push(("rows".into(), self.rows.to_string()));
        if !self.fields.is_empty() {
            params.push(("fl".into(), self.fields.join(",")));
        }
        if let Some(facets) = &self.facets {
            facets.push_params(&mut params);
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestRequest {
    pub dictionary: String,
    pub query: String,
    pub count: usize,
}

impl SuggestRequest {
    pub fn to_params(&self) -> Params {
        vec![
            ("wt".into(), "json".into()),
            ("suggest".into(), "true".into()),
            ("suggest.dictionary".into(), self.dictionary.clone()),
            ("suggest.q".into(), self.query.clone()),
            ("suggest.count".into(), self.count.to_string()),
        ]
    }
}
