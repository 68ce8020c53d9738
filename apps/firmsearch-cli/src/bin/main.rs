use std::sync::Arc;

use clap::{Parser, Subcommand};
use firmsearch_core::config::Config;
use firmsearch_core::filters::FilterSet;
use firmsearch_core::types::{SearchMode, SuggestionSource};
use firmsearch_hybrid::{ComprehensiveSearchRequest, LexicalSearchRequest, SearchService};
use firmsearch_suggest::Autosuggest;
use firmsearch_text::{LexicalBackend, SolrClient};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "firmsearch", version, about = "Company search: query understanding, autosuggest and hybrid retrieval")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect industries and locations in a query and show the filters they imply
    Parse { query: String },
    /// Ranked completions from company names, facets and templates
    Suggest {
        query: String,
        #[arg(long, default_value_t = 10)]
        max: usize,
        /// Only one source: companies, industries, locations or templates
        #[arg(long)]
        source: Option<SuggestionSource>,
    },
    /// Lexical, semantic or hybrid search with query understanding
    Search {
        query: Option<String>,
        #[arg(long, default_value = "lexical")]
        mode: String,
        /// Caller filters as a JSON object; malformed JSON is ignored
        #[arg(long)]
        filters: Option<String>,
        #[arg(long = "facet")]
        facet_fields: Vec<String>,
        #[arg(long)]
        sort_field: Option<String>,
        #[arg(long)]
        sort_direction: Option<String>,
        #[arg(long, default_value_t = 0)]
        page: usize,
        #[arg(long, default_value_t = 10)]
        page_size: usize,
        #[arg(long = "field")]
        return_fields: Vec<String>,
    },
    /// Lexical search over fixed company filters
    Find {
        query: Option<String>,
        #[arg(long)]
        industry: Vec<String>,
        /// Large, Medium or Small
        #[arg(long)]
        size: Vec<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        founded_from: Option<i64>,
        #[arg(long)]
        founded_to: Option<i64>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// name, size or relevance
        #[arg(long, default_value = "relevance")]
        sort: String,
        #[arg(long, default_value_t = 0)]
        page: usize,
        #[arg(long, default_value_t = 10)]
        page_size: usize,
        #[arg(long = "facet")]
        facet_fields: Vec<String>,
        #[arg(long, default_value_t = 10)]
        facet_limit: i64,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    debug!("Loaded {} settings", config.env_name());

    let backend: Arc<dyn LexicalBackend> = Arc::new(SolrClient::new(&settings.lexical, settings.retry)?);
    let service = SearchService::from_settings(backend.clone(), &settings)?;

    match cli.command {
        Command::Parse { query } => {
            let parsed = service.parse_query(&query);
            let filters = service.understanding().build_filters(&parsed);
            print_json(&serde_json::json!({ "parsed": parsed, "filters": filters }))?;
        }
        Command::Suggest { query, max, source } => {
            let autosuggest = Autosuggest::with_backend(backend, &settings.lexical, service.understanding().clone());
            let bundle = autosuggest.get_autosuggestions(&query, max).await;
            match source {
                Some(source) => print_json(&bundle.only(source))?,
                None => print_json(&bundle)?,
            }
        }
        Command::Search { query, mode, filters, facet_fields, sort_field, sort_direction, page, page_size, return_fields } => {
            let request = ComprehensiveSearchRequest {
                query,
                filters: filters.as_deref().map(FilterSet::parse_lenient).unwrap_or_default(),
                facet_fields,
                sort_field,
                sort_direction,
                page,
                page_size,
                return_fields,
                search_type: Some(SearchMode::from_name(&mode).as_str().to_string()),
            };
            print_json(&service.comprehensive_search(&request).await?)?;
        }
        Command::Find {
            query,
            industry,
            size,
            country,
            city,
            founded_from,
            founded_to,
            tags,
            sort,
            page,
            page_size,
            facet_fields,
            facet_limit,
        } => {
            let request = LexicalSearchRequest {
                query,
                industry,
                size,
                country,
                city,
                founding_year_from: founded_from,
                founding_year_to: founded_to,
                tags,
                sort: Some(sort),
                page,
                page_size,
                facet_fields,
                facet_limit: Some(facet_limit),
            };
            print_json(&service.search(&request).await?)?;
        }
    }
    Ok(())
}
