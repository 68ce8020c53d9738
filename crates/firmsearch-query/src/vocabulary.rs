//! Fixed industry and location vocabularies used for entity detection.

use firmsearch_core::error::{Error, Result};
use regex::Regex;

/// A lower-cased phrase matched on whole-word boundaries.
#[derive(Debug, Clone)]
pub struct Keyword {
    phrase: String,
    pattern: Regex,
}

impl Keyword {
    pub fn new(phrase: &str) -> Result<Self> {
        let phrase = phrase.trim().to_lowercase();
        if phrase.is_empty() {
            return Err(Error::InvalidConfig("vocabulary keywords must not be blank".into()));
        }
        let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&phrase)))
            .map_err(|e| Error::InvalidConfig(format!("bad keyword '{phrase}': {e}")))?;
        Ok(Self { phrase, pattern })
    }

    pub fn phrase(&self) -> &str { &self.phrase }

    /// `text` must already be lower-cased.
    pub fn is_in(&self, text: &str) -> bool { self.pattern.is_match(text) }

    /// Replace every whole-word occurrence with a single space.
    pub fn erase(&self, text: &str) -> String { self.pattern.replace_all(text, " ").into_owned() }
}

#[derive(Debug, Clone)]
pub struct Category {
    name: String,
    keywords: Vec<Keyword>,
}

impl Category {
    pub fn name(&self) -> &str { &self.name }
    pub fn keywords(&self) -> &[Keyword] { &self.keywords }
    pub fn matches(&self, text: &str) -> bool { self.keywords.iter().any(|k| k.is_in(text)) }
}

/// Ordered `category -> keywords` mapping. Immutable once built.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    categories: Vec<Category>,
}

impl Vocabulary {
    pub fn new<'a, I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a [&'a str])>,
    {
        let mut categories = Vec::new();
        for (name, phrases) in entries {
            if phrases.is_empty() {
                return Err(Error::InvalidConfig(format!("category '{name}' has no keywords")));
            }
            let keywords = phrases.iter().map(|p| Keyword::new(p)).collect::<Result<Vec<_>>>()?;
            categories.push(Category { name: name.to_string(), keywords });
        }
        Ok(Self { categories })
    }

    pub fn industries() -> Result<Self> { Self::new(INDUSTRY_KEYWORDS.iter().copied()) }
    pub fn locations() -> Result<Self> { Self::new(LOCATION_KEYWORDS.iter().copied()) }

    /// Names of categories with at least one keyword in `text`, in declaration order.
    pub fn detect(&self, text: &str) -> Vec<String> {
        self.categories
            .iter()
            .filter(|c| c.matches(text))
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Category> { self.categories.iter().find(|c| c.name == name) }
    pub fn categories(&self) -> &[Category] { &self.categories }
    pub fn names(&self) -> impl Iterator<Item = &str> { self.categories.iter().map(|c| c.name.as_str()) }
}

/// Both vocabularies, built once and shared read-only.
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub industries: Vocabulary,
    pub locations: Vocabulary,
}

impl Lexicon {
    pub fn new(industries: Vocabulary, locations: Vocabulary) -> Self { Self { industries, locations } }

    pub fn builtin() -> Result<Self> { Ok(Self::new(Vocabulary::industries()?, Vocabulary::locations()?)) }
}

pub const INDUSTRY_KEYWORDS: &[(&str, &[&str])] = &[
    ("technology", &[
        "tech", "technology", "software", "it", "computer", "digital", "internet", "web", "app",
        "mobile", "ai", "artificial intelligence", "machine learning", "data", "cloud", "saas",
        "platform", "development", "programming", "coding", "engineering",
    ]),
    ("finance", &[
        "finance", "financial", "bank", "banking", "investment", "insurance", "fintech", "trading",
        "hedge fund", "private equity", "venture capital", "asset management",
    ]),
    ("healthcare", &[
        "healthcare", "health", "medical", "pharma", "pharmaceutical", "biotech", "biotechnology",
        "hospital", "clinic", "doctor", "medicine", "therapy", "treatment",
    ]),
    ("retail", &[
        "retail", "ecommerce", "e-commerce", "shopping", "store", "marketplace", "fashion",
        "clothing", "apparel", "consumer goods",
    ]),
    ("manufacturing", &[
        "manufacturing", "factory", "production", "industrial", "automotive", "aerospace",
        "chemical", "materials", "machinery", "equipment",
    ]),
    ("education", &[
        "education", "educational", "school", "university", "college", "learning", "training",
        "academic", "research", "edtech",
    ]),
    ("energy", &[
        "energy", "oil", "gas", "renewable", "solar", "wind", "nuclear", "power", "electricity",
        "utilities", "green energy",
    ]),
    ("real estate", &[
        "real estate", "property", "housing", "construction", "building", "architecture",
        "development", "commercial real estate",
    ]),
    ("media", &[
        "media", "entertainment", "publishing", "news", "television", "tv", "radio", "film",
        "movie", "music", "gaming", "advertising", "marketing",
    ]),
    ("telecommunications", &[
        "telecommunications", "telecom", "communications", "wireless", "mobile", "broadband",
        "internet", "networking", "connectivity",
    ]),
];

pub const LOCATION_KEYWORDS: &[(&str, &[&str])] = &[
    ("california", &[
        "california", "ca", "san francisco", "los angeles", "silicon valley", "bay area",
        "san diego", "sacramento", "oakland", "san jose",
    ]),
    ("new york", &[
        "new york", "ny", "nyc", "manhattan", "brooklyn", "queens", "bronx", "albany", "buffalo",
        "rochester",
    ]),
    ("texas", &[
        "texas", "tx", "houston", "dallas", "austin", "san antonio", "fort worth", "el paso",
        "arlington", "corpus christi",
    ]),
    ("florida", &[
        "florida", "fl", "miami", "tampa", "orlando", "jacksonville", "tallahassee",
        "fort lauderdale", "west palm beach",
    ]),
    ("washington", &[
        "washington", "wa", "seattle", "spokane", "tacoma", "vancouver", "bellevue", "everett",
        "kent", "renton",
    ]),
    ("illinois", &[
        "illinois", "il", "chicago", "aurora", "rockford", "joliet", "naperville", "springfield",
        "peoria", "elgin",
    ]),
    ("pennsylvania", &[
        "pennsylvania", "pa", "philadelphia", "pittsburgh", "allentown", "erie", "reading",
        "scranton", "bethlehem",
    ]),
    ("ohio", &[
        "ohio", "oh", "columbus", "cleveland", "cincinnati", "toledo", "akron", "dayton", "parma",
        "canton",
    ]),
    ("georgia", &[
        "georgia", "ga", "atlanta", "augusta", "columbus", "savannah", "athens", "sandy springs",
        "roswell",
    ]),
    ("north carolina", &[
        "north carolina", "nc", "charlotte", "raleigh", "greensboro", "durham", "winston-salem",
        "fayetteville", "cary",
    ]),
    ("michigan", &[
        "michigan", "mi", "detroit", "grand rapids", "warren", "sterling heights", "lansing",
        "ann arbor", "flint",
    ]),
    ("massachusetts", &[
        "massachusetts", "ma", "boston", "worcester", "springfield", "lowell", "cambridge",
        "new bedford", "brockton",
    ]),
    ("virginia", &[
        "virginia", "va", "virginia beach", "norfolk", "chesapeake", "richmond", "newport news",
        "alexandria", "hampton",
    ]),
    ("maryland", &[
        "maryland", "md", "baltimore", "frederick", "rockville", "gaithersburg", "bowie",
        "hagerstown", "annapolis",
    ]),
    ("colorado", &[
        "colorado", "co", "denver", "colorado springs", "aurora", "fort collins", "lakewood",
        "thornton", "arvada",
    ]),
    ("united states", &["usa", "us", "united states", "america", "american"]),
    ("canada", &[
        "canada", "canadian", "toronto", "vancouver", "montreal", "calgary", "ottawa", "edmonton",
        "mississauga",
    ]),
    ("united kingdom", &[
        "uk", "united kingdom", "britain", "england", "london", "manchester", "birmingham", "leeds",
        "glasgow", "scotland",
    ]),
    ("germany", &[
        "germany", "german", "berlin", "munich", "hamburg", "cologne", "frankfurt", "stuttgart",
        "dusseldorf",
    ]),
    ("france", &[
        "france", "french", "paris", "marseille", "lyon", "toulouse", "nice", "nantes",
        "strasbourg",
    ]),
    ("india", &[
        "india", "indian", "mumbai", "delhi", "bangalore", "hyderabad", "chennai", "kolkata",
        "pune", "ahmedabad",
    ]),
    ("china", &[
        "china", "chinese", "beijing", "shanghai", "guangzhou", "shenzhen", "wuhan", "chengdu",
        "dongguan",
    ]),
    ("japan", &[
        "japan", "japanese", "tokyo", "osaka", "yokohama", "nagoya", "sapporo", "kobe", "kyoto",
        "fukuoka",
    ]),
];
