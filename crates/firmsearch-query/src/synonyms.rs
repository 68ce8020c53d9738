//! Backend terms each detected category expands to.
//!
//! Categories without a curated entry expand to their own name.

const INDUSTRY_TERMS: &[(&str, &[&str])] = &[
    ("technology", &[
        "Software Development", "Information Technology", "Computer Software", "Internet",
        "Telecommunications", "E-commerce", "SaaS", "Cloud Computing", "Artificial Intelligence",
        "Machine Learning", "Data Analytics", "Cybersecurity", "Mobile Applications",
        "Web Development", "Software", "Technology", "IT", "Tech", "Computer", "Digital", "Platform",
    ]),
    ("finance", &[
        "Financial Services", "Banking", "Investment Banking", "Insurance", "Asset Management",
        "Private Equity", "Venture Capital", "Hedge Fund", "Financial Technology", "Fintech",
        "Credit", "Lending", "Trading", "Securities", "Finance", "Financial",
    ]),
    ("healthcare", &[
        "Healthcare", "Medical", "Pharmaceutical", "Biotechnology", "Hospital", "Clinical",
        "Medical Device", "Health Technology", "Telemedicine", "Digital Health", "Life Sciences",
        "Biotech", "Pharma", "Medical Services", "Health", "Medicine",
    ]),
    ("retail", &[
        "Retail", "E-commerce", "Consumer Goods", "Fashion", "Apparel", "Food & Beverage",
        "Grocery", "Shopping", "Marketplace", "Consumer Products", "Clothing",
    ]),
    ("manufacturing", &[
        "Manufacturing", "Industrial", "Automotive", "Aerospace", "Chemical", "Materials",
        "Construction", "Heavy Industry", "Production", "Factory", "Engineering",
    ]),
    ("education", &[
        "Education", "Educational Technology", "E-learning", "Training", "Academic", "University",
        "School", "Learning", "Research", "EdTech",
    ]),
    ("energy", &[
        "Energy", "Oil & Gas", "Renewable Energy", "Solar", "Wind", "Nuclear", "Electric Utilities",
        "Power Generation", "Clean Energy", "Green Technology",
    ]),
    ("real estate", &[
        "Real Estate", "Property", "Construction", "Architecture", "Property Management",
        "Commercial Real Estate", "Real Estate Development",
    ]),
    ("media", &[
        "Media", "Entertainment", "Publishing", "Broadcasting", "Film", "Television", "Music",
        "Gaming", "Advertising", "Marketing", "Digital Media",
    ]),
    ("telecommunications", &[
        "Telecommunications", "Wireless", "Mobile", "Internet Service Provider", "Broadband",
        "Network", "Communications", "Telecom",
    ]),
];

const LOCATION_TERMS: &[(&str, &[&str])] = &[
    ("california", &[
        "California", "CA", "San Francisco", "Los Angeles", "San Diego", "Sacramento", "Oakland",
        "San Jose", "Silicon Valley", "Bay Area",
    ]),
    ("new york", &[
        "New York", "NY", "NYC", "Manhattan", "Brooklyn", "Queens", "Bronx", "Albany", "Buffalo",
        "Rochester",
    ]),
    ("texas", &[
        "Texas", "TX", "Houston", "Dallas", "Austin", "San Antonio", "Fort Worth", "El Paso",
        "Arlington", "Corpus Christi",
    ]),
    ("florida", &[
        "Florida", "FL", "Miami", "Tampa", "Orlando", "Jacksonville", "Tallahassee",
        "Fort Lauderdale", "West Palm Beach",
    ]),
    ("washington", &[
        "Washington", "WA", "Seattle", "Spokane", "Tacoma", "Vancouver", "Bellevue", "Everett",
        "Kent", "Renton",
    ]),
    ("illinois", &[
        "Illinois", "IL", "Chicago", "Aurora", "Rockford", "Joliet", "Naperville", "Springfield",
        "Peoria", "Elgin",
    ]),
    ("united states", &["United States", "USA", "US", "America"]),
    ("canada", &[
        "Canada", "Toronto", "Vancouver", "Montreal", "Calgary", "Ottawa", "Edmonton",
        "Mississauga",
    ]),
    ("united kingdom", &[
        "United Kingdom", "UK", "Britain", "England", "London", "Manchester", "Birmingham",
        "Leeds", "Glasgow", "Scotland",
    ]),
    ("germany", &[
        "Germany", "Berlin", "Munich", "Hamburg", "Cologne", "Frankfurt", "Stuttgart", "Dusseldorf",
    ]),
    ("france", &["France", "Paris", "Marseille", "Lyon", "Toulouse", "Nice", "Nantes", "Strasbourg"]),
    ("india", &[
        "India", "Mumbai", "Delhi", "Bangalore", "Hyderabad", "Chennai", "Kolkata", "Pune",
        "Ahmedabad",
    ]),
    ("china", &["China", "Beijing", "Shanghai", "Guangzhou", "Shenzhen", "Wuhan", "Chengdu", "Dongguan"]),
    ("japan", &[
        "Japan", "Tokyo", "Osaka", "Yokohama", "Nagoya", "Sapporo", "Kobe", "Kyoto", "Fukuoka",
    ]),
];

fn expand(table: &[(&str, &[&str])], category: &str) -> Vec<String> {
    let key = category.to_lowercase();
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map_or_else(|| vec![category.to_string()], |(_, terms)| terms.iter().map(|t| (*t).to_string()).collect())
}

pub fn industry_terms(category: &str) -> Vec<String> { expand(INDUSTRY_TERMS, category) }

pub fn location_terms(category: &str) -> Vec<String> { expand(LOCATION_TERMS, category) }
