//! Countries by population with their capitals and flags.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use flashdeck_core::models::QuizField;

use crate::deck::DeckInfo;
use crate::downloader::Downloader;
use crate::error::QuizError;
use crate::generator::{download_pictures, QuizGenerator, QuizItem, QuizOptions};
use crate::sparql::{binding_value, entity_id, QueryResult, SparqlClient};

const FLAG_URL_BASE: &str = "https://flagcdn.com/w640";
const FLAG_PAUSE: Duration = Duration::from_millis(200);
const MEDIA_SUBDIR: &str = "flags";

pub const FIELD_COUNTRY_POPULATION: &str = "Populace státu";
pub const FIELD_CAPITAL_POPULATION: &str = "Populace hl. města";
const NOT_AVAILABLE: &str = "N/A";

pub struct CapitalsGenerator {
    sparql: SparqlClient,
    downloader: Downloader,
}

impl CapitalsGenerator {
    pub fn new(sparql: SparqlClient, downloader: Downloader) -> Self {
        Self { sparql, downloader }
    }
}

/// Sovereign states (Q3624078) with capital, flag, population, and ISO
/// alpha-2 code, most populous first.
pub fn build_query(opts: &QuizOptions) -> String {
    format!(
        r#"SELECT DISTINCT ?country ?countryLabel ?capital ?capitalLabel ?flag ?countryPopulation ?capitalPopulation ?countryCode WHERE {{
  ?country wdt:P31 wd:Q3624078;
           wdt:P36 ?capital;
           wdt:P41 ?flag;
           wdt:P1082 ?countryPopulation;
           wdt:P297 ?countryCode.
  OPTIONAL {{ ?capital wdt:P1082 ?capitalPopulation. }}
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "{lang},en". }}
}}
ORDER BY DESC(?countryPopulation)
LIMIT {limit}"#,
        lang = opts.language,
        limit = opts.limit,
    )
}

/// One item per country code in result order; rows without a code are
/// dropped and later duplicates (multiple capitals) ignored.
pub fn parse_items(result: &QueryResult) -> Vec<QuizItem> {
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for row in &result.results.bindings {
        let code = binding_value(row, "countryCode").to_lowercase();
        if code.is_empty() || !seen.insert(code.clone()) {
            continue;
        }

        let mut fields = vec![QuizField {
            label: FIELD_COUNTRY_POPULATION.into(),
            value: format_population(binding_value(row, "countryPopulation")),
        }];
        let capital_population = format_population(binding_value(row, "capitalPopulation"));
        if capital_population != NOT_AVAILABLE {
            fields.push(QuizField {
                label: FIELD_CAPITAL_POPULATION.into(),
                value: capital_population,
            });
        }

        let capital = binding_value(row, "capitalLabel");
        let wikidata_id = entity_id(binding_value(row, "country"));

        items.push(QuizItem {
            image_url: format!("{FLAG_URL_BASE}/{code}.png"),
            id: code,
            title: binding_value(row, "countryLabel").to_string(),
            subtitle: (!capital.is_empty()).then(|| capital.to_string()),
            local_image: None,
            fields,
            wikidata_id: (!wikidata_id.is_empty()).then(|| wikidata_id.to_string()),
        });
    }

    items
}

/// Human-readable Czech population figure.
///
/// | Value          | Output       |
/// |----------------|--------------|
/// | empty          | `N/A`        |
/// | not a number   | unchanged    |
/// | >= 1e9         | `1.4 mld`    |
/// | >= 1e6         | `10.9 mil`   |
/// | >= 1e3         | `523 tis`    |
/// | otherwise      | `812`        |
pub fn format_population(raw: &str) -> String {
    if raw.is_empty() {
        return NOT_AVAILABLE.into();
    }
    let Ok(n) = raw.parse::<f64>() else {
        return raw.to_string();
    };

    if n >= 1e9 {
        format!("{:.1} mld", n / 1e9)
    } else if n >= 1e6 {
        format!("{:.1} mil", n / 1e6)
    } else if n >= 1e3 {
        format!("{:.0} tis", n / 1e3)
    } else {
        format!("{n:.0}")
    }
}

#[async_trait]
impl QuizGenerator for CapitalsGenerator {
    fn name(&self) -> &'static str {
        "capitals"
    }

    fn deck_info(&self, opts: &QuizOptions) -> DeckInfo {
        DeckInfo {
            id: format!("world-capitals-{}", opts.limit),
            name: "Hlavní města světa".into(),
            description: format!(
                "Top {} států dle populace s jejich hlavními městy a vlajkami",
                opts.limit
            ),
            media_subdir: MEDIA_SUBDIR.into(),
        }
    }

    async fn fetch_data(&self, opts: &QuizOptions) -> Result<Vec<QuizItem>, QuizError> {
        let result = self.sparql.query(&build_query(opts)).await?;
        Ok(parse_items(&result))
    }

    async fn download_media(&self, items: Vec<QuizItem>, dir: &Path) -> Vec<QuizItem> {
        download_pictures(&self.downloader, items, dir, MEDIA_SUBDIR, FLAG_PAUSE).await
    }
}
