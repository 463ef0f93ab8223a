//! Dog and cat breeds with pictures, origin, and size.
//!
//! Both quizzes run the same query shape against a different breed class, so
//! one generator is parameterized by a [`Species`] table.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use flashdeck_core::models::QuizField;
use flashdeck_core::slug::slugify;

use crate::deck::DeckInfo;
use crate::downloader::Downloader;
use crate::error::QuizError;
use crate::generator::{download_pictures, QuizGenerator, QuizItem, QuizOptions};
use crate::sparql::{binding_value, entity_id, is_bare_entity_id, QueryResult, SparqlClient};

const PICTURE_PAUSE: Duration = Duration::from_millis(300);
const MEDIA_SUBDIR: &str = "images";

pub const FIELD_ORIGIN: &str = "Původ";
pub const FIELD_SIZE: &str = "Velikost";

/// Static description of one breed quiz.
#[derive(Debug)]
pub struct Species {
    /// `--type` name and quiz category.
    pub name: &'static str,
    /// Wikidata class every breed is an instance of.
    pub breed_class: &'static str,
    pub deck_prefix: &'static str,
    pub deck_name: &'static str,
    pub deck_description: &'static str,
    /// Size labels by breed entity id.
    pub sizes: &'static [(&'static str, &'static [&'static str])],
    pub default_size: &'static str,
}

impl Species {
    pub fn size_of(&self, wikidata_id: &str) -> &'static str {
        self.sizes
            .iter()
            .find(|(_, ids)| ids.contains(&wikidata_id))
            .map(|(size, _)| *size)
            .unwrap_or(self.default_size)
    }
}

pub static DOGS: Species = Species {
    name: "dogbreeds",
    breed_class: "Q39367",
    deck_prefix: "dog-breeds",
    deck_name: "Psí plemena",
    deck_description: "Poznej psí plemena podle fotografie",
    sizes: &[
        (
            "Velký",
            &[
                "Q5765", "Q39062", "Q39084", "Q192365", "Q243458", "Q134649", "Q39021",
                "Q37652", "Q184714", "Q205594", "Q193119", "Q219373", "Q176139", "Q327508",
                "Q1098647", "Q208212", "Q26867", "Q241478", "Q161548", "Q26745",
            ],
        ),
        (
            "Střední",
            &[
                "Q45122", "Q208149", "Q205476", "Q178258", "Q165257", "Q38565", "Q329949",
                "Q172865", "Q212813", "Q183188", "Q220685", "Q203244", "Q39041", "Q37702",
                "Q275473", "Q188915",
            ],
        ),
        (
            "Malý",
            &[
                "Q26868", "Q38571", "Q327499", "Q205060", "Q165447", "Q161462", "Q38545",
                "Q180973", "Q159348", "Q207536", "Q185096", "Q161117", "Q38649", "Q191652",
                "Q184962", "Q38573", "Q26823",
            ],
        ),
    ],
    default_size: "Střední",
};

pub static CATS: Species = Species {
    name: "catbreeds",
    breed_class: "Q43577",
    deck_prefix: "cat-breeds",
    deck_name: "Kočičí plemena",
    deck_description: "Poznej kočičí plemena podle fotografie",
    sizes: &[
        (
            "Velká",
            &[
                "Q42365", "Q182153", "Q188988", "Q190109", "Q42373", "Q193437", "Q212089",
                "Q211906", "Q190106", "Q217776", "Q186648", "Q219337",
            ],
        ),
        (
            "Střední",
            &[
                "Q83450", "Q217770", "Q186627", "Q43091", "Q188636", "Q191034", "Q213044",
                "Q213005", "Q178056", "Q210726", "Q212917", "Q191652", "Q185195", "Q216628",
                "Q183266", "Q213377", "Q210732", "Q204034", "Q210753", "Q215682",
            ],
        ),
        (
            "Malá",
            &[
                "Q43602", "Q188475", "Q189249", "Q189267", "Q189369", "Q189265", "Q213011",
                "Q213033",
            ],
        ),
    ],
    default_size: "Střední",
};

pub struct BreedGenerator {
    species: &'static Species,
    sparql: SparqlClient,
    downloader: Downloader,
}

impl BreedGenerator {
    pub fn new(species: &'static Species, sparql: SparqlClient, downloader: Downloader) -> Self {
        Self {
            species,
            sparql,
            downloader,
        }
    }
}

/// Breeds of `species` that have a picture, with optional origin and the
/// English label. Fetches twice the limit since many rows get filtered.
pub fn build_query(species: &Species, opts: &QuizOptions) -> String {
    format!(
        r#"SELECT DISTINCT ?breed ?breedLabel ?breedLabelEn ?image ?originLabel WHERE {{
  ?breed wdt:P31 wd:{class};
         wdt:P18 ?image.
  OPTIONAL {{ ?breed wdt:P495 ?origin. }}
  OPTIONAL {{ ?breed rdfs:label ?breedLabelEn. FILTER(LANG(?breedLabelEn) = "en") }}
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "{lang},en". }}
}}
LIMIT {limit}"#,
        class = species.breed_class,
        lang = opts.language,
        limit = opts.limit * 2,
    )
}

/// Turn result rows into at most `limit` breed items.
///
/// Rows are deduplicated by entity id; rows whose label is still a bare
/// entity id (no label in any requested language) are dropped.
pub fn parse_items(species: &Species, result: &QueryResult, limit: usize) -> Vec<QuizItem> {
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for row in &result.results.bindings {
        if items.len() >= limit {
            break;
        }

        let wikidata_id = entity_id(binding_value(row, "breed"));
        let label = binding_value(row, "breedLabel");
        if wikidata_id.is_empty() || label.is_empty() || is_bare_entity_id(label) {
            continue;
        }
        if !seen.insert(wikidata_id.to_string()) {
            continue;
        }

        let english = binding_value(row, "breedLabelEn");
        let subtitle = (!english.is_empty() && english != label).then(|| english.to_string());

        let mut fields = Vec::new();
        let origin = binding_value(row, "originLabel");
        if !origin.is_empty() && !is_bare_entity_id(origin) {
            fields.push(QuizField {
                label: FIELD_ORIGIN.into(),
                value: origin.to_string(),
            });
        }
        fields.push(QuizField {
            label: FIELD_SIZE.into(),
            value: species.size_of(wikidata_id).into(),
        });

        let id = match slugify(label) {
            slug if slug.is_empty() => wikidata_id.to_lowercase(),
            slug => slug,
        };

        items.push(QuizItem {
            id,
            title: label.to_string(),
            subtitle,
            image_url: binding_value(row, "image").to_string(),
            local_image: None,
            fields,
            wikidata_id: Some(wikidata_id.to_string()),
        });
    }

    items
}

#[async_trait]
impl QuizGenerator for BreedGenerator {
    fn name(&self) -> &'static str {
        self.species.name
    }

    fn deck_info(&self, opts: &QuizOptions) -> DeckInfo {
        DeckInfo {
            id: format!("{}-{}", self.species.deck_prefix, opts.limit),
            name: self.species.deck_name.into(),
            description: self.species.deck_description.into(),
            media_subdir: MEDIA_SUBDIR.into(),
        }
    }

    async fn fetch_data(&self, opts: &QuizOptions) -> Result<Vec<QuizItem>, QuizError> {
        let result = self.sparql.query(&build_query(self.species, opts)).await?;
        Ok(parse_items(self.species, &result, opts.limit))
    }

    async fn download_media(&self, items: Vec<QuizItem>, dir: &Path) -> Vec<QuizItem> {
        download_pictures(&self.downloader, items, dir, MEDIA_SUBDIR, PICTURE_PAUSE).await
    }
}
