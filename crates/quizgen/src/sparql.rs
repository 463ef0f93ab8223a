//! Minimal client for the Wikidata SPARQL endpoint.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::error::QuizError;

/// Public Wikidata query service.
pub const WIKIDATA_ENDPOINT: &str = "https://query.wikidata.org/sparql";

/// Wikidata asks automated clients to identify themselves.
pub const USER_AGENT: &str =
    "DuolingoCards-QuizGenerator/1.0 (https://github.com/duolingocards)";

const QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// SPARQL JSON results document (`application/sparql-results+json`).
#[derive(Debug, Default, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub results: Results,
}

#[derive(Debug, Default, Deserialize)]
pub struct Results {
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

/// One result row: variable name to bound term.
pub type Binding = HashMap<String, Term>;

#[derive(Debug, Clone, Deserialize)]
pub struct Term {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub value: String,
}

/// Value bound to `var` in a row, or `""` when the variable is unbound.
pub fn binding_value<'a>(binding: &'a Binding, var: &str) -> &'a str {
    binding.get(var).map(|t| t.value.as_str()).unwrap_or("")
}

/// Entity id from a Wikidata URI (`http://www.wikidata.org/entity/Q142` -> `Q142`).
pub fn entity_id(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

/// Whether `label` is just an unresolved entity id such as `Q12345`.
///
/// The label service falls back to the bare id when an entity has no label
/// in any requested language.
pub fn is_bare_entity_id(label: &str) -> bool {
    label
        .strip_prefix('Q')
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

pub struct SparqlClient {
    client: reqwest::Client,
    endpoint: String,
}

impl SparqlClient {
    pub fn new() -> Result<Self, QuizError> {
        Self::with_endpoint(WIKIDATA_ENDPOINT)
    }

    /// Client against an alternative endpoint (mirrors, test stubs).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, QuizError> {
        let client = reqwest::Client::builder()
            .timeout(QUERY_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Run `sparql` and decode the JSON result set.
    pub async fn query(&self, sparql: &str) -> Result<QueryResult, QuizError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", sparql), ("format", "json")])
            .header(reqwest::header::ACCEPT, "application/sparql-results+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QuizError::Status {
                service: "wikidata",
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| QuizError::Decode {
            what: "SPARQL results",
            message: e.to_string(),
        })
    }
}

/// Build a one-row-per-entry [`QueryResult`] from `(var, value)` pairs.
#[cfg(test)]
pub(crate) fn rows(rows: &[&[(&str, &str)]]) -> QueryResult {
    let bindings = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|(var, value)| {
                    (
                        var.to_string(),
                        Term {
                            kind: "literal".into(),
                            value: value.to_string(),
                        },
                    )
                })
                .collect()
        })
        .collect();
    QueryResult {
        results: Results { bindings },
    }
}
