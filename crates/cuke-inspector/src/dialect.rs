//! Localised Gherkin step keywords.
//!
//! The table is the official `gherkin-languages.json`, the same one the
//! `gherkin` parser ships, embedded and parsed on first use.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::Deserialize;
use tracing::error;

const LANGUAGES: &str = include_str!("languages.json");

#[derive(Debug, Deserialize)]
struct RawDialect {
    name: String,
    native: String,
    given: Vec<String>,
    when: Vec<String>,
    then: Vec<String>,
    and: Vec<String>,
    but: Vec<String>,
    #[serde(rename = "scenarioOutline")]
    scenario_outline: Vec<String>,
}

/// Step keywords of one Gherkin language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    /// English name of the language.
    pub name: String,
    /// Native name of the language.
    pub native: String,
    step_keywords: Vec<String>,
    outline_keywords: Vec<String>,
}

impl Dialect {
    /// Every distinct step keyword, trimmed, in table order.
    #[must_use]
    pub fn step_keywords(&self) -> &[String] {
        &self.step_keywords
    }

    /// Whether `keyword` is a step keyword of this language.
    #[must_use]
    pub fn is_step_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.trim();
        self.step_keywords.iter().any(|known| known == keyword)
    }

    /// Whether `keyword` declares a scenario outline in this language.
    #[must_use]
    pub fn is_outline_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.trim();
        self.outline_keywords.iter().any(|known| known == keyword)
    }
}

impl From<RawDialect> for Dialect {
    fn from(raw: RawDialect) -> Self {
        let mut step_keywords: Vec<String> = Vec::new();
        for keyword in raw
            .given
            .iter()
            .chain(&raw.when)
            .chain(&raw.then)
            .chain(&raw.and)
            .chain(&raw.but)
            .map(|keyword| keyword.trim())
        {
            if !step_keywords.iter().any(|known| known == keyword) {
                step_keywords.push(keyword.to_string());
            }
        }
        Self {
            name: raw.name,
            native: raw.native,
            step_keywords,
            outline_keywords: raw
                .scenario_outline
                .iter()
                .map(|keyword| keyword.trim().to_string())
                .collect(),
        }
    }
}

static DIALECTS: LazyLock<BTreeMap<String, Dialect>> = LazyLock::new(|| {
    match serde_json::from_str::<BTreeMap<String, RawDialect>>(LANGUAGES) {
        Ok(raw) => raw
            .into_iter()
            .map(|(language, dialect)| (language, Dialect::from(dialect)))
            .collect(),
        Err(err) => {
            error!(error = %err, "embedded Gherkin language table is malformed");
            BTreeMap::new()
        }
    }
});

/// Look up the dialect for a language tag such as `en` or `de`.
#[must_use]
pub fn dialect(language: &str) -> Option<&'static Dialect> {
    DIALECTS.get(language.trim())
}

/// Canonical step keywords for a language, or `None` when it is unknown.
///
/// # Examples
/// ```
/// use cuke_inspector::dialect::step_keywords;
///
/// let keywords = step_keywords("de").unwrap_or_default();
/// assert!(keywords.iter().any(|keyword| keyword == "Angenommen"));
/// assert!(step_keywords("tlh-unknown").is_none());
/// ```
#[must_use]
pub fn step_keywords(language: &str) -> Option<&'static [String]> {
    dialect(language).map(Dialect::step_keywords)
}

/// Language tags available in the embedded table.
pub fn languages() -> impl Iterator<Item = &'static str> {
    DIALECTS.keys().map(String::as_str)
}
