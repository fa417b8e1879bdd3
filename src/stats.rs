use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

use crate::layout::WeightedItem;

/// Only the first repositories are considered, matching the upstream API
/// budget of one language request per repository.
pub const MAX_REPOSITORIES: usize = 50;
pub const DEFAULT_LIMIT: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("language data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported language data shape: expected a repository list or a language map")]
    UnsupportedShape,
    #[error("no repositories found")]
    NoRepositories,
    #[error("no language data found")]
    NoLanguageData,
}

impl StatsError {
    /// Message shown on the error card.
    pub fn card_message(&self, user: &str) -> String {
        match self {
            StatsError::NoRepositories => format!("No repositories found for user '{user}'"),
            StatsError::NoLanguageData => format!("No language data found for user '{user}'"),
            StatsError::Json(_) | StatsError::UnsupportedShape => {
                "Unable to read language data".to_string()
            }
        }
    }
}

/// Per-repository byte counts keyed by language name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RepoLanguages {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub languages: BTreeMap<String, u64>,
}

impl RepoLanguages {
    pub fn from_map(languages: BTreeMap<String, u64>) -> Self {
        Self {
            name: None,
            fork: false,
            languages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageStat {
    pub name: String,
    pub bytes: u64,
    pub percentage: f32,
}

impl LanguageStat {
    /// Layout input weighted by share of total bytes.
    pub fn to_weighted_item(&self) -> WeightedItem {
        WeightedItem::new(self.name.clone(), self.percentage)
    }
}

/// Accepts a list of repository records (`{"name", "fork", "languages"}`),
/// a list of bare language maps, or a single language map.
pub fn parse_repositories(input: &str) -> Result<Vec<RepoLanguages>, StatsError> {
    let value: Value = serde_json::from_str(input)?;
    let repos = match value {
        Value::Array(entries) => entries
            .into_iter()
            .map(parse_repository)
            .collect::<Result<Vec<_>, _>>()?,
        Value::Object(_) => vec![parse_repository(value)?],
        _ => return Err(StatsError::UnsupportedShape),
    };
    if repos.is_empty() {
        return Err(StatsError::NoRepositories);
    }
    Ok(repos)
}

fn parse_repository(value: Value) -> Result<RepoLanguages, StatsError> {
    let is_record = matches!(&value, Value::Object(map) if map.contains_key("languages"));
    match value {
        Value::Object(_) if is_record => Ok(serde_json::from_value(value)?),
        Value::Object(_) => Ok(RepoLanguages::from_map(serde_json::from_value(value)?)),
        _ => Err(StatsError::UnsupportedShape),
    }
}

/// Sum bytes per language over non-fork repositories, keep the `limit`
/// largest, and attach each one's share of the kept total.
pub fn aggregate_languages(
    repos: &[RepoLanguages],
    limit: usize,
) -> Result<Vec<LanguageStat>, StatsError> {
    if repos.is_empty() {
        return Err(StatsError::NoRepositories);
    }

    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    let mut considered = 0usize;
    for repo in repos.iter().filter(|repo| !repo.fork).take(MAX_REPOSITORIES) {
        considered += 1;
        for (language, bytes) in &repo.languages {
            *totals.entry(language.as_str()).or_default() += bytes;
        }
    }

    let mut sorted: Vec<(&str, u64)> = totals.into_iter().filter(|(_, b)| *b > 0).collect();
    sorted.sort_by(|a, b| match b.1.cmp(&a.1) {
        Ordering::Equal => a.0.cmp(b.0),
        other => other,
    });
    sorted.truncate(limit);

    if sorted.is_empty() {
        return Err(StatsError::NoLanguageData);
    }

    let total: u64 = sorted.iter().map(|(_, bytes)| bytes).sum();
    debug!(
        repositories = considered,
        languages = sorted.len(),
        total_bytes = total,
        "aggregated language usage"
    );
    Ok(sorted
        .into_iter()
        .map(|(name, bytes)| LanguageStat {
            name: name.to_string(),
            bytes,
            percentage: (bytes as f64 / total as f64 * 100.0) as f32,
        })
        .collect())
}
