pub mod session;

pub use session::{run_session, SessionOutcome};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::scoring::{self, validate_inputs, InvalidInputError, ModelInputs};
use crate::table::{ResultRow, ResultTable};

/// A feature as entered by the user: a name plus the chosen model's inputs.
///
/// Example YAML:
/// ```yaml
/// name: Dark mode
/// description: Let users switch to a dark palette
/// model: rice
/// reach: 200
/// impact: 4
/// confidence: 90
/// effort: 20
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeatureInput {
    pub name: String,

    /// Free text, only used when asking for a model suggestion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub inputs: ModelInputs,
}

impl FeatureInput {
    pub fn new(name: impl Into<String>, inputs: ModelInputs) -> Self {
        Self {
            name: name.into(),
            description: None,
            inputs,
        }
    }

    /// Score this feature into a result row tagged with its model.
    pub fn score(&self) -> Result<ResultRow, InvalidInputError> {
        let priority = scoring::score(&self.inputs)?;
        Ok(ResultRow::new(&self.name, self.inputs.model(), priority))
    }
}

/// Top-level layout of a feature file.
///
/// Entries stay untyped here and are converted one at a time, so a malformed
/// feature is reported on its own instead of rejecting the whole file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FeatureFile {
    #[serde(default)]
    pub features: Vec<serde_json::Value>,
}

/// Features read from a file, each with its position in the file, plus one
/// error per entry that could not be read.
#[derive(Debug, Default)]
pub struct LoadedFeatures {
    pub entries: Vec<(usize, FeatureInput)>,
    pub errors: Vec<String>,
}

impl LoadedFeatures {
    pub fn inputs(&self) -> impl Iterator<Item = &FeatureInput> {
        self.entries.iter().map(|(_, feature)| feature)
    }

    /// Number of entries in the file, readable or not
    pub fn total(&self) -> usize {
        self.entries.len() + self.errors.len()
    }
}

impl FeatureFile {
    /// Convert every entry independently.
    pub fn into_loaded(self) -> LoadedFeatures {
        let mut loaded = LoadedFeatures::default();

        for (i, value) in self.features.into_iter().enumerate() {
            let name = value
                .get("name")
                .and_then(|v| v.as_str())
                .map(str::to_string);

            match serde_json::from_value::<FeatureInput>(value) {
                Ok(feature) => loaded.entries.push((i, feature)),
                Err(e) => {
                    let path = match name {
                        Some(name) => format!("features[{}] ({})", i, name),
                        None => format!("features[{}]", i),
                    };
                    tracing::debug!("Could not read {}: {}", path, e);
                    loaded.errors.push(format!("{}: {}", path, e));
                }
            }
        }

        loaded
    }
}

/// Load features from a YAML file, or JSON when the extension is `.json`.
///
/// Fails only when the file is unreadable or is not a feature list at all.
/// Individual entries that do not match a model are listed in `errors`.
pub fn load_features(path: &Path) -> Result<LoadedFeatures> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read feature file at {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let file: FeatureFile = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse features: invalid JSON in {}", path.display()))?
    } else {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse features: invalid YAML in {}", path.display()))?
    };

    let loaded = file.into_loaded();
    tracing::debug!(
        "Loaded {} features from {} ({} unreadable)",
        loaded.entries.len(),
        path.display(),
        loaded.errors.len()
    );
    Ok(loaded)
}

/// Outcome of scoring a batch: the rows that scored, and why the rest did not.
#[derive(Debug, Default)]
pub struct ScoringReport {
    pub table: ResultTable,
    pub errors: Vec<String>,
}

impl ScoringReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Validate and score every feature independently.
///
/// A feature that fails validation or scoring is reported in `errors` and left
/// out of the table; the remaining features still score, in input order.
pub fn score_features(features: &[FeatureInput], validate: bool) -> ScoringReport {
    score_entries(features.iter().enumerate(), validate)
}

/// Score a loaded file. Entries that could not be read are reported first.
pub fn score_loaded(loaded: &LoadedFeatures, validate: bool) -> ScoringReport {
    let mut report = score_entries(loaded.entries.iter().map(|(i, f)| (*i, f)), validate);
    let mut errors = loaded.errors.clone();
    errors.append(&mut report.errors);
    report.errors = errors;
    report
}

fn score_entries<'a>(
    entries: impl IntoIterator<Item = (usize, &'a FeatureInput)>,
    validate: bool,
) -> ScoringReport {
    let mut report = ScoringReport::default();

    for (i, feature) in entries {
        let path = format!("features[{}]", i);

        if validate {
            if let Err(errors) = validate_inputs(&path, &feature.inputs) {
                tracing::debug!("Skipping '{}': {} invalid fields", feature.name, errors.len());
                report.errors.extend(errors);
                continue;
            }
        }

        match feature.score() {
            Ok(row) => {
                tracing::debug!("Scored '{}' with {}: {}", row.feature_name, row.model, row.priority);
                report.table.append(row);
            }
            Err(e) => {
                tracing::warn!("Could not score '{}': {}", feature.name, e);
                report.errors.push(format!("{} ({}): {}", path, feature.name, e));
            }
        }
    }

    report
}

/// Descriptions to send to the suggestion service; falls back to the name.
pub fn descriptions<'a>(features: impl IntoIterator<Item = &'a FeatureInput>) -> Vec<String> {
    features
        .into_iter()
        .map(|f| match f.description.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => d.to_string(),
            _ => f.name.clone(),
        })
        .collect()
}
