use serde::{Deserialize, Serialize};
use std::fmt;

/// The prioritization models a feature can be scored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Model {
    Rice,
    Moscow,
    ValueVsEffort,
    Kano,
    Ice,
    WeightedScoring,
}

/// A numeric input field with its accepted range and form default.
///
/// `max` of `None` means the field is unbounded above (e.g. effort).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub min: i64,
    pub max: Option<i64>,
    pub default: i64,
}

impl FieldSpec {
    const fn bounded(name: &'static str, min: i64, max: i64, default: i64) -> Self {
        Self { name, min, max: Some(max), default }
    }

    const fn at_least(name: &'static str, min: i64, default: i64) -> Self {
        Self { name, min, max: None, default }
    }

    pub fn contains(&self, value: i64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value <= max)
    }

    /// Range in the form shown to users: "1..=5" or ">=1"
    pub fn range_label(&self) -> String {
        match self.max {
            Some(max) => format!("{}..={}", self.min, max),
            None => format!(">={}", self.min),
        }
    }
}

const RICE_FIELDS: &[FieldSpec] = &[
    FieldSpec::bounded("reach", 0, 1000, 100),
    FieldSpec::bounded("impact", 1, 5, 3),
    FieldSpec::bounded("confidence", 1, 100, 80),
    FieldSpec::at_least("effort", 1, 10),
];

const VALUE_VS_EFFORT_FIELDS: &[FieldSpec] = &[
    FieldSpec::at_least("value", 1, 10),
    FieldSpec::at_least("effort", 1, 10),
];

const KANO_FIELDS: &[FieldSpec] = &[
    FieldSpec::bounded("satisfaction", 1, 5, 1),
    FieldSpec::bounded("dissatisfaction", 1, 5, 1),
];

const ICE_FIELDS: &[FieldSpec] = &[
    FieldSpec::bounded("impact", 1, 10, 1),
    FieldSpec::bounded("confidence", 1, 10, 1),
    FieldSpec::bounded("ease", 1, 10, 1),
];

const WEIGHTED_SCORING_FIELDS: &[FieldSpec] = &[
    FieldSpec::bounded("weight", 1, 10, 1),
    FieldSpec::bounded("score", 1, 10, 1),
];

/// MoSCoW buckets in rank order (rank 1 first).
pub const MOSCOW_LABELS: [&str; 4] = ["Must Have", "Should Have", "Could Have", "Won't Have"];

impl Model {
    pub const ALL: [Model; 6] = [
        Model::Rice,
        Model::Moscow,
        Model::ValueVsEffort,
        Model::Kano,
        Model::Ice,
        Model::WeightedScoring,
    ];

    /// Human-facing label, also written to the "Model" column of exports.
    pub fn label(&self) -> &'static str {
        match self {
            Model::Rice => "RICE",
            Model::Moscow => "MoSCoW",
            Model::ValueVsEffort => "Value vs Effort",
            Model::Kano => "KANO Model",
            Model::Ice => "ICE",
            Model::WeightedScoring => "Weighted Scoring",
        }
    }

    /// Machine tag used in feature files, config and CLI flags.
    pub fn tag(&self) -> &'static str {
        match self {
            Model::Rice => "rice",
            Model::Moscow => "moscow",
            Model::ValueVsEffort => "value_vs_effort",
            Model::Kano => "kano",
            Model::Ice => "ice",
            Model::WeightedScoring => "weighted_scoring",
        }
    }

    pub fn explanation(&self) -> &'static str {
        match self {
            Model::Rice => "The RICE model helps prioritize features based on Reach, Impact, Confidence, and Effort.",
            Model::Moscow => "The MoSCoW model prioritizes based on Must Have, Should Have, Could Have, and Won't Have.",
            Model::ValueVsEffort => "The Value vs Effort model ranks features based on their value to the business versus the effort required.",
            Model::Kano => "The KANO model evaluates features based on customer satisfaction and dissatisfaction.",
            Model::Ice => "The ICE model helps prioritize based on Impact, Confidence, and Ease of implementation.",
            Model::WeightedScoring => "The Weighted Scoring model assigns a score based on different weighted factors to rank features.",
        }
    }

    /// Numeric inputs the model takes. MoSCoW has none; it takes a label.
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            Model::Rice => RICE_FIELDS,
            Model::Moscow => &[],
            Model::ValueVsEffort => VALUE_VS_EFFORT_FIELDS,
            Model::Kano => KANO_FIELDS,
            Model::Ice => ICE_FIELDS,
            Model::WeightedScoring => WEIGHTED_SCORING_FIELDS,
        }
    }

    /// Parse a model from its tag, its label, or the short "KANO" alias.
    /// Case-insensitive; surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Model::ALL
            .into_iter()
            .find(|m| s.eq_ignore_ascii_case(m.tag()) || s.eq_ignore_ascii_case(m.label()))
            .or_else(|| s.eq_ignore_ascii_case("kano").then_some(Model::Kano))
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Typed inputs for one feature, one variant per model.
///
/// Numeric fields are signed so out-of-range values reach the calculator
/// unchanged when validation is skipped.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ModelInputs {
    Rice {
        reach: i64,
        impact: i64,
        confidence: i64,
        effort: i64,
    },
    Moscow {
        priority: String,
    },
    ValueVsEffort {
        value: i64,
        effort: i64,
    },
    Kano {
        satisfaction: i64,
        dissatisfaction: i64,
    },
    Ice {
        impact: i64,
        confidence: i64,
        ease: i64,
    },
    WeightedScoring {
        weight: i64,
        score: i64,
    },
}

impl ModelInputs {
    pub fn model(&self) -> Model {
        match self {
            ModelInputs::Rice { .. } => Model::Rice,
            ModelInputs::Moscow { .. } => Model::Moscow,
            ModelInputs::ValueVsEffort { .. } => Model::ValueVsEffort,
            ModelInputs::Kano { .. } => Model::Kano,
            ModelInputs::Ice { .. } => Model::Ice,
            ModelInputs::WeightedScoring { .. } => Model::WeightedScoring,
        }
    }

    /// Numeric values paired with their field names, in `Model::fields` order.
    pub fn numeric_values(&self) -> Vec<(&'static str, i64)> {
        match *self {
            ModelInputs::Rice { reach, impact, confidence, effort } => vec![
                ("reach", reach),
                ("impact", impact),
                ("confidence", confidence),
                ("effort", effort),
            ],
            ModelInputs::Moscow { .. } => Vec::new(),
            ModelInputs::ValueVsEffort { value, effort } => vec![("value", value), ("effort", effort)],
            ModelInputs::Kano { satisfaction, dissatisfaction } => vec![
                ("satisfaction", satisfaction),
                ("dissatisfaction", dissatisfaction),
            ],
            ModelInputs::Ice { impact, confidence, ease } => {
                vec![("impact", impact), ("confidence", confidence), ("ease", ease)]
            }
            ModelInputs::WeightedScoring { weight, score } => vec![("weight", weight), ("score", score)],
        }
    }
}
