use super::error::InvalidInputError;
use super::model::{Model, ModelInputs, MOSCOW_LABELS};
use super::priority::Priority;

/// RICE: reach x impact x (confidence / 100) / effort.
///
/// Confidence is a percentage. The integer product is formed before dividing
/// so whole-number inputs give exact results.
pub fn rice(reach: i64, impact: i64, confidence: i64, effort: i64) -> Result<f64, InvalidInputError> {
    if effort == 0 {
        return Err(InvalidInputError::DivisionByZero {
            model: Model::Rice,
            field: "effort",
        });
    }
    let product = reach as f64 * impact as f64 * confidence as f64;
    Ok(product / 100.0 / effort as f64)
}

pub fn value_vs_effort(value: i64, effort: i64) -> Result<f64, InvalidInputError> {
    if effort == 0 {
        return Err(InvalidInputError::DivisionByZero {
            model: Model::ValueVsEffort,
            field: "effort",
        });
    }
    Ok(value as f64 / effort as f64)
}

/// Rank of a MoSCoW bucket, 1 (Must Have) through 4 (Won't Have).
/// Unrecognized labels fall back to 4.
pub fn moscow_rank(label: &str) -> u8 {
    // Accept the typographic apostrophe some keyboards insert
    let label = if label == "Won\u{2019}t Have" { "Won't Have" } else { label };
    MOSCOW_LABELS
        .iter()
        .position(|l| *l == label)
        .map(|i| i as u8 + 1)
        .unwrap_or(4)
}

pub fn kano(satisfaction: i64, dissatisfaction: i64) -> f64 {
    satisfaction as f64 - dissatisfaction as f64
}

pub fn ice(impact: i64, confidence: i64, ease: i64) -> f64 {
    impact as f64 * confidence as f64 * ease as f64 / 100.0
}

pub fn weighted_score(weight: i64, score: i64) -> f64 {
    weight as f64 * score as f64
}

/// Compute the priority for one feature's inputs.
pub fn score(inputs: &ModelInputs) -> Result<Priority, InvalidInputError> {
    let priority = match inputs {
        ModelInputs::Rice { reach, impact, confidence, effort } => {
            Priority::Real(rice(*reach, *impact, *confidence, *effort)?)
        }
        ModelInputs::Moscow { priority } => Priority::Label(priority.clone()),
        ModelInputs::ValueVsEffort { value, effort } => Priority::Real(value_vs_effort(*value, *effort)?),
        ModelInputs::Kano { satisfaction, dissatisfaction } => {
            Priority::Real(kano(*satisfaction, *dissatisfaction))
        }
        ModelInputs::Ice { impact, confidence, ease } => Priority::Real(ice(*impact, *confidence, *ease)),
        ModelInputs::WeightedScoring { weight, score } => Priority::Real(weighted_score(*weight, *score)),
    };
    Ok(priority)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rice_example() {
        assert_eq!(rice(100, 3, 80, 10).unwrap(), 24.0);
        assert_eq!(rice(200, 4, 90, 20).unwrap(), 36.0);
    }

    #[test]
    fn test_rice_normalizes_confidence() {
        // 100% confidence leaves reach x impact / effort untouched
        assert_eq!(rice(10, 5, 100, 2).unwrap(), 25.0);
        // Not the naive formula that treats confidence as a fraction
        assert_ne!(rice(10, 5, 50, 1).unwrap(), 2500.0);
        assert_eq!(rice(10, 5, 50, 1).unwrap(), 25.0);
    }

    #[test]
    fn test_rice_zero_effort() {
        let err = rice(100, 3, 80, 0).unwrap_err();
        assert_eq!(
            err,
            InvalidInputError::DivisionByZero { model: Model::Rice, field: "effort" }
        );
        assert_eq!(err.to_string(), "RICE: effort must not be zero");
    }

    #[test]
    fn test_rice_out_of_range_is_arithmetic() {
        // No clamping: reach above 1000 and negative effort are plain operands
        assert_eq!(rice(2000, 1, 100, 1).unwrap(), 2000.0);
        assert_eq!(rice(100, 1, 100, -2).unwrap(), -50.0);
    }

    #[test]
    fn test_value_vs_effort() {
        assert_eq!(value_vs_effort(10, 10).unwrap(), 1.0);
        assert_eq!(value_vs_effort(20, 5).unwrap(), 4.0);
        assert_eq!(value_vs_effort(1, 4).unwrap(), 0.25);
    }

    #[test]
    fn test_value_vs_effort_zero_effort() {
        let err = value_vs_effort(10, 0).unwrap_err();
        assert!(matches!(
            err,
            InvalidInputError::DivisionByZero { model: Model::ValueVsEffort, .. }
        ));
    }

    #[test]
    fn test_moscow_rank() {
        assert_eq!(moscow_rank("Must Have"), 1);
        assert_eq!(moscow_rank("Should Have"), 2);
        assert_eq!(moscow_rank("Could Have"), 3);
        assert_eq!(moscow_rank("Won't Have"), 4);
        assert_eq!(moscow_rank("Won\u{2019}t Have"), 4);
    }

    #[test]
    fn test_moscow_unknown_label_falls_back_to_lowest() {
        // Fallback, not a failure path
        assert_eq!(moscow_rank("unknown"), 4);
        assert_eq!(moscow_rank(""), 4);
        assert_eq!(moscow_rank("must have"), 4);
    }

    #[test]
    fn test_kano() {
        assert_eq!(kano(5, 1), 4.0);
        assert_eq!(kano(1, 5), -4.0);
        assert_eq!(kano(3, 3), 0.0);
    }

    #[test]
    fn test_ice() {
        assert_eq!(ice(10, 10, 10), 10.0);
        assert_eq!(ice(5, 4, 5), 1.0);
    }

    #[test]
    fn test_weighted_score() {
        assert_eq!(weighted_score(5, 8), 40.0);
        assert_eq!(weighted_score(1, 1), 1.0);
    }

    #[test]
    fn test_score_dispatch() {
        let rice_inputs = ModelInputs::Rice { reach: 200, impact: 4, confidence: 90, effort: 20 };
        assert_eq!(score(&rice_inputs).unwrap(), Priority::Real(36.0));

        let moscow = ModelInputs::Moscow { priority: "Could Have".to_string() };
        assert_eq!(score(&moscow).unwrap(), Priority::Label("Could Have".to_string()));

        let kano_inputs = ModelInputs::Kano { satisfaction: 1, dissatisfaction: 5 };
        assert_eq!(score(&kano_inputs).unwrap(), Priority::Real(-4.0));
    }

    #[test]
    fn test_score_dispatch_zero_effort_never_infinite() {
        let inputs = ModelInputs::ValueVsEffort { value: 5, effort: 0 };
        assert!(score(&inputs).is_err());
    }
}
