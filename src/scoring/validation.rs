use super::model::ModelInputs;

/// Check every numeric input against the documented range for its model.
/// Returns all violations at once (not just the first), each prefixed with `path`.
///
/// This is input-surface validation; the calculator itself accepts any value.
pub fn validate_inputs(path: &str, inputs: &ModelInputs) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (spec, (name, value)) in inputs.model().fields().iter().zip(inputs.numeric_values()) {
        debug_assert_eq!(spec.name, name);
        if !spec.contains(value) {
            errors.push(format!(
                "{}.{}: {} is outside {}",
                path,
                name,
                value,
                spec.range_label()
            ));
        }
    }

    if let ModelInputs::Moscow { priority } = inputs {
        if priority.trim().is_empty() {
            errors.push(format!("{}.priority: must not be empty", path));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
