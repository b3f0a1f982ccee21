use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use super::FeatureInput;
use crate::config::Config;
use crate::scoring::{FieldSpec, Model, ModelInputs, MOSCOW_LABELS};
use crate::suggest::{suggest_best_effort, ModelSuggester};
use crate::table::ResultTable;

/// Line-oriented prompts over any reader/writer pair (stdin/stdout in practice).
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line).context("Failed to write output")
    }

    /// Prompt user with a message and return their trimmed input.
    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush stdout")?;
        let mut input = String::new();
        let read = self
            .input
            .read_line(&mut input)
            .context("Failed to read input")?;
        if read == 0 {
            bail!("Input closed before the session finished");
        }
        Ok(input.trim().to_string())
    }

    /// Prompt user with a message and a default value. Returns default if input is empty.
    fn prompt_with_default(&mut self, message: &str, default: &str) -> Result<String> {
        let input = self.prompt(&format!("{} [{}]: ", message, default))?;
        if input.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(input)
        }
    }

    /// Prompt user with a yes/no question. Returns bool based on input and default.
    fn prompt_yes_no(&mut self, message: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "Y/n" } else { "y/N" };
        let input = self.prompt(&format!("{} [{}]: ", message, hint))?.to_lowercase();
        if input.is_empty() {
            Ok(default_yes)
        } else {
            Ok(input == "y" || input == "yes")
        }
    }

    /// Prompt for a numeric field until the answer is an integer within its range.
    fn prompt_field(&mut self, spec: &FieldSpec) -> Result<i64> {
        let message = format!("  {} ({})", spec.name, spec.range_label());
        loop {
            let input = self.prompt_with_default(&message, &spec.default.to_string())?;
            match input.parse::<i64>() {
                Ok(v) if spec.contains(v) => break Ok(v),
                Ok(_) => self.say(&format!("  Invalid: must be {}. Try again.", spec.range_label()))?,
                Err(_) => self.say("  Invalid: must be a whole number. Try again.")?,
            }
        }
    }

    /// Prompt for one of `options` by number or exact text. Empty input picks `default`.
    fn prompt_choice(&mut self, message: &str, options: &[&str], default: usize) -> Result<usize> {
        for (i, option) in options.iter().enumerate() {
            self.say(&format!("  {}) {}", i + 1, option))?;
        }
        loop {
            let input = self.prompt_with_default(message, &(default + 1).to_string())?;
            if let Ok(n) = input.parse::<usize>() {
                if (1..=options.len()).contains(&n) {
                    break Ok(n - 1);
                }
            } else if let Some(i) = options.iter().position(|o| o.eq_ignore_ascii_case(&input)) {
                break Ok(i);
            }
            self.say(&format!("  Invalid: pick 1-{}. Try again.", options.len()))?;
        }
    }
}

/// Collect feature names and optional descriptions until the user stops.
pub fn collect_features<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
) -> Result<Vec<(String, Option<String>)>> {
    let mut features = Vec::new();
    loop {
        let number = features.len() + 1;
        let name = loop {
            let n = p.prompt(&format!("Feature {} name: ", number))?;
            if !n.is_empty() {
                break n;
            }
            p.say("  Feature name is required.")?;
        };
        let description = p.prompt(&format!("Feature {} description (optional): ", number))?;
        let description = (!description.is_empty()).then_some(description);
        features.push((name, description));

        if !p.prompt_yes_no("Add another feature?", false)? {
            break;
        }
    }
    Ok(features)
}

/// Let the user pick a model, showing its explanation afterwards.
pub fn choose_model<R: BufRead, W: Write>(p: &mut Prompter<R, W>, default: Option<Model>) -> Result<Model> {
    let labels: Vec<&str> = Model::ALL.iter().map(|m| m.label()).collect();
    let default_idx = default
        .and_then(|d| Model::ALL.iter().position(|m| *m == d))
        .unwrap_or(0);
    let idx = p.prompt_choice("Select prioritization model", &labels, default_idx)?;
    let model = Model::ALL[idx];
    p.say(&format!("Model explanation: {}", model.explanation()))?;
    Ok(model)
}

/// Prompt for every input the model needs, each checked against its range.
pub fn prompt_inputs<R: BufRead, W: Write>(p: &mut Prompter<R, W>, model: Model) -> Result<ModelInputs> {
    let fields = model.fields();
    let mut values = Vec::with_capacity(fields.len());
    for spec in fields {
        values.push(p.prompt_field(spec)?);
    }

    let inputs = match model {
        Model::Rice => ModelInputs::Rice {
            reach: values[0],
            impact: values[1],
            confidence: values[2],
            effort: values[3],
        },
        Model::Moscow => {
            let idx = p.prompt_choice("  Select priority", &MOSCOW_LABELS, 0)?;
            ModelInputs::Moscow {
                priority: MOSCOW_LABELS[idx].to_string(),
            }
        }
        Model::ValueVsEffort => ModelInputs::ValueVsEffort {
            value: values[0],
            effort: values[1],
        },
        Model::Kano => ModelInputs::Kano {
            satisfaction: values[0],
            dissatisfaction: values[1],
        },
        Model::Ice => ModelInputs::Ice {
            impact: values[0],
            confidence: values[1],
            ease: values[2],
        },
        Model::WeightedScoring => ModelInputs::WeightedScoring {
            weight: values[0],
            score: values[1],
        },
    };
    Ok(inputs)
}

/// What a finished session produced.
#[derive(Debug, Default)]
pub struct SessionOutcome {
    pub table: ResultTable,
    /// Set when the user asked for an export and writing it failed
    pub export_error: Option<String>,
}

/// Run an interactive prioritization session.
///
/// Features are named first, then (optionally) a model suggestion is requested,
/// then one model is chosen and each feature's inputs are entered and scored
/// immediately. The finished table is shown and can be exported. A failed
/// export is reported to the user and returned in the outcome, not as `Err`.
pub async fn run_session<R, W, S>(
    p: &mut Prompter<R, W>,
    config: &Config,
    preselected: Option<Model>,
    suggester: Option<(&S, Duration)>,
) -> Result<SessionOutcome>
where
    R: BufRead,
    W: Write,
    S: ModelSuggester,
{
    p.say("Feature Prioritization Session")?;
    p.say("==============================")?;
    p.say("")?;

    let entries = collect_features(p)?;

    if let Some((suggester, timeout)) = suggester {
        p.say("")?;
        if p.prompt_yes_no("Ask for a model suggestion?", false)? {
            let descriptions: Vec<String> = entries
                .iter()
                .map(|(name, description)| description.clone().unwrap_or_else(|| name.clone()))
                .collect();
            let outcome = suggest_best_effort(suggester, &descriptions, timeout).await;
            p.say(&outcome.to_string())?;
        }
    }

    p.say("")?;
    let model = choose_model(p, preselected.or(config.default_model))?;

    let mut table = ResultTable::new();
    for (name, description) in entries {
        p.say("")?;
        p.say(&format!("{} ({})", name, model.label()))?;
        let feature = FeatureInput {
            name,
            description,
            inputs: prompt_inputs(p, model)?,
        };
        match feature.score() {
            Ok(row) => {
                p.say(&format!(
                    "  {} priority for \"{}\": {}",
                    row.model.label(),
                    row.feature_name,
                    crate::output::format_priority(&row.priority)
                ))?;
                table.append(row);
            }
            Err(e) => p.say(&format!("  Could not score \"{}\": {}", feature.name, e))?,
        }
    }

    if table.is_empty() {
        return Ok(SessionOutcome { table, export_error: None });
    }

    p.say("")?;
    p.say("Prioritization Results")?;
    let rows = table.view(config.sort);
    p.say(&crate::output::format_results_table(&rows, false))?;
    p.say("")?;

    let mut export_error = None;
    if p.prompt_yes_no("Export results to CSV?", false)? {
        let default_path = crate::export::resolve_export_path(None, config);
        let path = p.prompt_with_default("Export path", &default_path.display().to_string())?;
        let path = PathBuf::from(path);
        match crate::export::write_csv(&path, &table, config.sort) {
            Ok(()) => p.say(&format!("Results written to {}", path.display()))?,
            Err(e) => {
                let msg = format!("{:#}", e);
                p.say(&format!("Failed to export: {}", msg))?;
                export_error = Some(msg);
            }
        }
    }

    Ok(SessionOutcome { table, export_error })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Priority;
    use crate::suggest::NoSuggester;
    use std::io::Cursor;

    fn prompter(script: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    fn output(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_output()).unwrap()
    }

    #[test]
    fn test_prompt_field_retries_until_in_range() {
        let mut p = prompter("9\nabc\n4\n");
        let impact = Model::Rice.fields()[1];
        assert_eq!(p.prompt_field(&impact).unwrap(), 4);
        let out = output(p);
        assert!(out.contains("Invalid: must be 1..=5"));
        assert!(out.contains("Invalid: must be a whole number"));
    }

    #[test]
    fn test_prompt_field_default() {
        let mut p = prompter("\n");
        let reach = Model::Rice.fields()[0];
        assert_eq!(p.prompt_field(&reach).unwrap(), 100);
    }

    #[test]
    fn test_prompt_choice_by_number_and_name() {
        let mut p = prompter("3\n");
        assert_eq!(p.prompt_choice("Pick", &MOSCOW_LABELS, 0).unwrap(), 2);

        let mut p = prompter("should have\n");
        assert_eq!(p.prompt_choice("Pick", &MOSCOW_LABELS, 0).unwrap(), 1);

        let mut p = prompter("7\n\n");
        assert_eq!(p.prompt_choice("Pick", &MOSCOW_LABELS, 3).unwrap(), 3);
    }

    #[test]
    fn test_closed_input_is_error() {
        let mut p = prompter("");
        assert!(p.prompt("Name: ").is_err());
    }

    #[test]
    fn test_choose_model_uses_default() {
        let mut p = prompter("\n");
        assert_eq!(choose_model(&mut p, Some(Model::Ice)).unwrap(), Model::Ice);
        assert!(output(p).contains(Model::Ice.explanation()));
    }

    #[test]
    fn test_prompt_inputs_moscow() {
        let mut p = prompter("3\n");
        assert_eq!(
            prompt_inputs(&mut p, Model::Moscow).unwrap(),
            ModelInputs::Moscow { priority: "Could Have".to_string() }
        );
    }

    /// One scripted answer per line
    fn script(lines: &[&str]) -> String {
        lines.iter().map(|line| format!("{}\n", line)).collect()
    }

    #[tokio::test]
    async fn test_run_session_rice() {
        let answers = script(&[
            // Feature A, no description, add another
            "Feature A",
            "",
            "y",
            // Feature B with a description, stop adding
            "Feature B",
            "Faster search",
            "n",
            // RICE
            "1",
            "200",
            "4",
            "90",
            "20",
            // Defaults for Feature B: 100, 3, 80, 10
            "",
            "",
            "",
            "",
            // No export
            "n",
        ]);
        let mut p = prompter(&answers);

        let outcome = run_session::<_, _, NoSuggester>(&mut p, &Config::default(), None, None)
            .await
            .unwrap();
        let table = outcome.table;

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].feature_name, "Feature A");
        assert_eq!(table.rows()[0].priority, Priority::Real(36.0));
        assert_eq!(table.rows()[1].feature_name, "Feature B");
        assert_eq!(table.rows()[1].priority, Priority::Real(24.0));
        assert!(outcome.export_error.is_none());

        let out = output(p);
        assert!(out.contains("RICE priority for \"Feature A\": 36.0"));
        assert!(out.contains("Prioritization Results"));
    }

    #[tokio::test]
    async fn test_run_session_suggestion_failure_does_not_block() {
        // One feature, ask for a suggestion, then MoSCoW "Must Have", no export
        let answers = script(&["Offline mode", "", "n", "y", "2", "1", "n"]);
        let mut p = prompter(&answers);

        let outcome = run_session(
            &mut p,
            &Config::default(),
            None,
            Some((&NoSuggester, Duration::from_secs(1))),
        )
        .await
        .unwrap();

        assert_eq!(
            outcome.table.rows()[0].priority,
            Priority::Label("Must Have".to_string())
        );
        assert!(output(p).contains("Model suggestion unavailable"));
    }

    #[tokio::test]
    async fn test_run_session_exports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let path_answer = path.display().to_string();
        // Weighted Scoring with weight 5 and score 8, then export
        let answers = script(&["Bulk edit", "", "n", "6", "5", "8", "y", &path_answer]);
        let mut p = prompter(&answers);

        let outcome = run_session::<_, _, NoSuggester>(&mut p, &Config::default(), None, None)
            .await
            .unwrap();
        assert!(outcome.export_error.is_none());

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Feature Name,Model,Priority\nBulk edit,Weighted Scoring,40.0\n");
    }

    #[tokio::test]
    async fn test_run_session_export_failure_keeps_table() {
        let dir = tempfile::tempdir().unwrap();
        // An existing directory cannot be replaced by the export file
        let path_answer = dir.path().display().to_string();
        let answers = script(&["Bulk edit", "", "n", "6", "5", "8", "y", &path_answer]);
        let mut p = prompter(&answers);

        let outcome = run_session::<_, _, NoSuggester>(&mut p, &Config::default(), None, None)
            .await
            .unwrap();

        assert_eq!(outcome.table.len(), 1);
        assert!(outcome.export_error.is_some());
        assert!(output(p).contains("Failed to export"));
    }
}
