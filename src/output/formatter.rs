use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::scoring::{format_decimal, Model, Priority, MOSCOW_LABELS};
use crate::table::ResultRow;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a priority for display: the number, or the MoSCoW label with its rank
pub fn format_priority(priority: &Priority) -> String {
    match priority {
        Priority::Real(v) => format_decimal(*v),
        Priority::Label(label) => format!("{} ({})", label, crate::scoring::moscow_rank(label)),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
pub fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format scored rows as an aligned table: Index, Priority, Model, Feature.
/// The priority column is right-aligned and sized to the widest value.
pub fn format_results_table(rows: &[&ResultRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No features scored.".to_string();
    }

    let priorities: Vec<String> = rows.iter().map(|r| format_priority(&r.priority)).collect();
    let priority_width = priorities
        .iter()
        .map(|p| p.chars().count())
        .max()
        .unwrap_or(0)
        .max("Priority".len());
    let model_width = rows
        .iter()
        .map(|r| r.model.label().len())
        .max()
        .unwrap_or(0)
        .max("Model".len());
    let index_width = 3;
    let separator = "  ";
    let fixed_width = index_width + 1 + priority_width + model_width + separator.len() * 2;

    let term_width = get_terminal_width();

    let header = format!(
        "{:>index_width$} {:>priority_width$}{}{:<model_width$}{}{}",
        "#",
        "Priority",
        separator,
        "Model",
        separator,
        "Feature",
    );
    let mut lines = vec![if use_colors { header.bold().to_string() } else { header }];

    for (idx, (row, priority)) in rows.iter().zip(&priorities).enumerate() {
        let index_str = format!("{:>2}.", idx + 1);
        let priority_padded = format!("{:>width$}", priority, width = priority_width);
        let model_padded = format!("{:<width$}", row.model.label(), width = model_width);

        let name = match term_width {
            Some(width) if width > fixed_width + 10 => truncate_name(&row.feature_name, width - fixed_width),
            // Very narrow terminal, show truncated
            Some(_) => truncate_name(&row.feature_name, 20),
            // No terminal (pipe), don't truncate
            None => row.feature_name.clone(),
        };

        let line = if use_colors {
            format!(
                "{} {}{}{}{}{}",
                index_str.dimmed(),
                priority_padded.bold(),
                separator,
                model_padded.cyan(),
                separator,
                name
            )
        } else {
            format!(
                "{} {}{}{}{}{}",
                index_str, priority_padded, separator, model_padded, separator, name
            )
        };
        lines.push(line);
    }

    lines.join("\n")
}

/// Format rows as tab-separated values for scripting
/// Columns: feature, model, priority (no headers, no colors)
pub fn format_tsv(rows: &[&ResultRow]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}",
                row.feature_name,
                row.model.label(),
                crate::table::delimited::priority_cell(&row.priority)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Describe every model: tag, inputs with ranges and defaults, explanation
pub fn format_model_catalogue(use_colors: bool) -> String {
    Model::ALL
        .iter()
        .map(|model| {
            let title = format!("{} ({})", model.label(), model.tag());
            let mut lines = vec![if use_colors { title.bold().to_string() } else { title }];
            lines.push(format!("  {}", model.explanation()));

            if *model == Model::Moscow {
                lines.push(format!("  priority: one of {}", MOSCOW_LABELS.join(", ")));
            }
            for field in model.fields() {
                lines.push(format!(
                    "  {}: {} (default {})",
                    field.name,
                    field.range_label(),
                    field.default
                ));
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<ResultRow> {
        vec![
            ResultRow::new("Feature A", Model::Rice, Priority::Real(36.0)),
            ResultRow::new("Feature B", Model::Moscow, Priority::Label("Could Have".to_string())),
        ]
    }

    #[test]
    fn test_format_priority() {
        assert_eq!(format_priority(&Priority::Real(36.0)), "36.0");
        assert_eq!(format_priority(&Priority::Real(0.25)), "0.25");
        assert_eq!(format_priority(&Priority::Label("Must Have".to_string())), "Must Have (1)");
        assert_eq!(format_priority(&Priority::Label("Someday".to_string())), "Someday (4)");
    }

    #[test]
    fn test_format_results_table_empty() {
        assert_eq!(format_results_table(&[], false), "No features scored.");
    }

    #[test]
    fn test_format_results_table_rows() {
        let rows = sample_rows();
        let refs: Vec<&ResultRow> = rows.iter().collect();
        let result = format_results_table(&refs, false);
        let lines: Vec<&str> = result.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Priority"));
        assert!(lines[0].contains("Feature"));
        assert!(lines[1].starts_with(" 1."));
        assert!(lines[1].contains("36.0"));
        assert!(lines[1].contains("RICE"));
        assert!(lines[1].contains("Feature A"));
        assert!(lines[2].starts_with(" 2."));
        assert!(lines[2].contains("Could Have (3)"));
        assert!(lines[2].contains("MoSCoW"));
    }

    #[test]
    fn test_format_results_table_right_aligns_priority() {
        let rows = vec![
            ResultRow::new("A", Model::Ice, Priority::Real(10.0)),
            ResultRow::new("B", Model::Ice, Priority::Real(1.0)),
        ];
        let refs: Vec<&ResultRow> = rows.iter().collect();
        let result = format_results_table(&refs, false);
        let lines: Vec<&str> = result.lines().collect();
        let end_a = lines[1].find("10.0").unwrap() + "10.0".len();
        let end_b = lines[2].find("1.0").unwrap() + "1.0".len();
        assert_eq!(end_a, end_b);
    }

    #[test]
    fn test_format_tsv() {
        let rows = sample_rows();
        let refs: Vec<&ResultRow> = rows.iter().collect();
        assert_eq!(
            format_tsv(&refs),
            "Feature A\tRICE\t36.0\nFeature B\tMoSCoW\tCould Have"
        );
        assert_eq!(format_tsv(&[]), "");
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Short", 20), "Short");
        assert_eq!(truncate_name("Exact", 5), "Exact");
        assert_eq!(truncate_name("This is a very long name", 15), "This is a ve...");
        assert_eq!(truncate_name("Hello world", 3), "Hel");
    }

    #[test]
    fn test_model_catalogue_lists_every_model() {
        let catalogue = format_model_catalogue(false);
        for model in Model::ALL {
            assert!(catalogue.contains(model.label()));
            assert!(catalogue.contains(model.explanation()));
        }
        assert!(catalogue.contains("reach: 0..=1000 (default 100)"));
        assert!(catalogue.contains("effort: >=1 (default 10)"));
        assert!(catalogue.contains("priority: one of Must Have, Should Have, Could Have, Won't Have"));
    }
}
