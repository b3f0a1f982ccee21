use anyhow::{bail, Context, Result};

use super::{ResultRow, ResultTable};
use crate::scoring::{format_decimal, Model, Priority};

/// Header line of every export.
pub const HEADER: [&str; 3] = ["Feature Name", "Model", "Priority"];

/// Text rendering of a priority for the "Priority" column.
pub fn priority_cell(priority: &Priority) -> String {
    match priority {
        Priority::Real(v) => format_decimal(*v),
        Priority::Label(l) => l.clone(),
    }
}

impl ResultTable {
    /// Serialize as CSV: header, then one line per row in insertion order.
    /// Fields holding commas, quotes or newlines are quoted.
    pub fn to_delimited_text(&self) -> Result<String> {
        self.write_delimited(self.rows().iter())
    }

    /// Like [`ResultTable::to_delimited_text`], but in ranked order.
    pub fn to_ranked_delimited_text(&self) -> Result<String> {
        self.write_delimited(self.ranked().into_iter())
    }

    fn write_delimited<'a>(&self, rows: impl Iterator<Item = &'a ResultRow>) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(HEADER).context("Failed to write CSV header")?;
        for row in rows {
            writer
                .write_record([
                    row.feature_name.as_str(),
                    row.model.label(),
                    priority_cell(&row.priority).as_str(),
                ])
                .with_context(|| format!("Failed to write CSV row for '{}'", row.feature_name))?;
        }

        let bytes = writer.into_inner().context("Failed to flush CSV output")?;
        String::from_utf8(bytes).context("CSV output is not valid UTF-8")
    }

    /// Parse text produced by [`ResultTable::to_delimited_text`].
    pub fn from_delimited_text(text: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers().context("Failed to read CSV header")?;
        if headers.iter().ne(HEADER) {
            bail!(
                "Unexpected CSV header '{}', expected '{}'",
                headers.iter().collect::<Vec<_>>().join(","),
                HEADER.join(",")
            );
        }

        let mut table = ResultTable::new();
        for (i, record) in reader.records().enumerate() {
            // Line 1 is the header
            let line = i + 2;
            let record = record.with_context(|| format!("Malformed CSV on line {}", line))?;
            if record.len() != HEADER.len() {
                bail!("Line {}: expected {} fields, found {}", line, HEADER.len(), record.len());
            }

            let model = Model::parse(&record[1])
                .with_context(|| format!("Line {}: unknown model '{}'", line, &record[1]))?;
            let priority = match model {
                Model::Moscow => Priority::Label(record[2].to_string()),
                _ => Priority::Real(
                    record[2]
                        .trim()
                        .parse()
                        .with_context(|| format!("Line {}: invalid priority '{}'", line, &record[2]))?,
                ),
            };
            table.append(ResultRow::new(&record[0], model, priority));
        }

        Ok(table)
    }
}
