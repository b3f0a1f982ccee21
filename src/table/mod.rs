pub mod delimited;

use crate::scoring::{Model, Priority};

/// One scored feature.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub feature_name: String,
    pub model: Model,
    pub priority: Priority,
}

impl ResultRow {
    pub fn new(feature_name: impl Into<String>, model: Model, priority: Priority) -> Self {
        Self {
            feature_name: feature_name.into(),
            model,
            priority,
        }
    }
}

/// Scored features of one session, in the order they were entered.
///
/// Append-only: rows are never removed, updated or reordered in place.
/// Use [`ResultTable::ranked`] for a priority-ordered view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, row: ResultRow) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// Rows from most to least important. Stable, so ties keep entry order.
    pub fn ranked(&self) -> Vec<&ResultRow> {
        let mut ranked: Vec<&ResultRow> = self.rows.iter().collect();
        ranked.sort_by(|a, b| a.priority.cmp_importance(&b.priority));
        ranked
    }

    /// Rows in insertion order, or ranked when `sorted` is set.
    pub fn view(&self, sorted: bool) -> Vec<&ResultRow> {
        if sorted {
            self.ranked()
        } else {
            self.rows.iter().collect()
        }
    }
}

impl FromIterator<ResultRow> for ResultTable {
    fn from_iter<I: IntoIterator<Item = ResultRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
