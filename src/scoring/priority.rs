use std::cmp::Ordering;
use std::fmt;

use super::calculator::moscow_rank;

/// A computed priority: a number for the formula models, a bucket label for MoSCoW.
#[derive(Debug, Clone, PartialEq)]
pub enum Priority {
    Real(f64),
    Label(String),
}

impl Priority {
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Priority::Real(v) => Some(*v),
            Priority::Label(_) => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            Priority::Real(_) => None,
            Priority::Label(l) => Some(l),
        }
    }

    /// Rank implied by a MoSCoW label (1 = highest). `None` for numeric priorities.
    pub fn rank(&self) -> Option<u8> {
        self.as_label().map(moscow_rank)
    }

    /// Order from most to least important.
    ///
    /// Numbers sort descending, labels by MoSCoW rank ascending, and every
    /// numeric priority ranks ahead of every label.
    pub fn cmp_importance(&self, other: &Priority) -> Ordering {
        match (self, other) {
            (Priority::Real(a), Priority::Real(b)) => b.partial_cmp(a).unwrap_or(Ordering::Equal),
            (Priority::Label(a), Priority::Label(b)) => moscow_rank(a).cmp(&moscow_rank(b)),
            (Priority::Real(_), Priority::Label(_)) => Ordering::Less,
            (Priority::Label(_), Priority::Real(_)) => Ordering::Greater,
        }
    }
}

/// Render a number without exponent notation.
///
/// Integral values keep one decimal place ("24.0"); anything else uses the
/// shortest representation that parses back to the same `f64`.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Real(v) => f.write_str(&format_decimal(*v)),
            Priority::Label(l) => f.write_str(l),
        }
    }
}
