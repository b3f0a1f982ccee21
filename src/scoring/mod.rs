pub mod calculator;
pub mod error;
pub mod model;
pub mod priority;
pub mod validation;

pub use calculator::{ice, kano, moscow_rank, rice, score, value_vs_effort, weighted_score};
pub use error::InvalidInputError;
pub use model::{FieldSpec, Model, ModelInputs, MOSCOW_LABELS};
pub use priority::{format_decimal, Priority};
pub use validation::validate_inputs;
