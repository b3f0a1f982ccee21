use thiserror::Error;

use super::model::Model;

/// Inputs the calculator refuses to turn into a priority.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInputError {
    /// A divisor field was zero; the formula would be infinite or NaN.
    #[error("{model}: {field} must not be zero")]
    DivisionByZero { model: Model, field: &'static str },
}
