//! Errors raised while reading or translating IDF text.

use thiserror::Error;

use model::ModelError;

#[derive(Debug, Error)]
pub enum IdfError {
    // ------ Parse errors ------
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    // ------ Field errors ------
    #[error("{object_type} '{name}' is missing required field {field}")]
    MissingField {
        object_type: String,
        name: String,
        field: String,
    },

    #[error("{object_type} '{name}': '{value}' is not a number ({field})")]
    InvalidNumber {
        object_type: String,
        name: String,
        field: String,
        value: String,
    },

    // ------ Model errors ------
    #[error(transparent)]
    Model(#[from] ModelError),
}
