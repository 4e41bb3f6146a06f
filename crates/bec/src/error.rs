//! Errors raised while reading, writing or translating BEC documents.

use thiserror::Error;

use model::ModelError;

#[derive(Debug, Error)]
pub enum BecError {
    // ------ XML errors ------
    #[error("XML: {0}")]
    Xml(String),

    #[error("<{element}> is missing <{child}>")]
    MissingElement { element: String, child: String },

    #[error("<{element}>: '{value}' is not a number (<{child}>)")]
    InvalidNumber {
        element: String,
        child: String,
        value: String,
    },

    // ------ Model errors ------
    #[error(transparent)]
    Model(#[from] ModelError),
}
