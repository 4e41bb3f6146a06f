//! `energyplus` crate — IDF text, field positions, and the model ⇄ IDF
//! translators.

pub mod error;
pub mod fields;
pub mod idf;
pub mod forward;
pub mod reverse;

pub use error::IdfError;
pub use idf::{IdfFile, IdfObject};
pub use forward::{ForwardTranslator, ForwardTranslatorOptions};
pub use reverse::ReverseTranslator;

#[cfg(test)]
mod translator_tests;
