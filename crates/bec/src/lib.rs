//! `bec` crate — BEC XML element tree, IP/SI unit factors, and the
//! BEC ⇄ model translators.

pub mod error;
pub mod xml;
pub mod units;
pub mod forward;
pub mod reverse;

pub use error::BecError;
pub use xml::Element;
pub use forward::ForwardTranslator;
pub use reverse::{ReverseTranslator, ReverseTranslatorOptions};

#[cfg(test)]
mod translator_tests;
