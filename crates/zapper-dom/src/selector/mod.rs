//! CSS selector engine.
//!
//! Covers type, universal, id, class and attribute selectors, the four
//! combinators, the structural pseudo-classes and `:not()`. Pseudo-elements
//! and dynamic pseudo-classes (`:hover`, `:focus`, ...) are rejected as
//! unsupported because a static document can never match them.

mod escape;
mod matcher;
mod parser;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::document::Document;
use crate::node::NodeId;

pub use escape::css_escape;

use parser::ComplexSelector;

/// Errors raised while parsing a selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("Invalid selector '{selector}' at offset {offset}: {message}")]
    Parse {
        selector: String,
        offset: usize,
        message: String,
    },

    #[error("Unsupported selector syntax: {0}")]
    Unsupported(String),

    #[error("Empty selector")]
    Empty,
}

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    source: String,
    selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        if source.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        let selectors = parser::Parser::new(source).parse_top_level()?;
        Ok(Self {
            source: source.to_string(),
            selectors,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `element` matches any selector in the list.
    pub fn matches(&self, doc: &Document, element: NodeId) -> bool {
        doc.is_element(element)
            && self
                .selectors
                .iter()
                .any(|s| matcher::matches_complex(doc, element, s))
    }
}

impl FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
