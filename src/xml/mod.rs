//! XML building and parsing for agent documents.
//!
//! - [`render`] turns an [`ElementTree`] into indented, escaped element text.
//! - [`parse`] turns a response body into an [`XmlNode`] tree where every
//!   tag maps to a sequence of values; [`strip_namespaces`] and [`project`]
//!   work on that tree.

mod builder;
mod parser;

pub use builder::{ElementTree, XmlField, XmlFragment, format_date, render};
pub use parser::{ParsedDocument, XmlNode, XmlValue, parse, project, strip_namespaces};
