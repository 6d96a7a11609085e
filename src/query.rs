//! Query parsing.
//!
//! [`QueryParser`] turns a query string into a [`ParsedQuery`]: required,
//! optional and excluded terms, ordered phrases and a query-wide OR flag.
//! Evaluation against an index happens in [`crate::search`].

pub mod parser;

pub use parser::{ParsedQuery, QueryParser, parse_query};
