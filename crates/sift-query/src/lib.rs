//! Query language core for sift.
//!
//! A small query language mixing free text, boolean connectives, groups,
//! and `+key:value` field filters:
//!
//! - **Terms**: `marina` - free-text search words
//! - **Phrases**: `"marina hyde"` - quoted exact text
//! - **AND / OR**: `this AND that` - right-associative, no precedence
//! - **Grouping**: `(sausages OR mash)` - parenthesised sub-expressions
//! - **Fields**: `+section:commentisfree` - filters, top-level only
//!
//! [`scan`] turns text into positioned tokens, [`parse`] builds a
//! serializable AST with a single positioned error on failure, and
//! [`to_search_query`] renders the AST into the downstream
//! `key=value&...` wire format.
//!
//! # Example
//!
//! ```
//! use sift_query::{parse, scan, to_search_query};
//!
//! let ast = parse(scan("marina +section:commentisfree")).unwrap();
//! let query = to_search_query(&ast).unwrap();
//! assert_eq!(query, "q=marina&section=commentisfree");
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod parser;
mod scanner;
mod search;
mod token;

pub use ast::{QueryBinary, QueryContent, QueryField, QueryGroup, QueryList, QueryStr};
pub use error::{ParseError, QueryError, SerializationError};
pub use parser::parse;
pub use scanner::scan;
pub use search::to_search_query;
pub use token::{Token, TokenType};
