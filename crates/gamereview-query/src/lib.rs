//! Schema-whitelisted, parameter-bound table queries.
//!
//! A request flows through three stages:
//!
//! 1. [`SchemaCatalog`] resolves the table, the projected columns and every
//!    filter against the whitelist, producing a [`ProjectionRequest`].
//! 2. [`QueryBuilder::build`] renders it to a [`Statement`] whose SQL text
//!    contains only catalog identifiers and `$n` placeholders.
//! 3. [`QueryBuilder::execute`] hands the statement to a [`StatementRunner`]
//!    under a timeout and returns a [`ResultSet`].
//!
//! Client-supplied text never becomes part of the SQL text.

pub mod builder;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod request;
pub mod result;
pub mod runner;
pub mod statement;

pub use builder::QueryBuilder;
pub use catalog::{SchemaCatalog, is_plain_identifier};
pub use error::QueryError;
pub use filter::{BoundValue, FilterClause, Operator, RawFilter, parse_filters};
pub use request::{ColumnSelection, ProjectionRequest};
pub use result::ResultSet;
pub use runner::StatementRunner;
pub use statement::{Statement, quote_ident};
