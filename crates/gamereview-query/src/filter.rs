//! Filter clauses: column, comparison operator and a literal that is always
//! bound as a parameter.

use crate::catalog::is_identifier_char;
use crate::error::QueryError;
use bigdecimal::BigDecimal;
use gamereview_core::{ColumnDescriptor, ColumnKind};
use std::fmt;
use std::str::FromStr;

/// Comparison operators permitted in a filter clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Lt,
    Gt,
    Lte,
    Gte,
}

impl Operator {
    pub const ALL: [Operator; 5] = [
        Operator::Eq,
        Operator::Lt,
        Operator::Gt,
        Operator::Lte,
        Operator::Gte,
    ];

    /// Parse an operator token. Anything but the five comparison tokens fails.
    pub fn from_token(token: &str) -> Result<Self, QueryError> {
        match token {
            "=" => Ok(Operator::Eq),
            "<" => Ok(Operator::Lt),
            ">" => Ok(Operator::Gt),
            "<=" => Ok(Operator::Lte),
            ">=" => Ok(Operator::Gte),
            other => Err(QueryError::UnsupportedOperator {
                token: other.to_string(),
            }),
        }
    }

    /// SQL spelling of the operator.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Lte => "<=",
            Operator::Gte => ">=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A literal after coercion, ready to be passed to the driver out-of-band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundValue {
    /// Validated decimal, kept in its textual form to avoid float rounding.
    Numeric(String),
    Text(String),
    Date(String),
}

impl BoundValue {
    /// Coerce a raw literal for a column of the given kind.
    pub fn coerce(column: &ColumnDescriptor, literal: &str) -> Result<Self, QueryError> {
        match column.kind {
            ColumnKind::Numeric => {
                let trimmed = literal.trim();
                match BigDecimal::from_str(trimmed) {
                    Ok(_) => Ok(BoundValue::Numeric(trimmed.to_string())),
                    Err(_) => Err(QueryError::InvalidLiteral {
                        column: column.name.clone(),
                        kind: column.kind.to_string(),
                        literal: literal.to_string(),
                    }),
                }
            }
            ColumnKind::Text => Ok(BoundValue::Text(literal.to_string())),
            ColumnKind::Date => Ok(BoundValue::Date(literal.to_string())),
        }
    }

    /// The value handed to the driver.
    pub fn as_str(&self) -> &str {
        match self {
            BoundValue::Numeric(s) | BoundValue::Text(s) | BoundValue::Date(s) => s,
        }
    }

    /// Postgres type the placeholder is cast to.
    pub fn sql_cast(&self) -> &'static str {
        match self {
            BoundValue::Numeric(_) => "numeric",
            BoundValue::Text(_) => "text",
            BoundValue::Date(_) => "timestamp",
        }
    }
}

/// A validated filter: the column belongs to the target table, the operator is
/// whitelisted and the literal has been coerced to the column's kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    column: ColumnDescriptor,
    operator: Operator,
    value: BoundValue,
}

impl FilterClause {
    /// Build a clause for an already-resolved column.
    pub fn new(
        column: ColumnDescriptor,
        operator: Operator,
        literal: &str,
    ) -> Result<Self, QueryError> {
        let value = BoundValue::coerce(&column, literal)?;
        Ok(Self {
            column,
            operator,
            value,
        })
    }

    pub fn column(&self) -> &ColumnDescriptor {
        &self.column
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &BoundValue {
        &self.value
    }
}

/// An unvalidated `<column><op><literal>` clause as received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFilter {
    pub column: String,
    pub operator: String,
    pub literal: String,
}

impl RawFilter {
    pub fn new(
        column: impl Into<String>,
        operator: impl Into<String>,
        literal: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            operator: operator.into(),
            literal: literal.into(),
        }
    }
}

const OPERATOR_CHARS: &[char] = &['<', '>', '=', '!', '~'];

/// Split a comma-separated filter parameter into raw clauses.
///
/// Each clause is `<column><op><literal>` with optional whitespace around the
/// operator. Empty clauses produced by stray commas are skipped. A literal
/// wrapped in single quotes has the quotes removed.
pub fn parse_filters(text: &str) -> Result<Vec<RawFilter>, QueryError> {
    text.split(',')
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .map(parse_clause)
        .collect()
}

fn parse_clause(clause: &str) -> Result<RawFilter, QueryError> {
    let malformed = |reason: &str| QueryError::MalformedFilter {
        clause: clause.to_string(),
        reason: reason.to_string(),
    };

    let column_end = clause
        .find(|c: char| !is_identifier_char(c))
        .unwrap_or(clause.len());
    let column = &clause[..column_end];
    if column.is_empty() {
        return Err(malformed("missing column name"));
    }

    let rest = clause[column_end..].trim_start();
    let op_end = rest
        .find(|c: char| !OPERATOR_CHARS.contains(&c))
        .unwrap_or(rest.len());
    let operator = &rest[..op_end];
    if operator.is_empty() {
        return Err(malformed("missing comparison operator"));
    }

    let literal = unquote(rest[op_end..].trim());
    if literal.is_empty() {
        return Err(malformed("missing literal"));
    }

    Ok(RawFilter::new(column, operator, literal))
}

fn unquote(literal: &str) -> &str {
    literal
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(literal)
}
