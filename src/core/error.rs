use std::io;
use thiserror::Error;

/// Malformed statement syntax, reported before any schema lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid CREATE TABLE syntax")]
    InvalidCreate,
    #[error("Missing closing parenthesis")]
    MissingParen,
    #[error("Invalid column definition: {0}")]
    InvalidColumnDef(String),
    #[error("Unknown data type: {0}")]
    UnknownType(String),
    #[error("Table can have only one PRIMARY KEY")]
    MultiplePrimaryKeys,
    #[error("Table must have at least one column")]
    NoColumns,
    #[error("Invalid INSERT syntax")]
    InvalidInsert,
    #[error("Missing parentheses in VALUES")]
    MissingValues,
    #[error("SELECT must have FROM clause")]
    SelectWithoutFrom,
    #[error("DELETE must have FROM clause")]
    DeleteWithoutFrom,
    #[error("UPDATE must have SET clause")]
    UpdateWithoutSet,
    #[error("Table name missing in DROP TABLE command")]
    DropWithoutName,
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// The statement names a table or column the schema does not have.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Table '{0}' does not exist")]
    UnknownTable(String),
    #[error("Table '{0}' already exists")]
    DuplicateTable(String),
    #[error("Column '{0}' does not exist")]
    UnknownColumn(String),
}

/// Row-level constraint violations, all caught before any mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("Expected {expected} values but got {actual}")]
    ValueCount { expected: usize, actual: usize },
    #[error("Column '{0}' cannot be NULL")]
    NotNull(String),
    #[error("Duplicate PRIMARY KEY value '{0}'")]
    DuplicateKey(String),
    #[error("Column '{column}' VARCHAR({max}) exceeded. Got {len} characters")]
    VarcharLength {
        column: String,
        max: usize,
        len: usize,
    },
}

/// A value literal does not fit the column's declared type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("Column '{column}' expects INT but got '{value}'")]
    ExpectedInt { column: String, value: String },
    #[error("Column '{column}' expects FLOAT but got '{value}'")]
    ExpectedFloat { column: String, value: String },
}

/// Top-level error type. Every variant is recovered at the single-command
/// boundary; nothing here aborts the session.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Syntax error: {0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Schema(#[from] SchemaError),

    #[error("{0}")]
    Constraint(#[from] ConstraintError),

    #[error("{0}")]
    Type(#[from] TypeError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
