mod formatter;
mod parser;

pub use formatter::TableFormatter;
pub use parser::QueryParser;

use crate::core::condition::Condition;
use crate::core::types::Column;

/// One parsed command with its structured payload. The engine matches on
/// this exhaustively, so every statement form is handled or the crate does
/// not compile.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable {
        name: String,
        columns: Vec<Column>,
    },
    Insert {
        table: String,
        values: Vec<String>,
    },
    /// An empty `columns` list means "all columns" (a lone `*` projection).
    Select {
        table: String,
        columns: Vec<String>,
        conditions: Vec<Condition>,
    },
    Update {
        table: String,
        assignments: Vec<(String, String)>,
        conditions: Vec<Condition>,
    },
    Delete {
        table: String,
        conditions: Vec<Condition>,
    },
    DropTable {
        name: String,
    },
}
