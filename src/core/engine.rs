use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::core::condition::Condition;
use crate::core::error::{ConstraintError, DbError, SchemaError, TypeError};
use crate::core::sql::{QueryParser, Statement, TableFormatter};
use crate::core::store;
use crate::core::table::Table;
use crate::core::types::{Column, ColumnType, Row};

/// Projected rows from a SELECT, in the table's insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Structured outcome of one successfully executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteResult {
    TableCreated { name: String, definitions: Vec<String> },
    /// `row_count` is the table's total row count after the insert.
    Inserted { table: String, row_count: usize },
    Selected(QueryResult),
    Updated { table: String, count: usize },
    Deleted { table: String, count: usize },
    TableDropped { name: String },
    TableList(Vec<(String, usize)>),
}

impl ExecuteResult {
    /// Whether the command changed the table set; the shell saves after
    /// every mutation.
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            ExecuteResult::Selected(_) | ExecuteResult::TableList(_)
        )
    }
}

impl fmt::Display for ExecuteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecuteResult::TableCreated { name, definitions } => {
                write!(f, "Table '{}' created successfully!", name)?;
                write!(f, "\nColumns:")?;
                for definition in definitions {
                    write!(f, "\n  - {}", definition)?;
                }
                Ok(())
            }
            ExecuteResult::Inserted { table, row_count } => {
                write!(f, "[{}] Row inserted successfully into '{}'!", row_count, table)
            }
            ExecuteResult::Selected(result) => {
                if result.rows.is_empty() {
                    write!(f, "No matching rows found.")
                } else {
                    write!(
                        f,
                        "{}\nRows returned: {}",
                        TableFormatter::format_table(&result.columns, &result.rows).trim_end(),
                        result.rows.len()
                    )
                }
            }
            ExecuteResult::Updated { table, count } => {
                write!(f, "[{}] Row(s) updated in '{}'!", count, table)
            }
            ExecuteResult::Deleted { table, count } => {
                write!(f, "[{}] Row(s) deleted from '{}'!", count, table)
            }
            ExecuteResult::TableDropped { name } => {
                write!(f, "Table '{}' dropped successfully!", name)
            }
            ExecuteResult::TableList(tables) => {
                if tables.is_empty() {
                    return write!(f, "No tables in database.");
                }
                write!(f, "Tables in database:")?;
                for (name, rows) in tables {
                    write!(f, "\n  - {} ({} rows)", name, rows)?;
                }
                Ok(())
            }
        }
    }
}

/// The command processor. Owns the table set and enforces everything the
/// parser and the tables do not: existence checks, value arity, per-value
/// type validation, and the NOT NULL / PRIMARY KEY / VARCHAR bounds.
///
/// Keys are case-sensitive; the ordered map makes listing and store output
/// come out in natural key order.
#[derive(Debug, Default)]
pub struct Engine {
    tables: BTreeMap<String, Table>,
}

impl Engine {
    pub fn new() -> Self {
        Engine {
            tables: BTreeMap::new(),
        }
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn tables(&self) -> &BTreeMap<String, Table> {
        &self.tables
    }

    /// Executes one trimmed command string. Every failure comes back as a
    /// [`DbError`]; malformed input never panics and never leaves a table
    /// half-mutated.
    pub fn dispatch(&mut self, command: &str) -> Result<ExecuteResult, DbError> {
        let command = command.trim();
        if command.to_ascii_uppercase() == "LIST TABLES" {
            return Ok(self.list_tables());
        }

        match QueryParser::parse(command)? {
            Statement::CreateTable { name, columns } => self.create_table(name, columns),
            Statement::Insert { table, values } => self.insert_into(&table, values),
            Statement::Select {
                table,
                columns,
                conditions,
            } => self
                .select_from(&table, &columns, &conditions)
                .map(ExecuteResult::Selected),
            Statement::Update {
                table,
                assignments,
                conditions,
            } => self.update_table(&table, &assignments, &conditions),
            Statement::Delete { table, conditions } => self.delete_from(&table, &conditions),
            Statement::DropTable { name } => self.drop_table(&name),
        }
    }

    pub fn list_tables(&self) -> ExecuteResult {
        ExecuteResult::TableList(
            self.tables
                .iter()
                .map(|(name, table)| (name.clone(), table.row_count()))
                .collect(),
        )
    }

    fn create_table(
        &mut self,
        name: String,
        columns: Vec<Column>,
    ) -> Result<ExecuteResult, DbError> {
        if self.tables.contains_key(&name) {
            return Err(SchemaError::DuplicateTable(name).into());
        }
        let mut table = Table::new(name.clone());
        for column in columns {
            table.add_column(column);
        }
        let definitions = table.columns().iter().map(|c| c.definition()).collect();
        self.tables.insert(name.clone(), table);
        Ok(ExecuteResult::TableCreated { name, definitions })
    }

    fn insert_into(&mut self, table_name: &str, values: Vec<String>) -> Result<ExecuteResult, DbError> {
        let table = self
            .tables
            .get_mut(table_name)
            .ok_or_else(|| SchemaError::UnknownTable(table_name.to_string()))?;

        if values.len() != table.column_count() {
            return Err(ConstraintError::ValueCount {
                expected: table.column_count(),
                actual: values.len(),
            }
            .into());
        }

        // every value is validated before anything is appended, so a
        // rejected insert leaves the row set untouched
        for (column, value) in table.columns().iter().zip(&values) {
            if column.not_null && value.is_empty() {
                return Err(ConstraintError::NotNull(column.name.clone()).into());
            }
            if column.primary_key && table.has_primary_key(value) {
                return Err(ConstraintError::DuplicateKey(value.clone()).into());
            }
            match column.ty {
                ColumnType::Int if !is_valid_int(value) => {
                    return Err(TypeError::ExpectedInt {
                        column: column.name.clone(),
                        value: value.clone(),
                    }
                    .into());
                }
                ColumnType::Float if !is_valid_float(value) => {
                    return Err(TypeError::ExpectedFloat {
                        column: column.name.clone(),
                        value: value.clone(),
                    }
                    .into());
                }
                ColumnType::Varchar(max) if value.chars().count() > max => {
                    return Err(ConstraintError::VarcharLength {
                        column: column.name.clone(),
                        max,
                        len: value.chars().count(),
                    }
                    .into());
                }
                _ => {}
            }
        }

        table.add_row(Row::new(values));
        Ok(ExecuteResult::Inserted {
            table: table_name.to_string(),
            row_count: table.row_count(),
        })
    }

    fn select_from(
        &self,
        table_name: &str,
        columns: &[String],
        conditions: &[Condition],
    ) -> Result<QueryResult, DbError> {
        let table = self
            .tables
            .get(table_name)
            .ok_or_else(|| SchemaError::UnknownTable(table_name.to_string()))?;

        // an empty projection means every column, in schema order
        let mut indices = Vec::new();
        if columns.is_empty() {
            indices.extend(0..table.column_count());
        } else {
            for name in columns {
                let index = table
                    .column_index(name)
                    .ok_or_else(|| SchemaError::UnknownColumn(name.clone()))?;
                indices.push(index);
            }
        }

        let headers = indices
            .iter()
            .map(|&i| table.columns()[i].name.clone())
            .collect();
        let mut rows = Vec::new();
        for row in table.rows() {
            if table.row_matches(row, conditions) {
                rows.push(indices.iter().map(|&i| row.value(i).to_string()).collect());
            }
        }

        Ok(QueryResult {
            columns: headers,
            rows,
        })
    }

    fn update_table(
        &mut self,
        table_name: &str,
        assignments: &[(String, String)],
        conditions: &[Condition],
    ) -> Result<ExecuteResult, DbError> {
        let table = self
            .tables
            .get_mut(table_name)
            .ok_or_else(|| SchemaError::UnknownTable(table_name.to_string()))?;

        // assignment targets must exist and numeric literals must be shaped
        // right before any row is touched
        for (column_name, value) in assignments {
            let index = table
                .column_index(column_name)
                .ok_or_else(|| SchemaError::UnknownColumn(column_name.clone()))?;
            match table.columns()[index].ty {
                ColumnType::Int if !is_valid_int(value) => {
                    return Err(TypeError::ExpectedInt {
                        column: column_name.clone(),
                        value: value.clone(),
                    }
                    .into());
                }
                ColumnType::Float if !is_valid_float(value) => {
                    return Err(TypeError::ExpectedFloat {
                        column: column_name.clone(),
                        value: value.clone(),
                    }
                    .into());
                }
                _ => {}
            }
        }

        let count = table.update_rows(assignments, conditions);
        Ok(ExecuteResult::Updated {
            table: table_name.to_string(),
            count,
        })
    }

    fn delete_from(
        &mut self,
        table_name: &str,
        conditions: &[Condition],
    ) -> Result<ExecuteResult, DbError> {
        let table = self
            .tables
            .get_mut(table_name)
            .ok_or_else(|| SchemaError::UnknownTable(table_name.to_string()))?;
        let count = table.delete_rows(conditions);
        Ok(ExecuteResult::Deleted {
            table: table_name.to_string(),
            count,
        })
    }

    fn drop_table(&mut self, name: &str) -> Result<ExecuteResult, DbError> {
        if self.tables.remove(name).is_none() {
            return Err(SchemaError::UnknownTable(name.to_string()).into());
        }
        Ok(ExecuteResult::TableDropped {
            name: name.to_string(),
        })
    }

    /// Writes the whole table set to `path`. I/O failures degrade to a
    /// warning; in-memory state is never affected.
    pub fn save_to_store(&self, path: &Path) {
        if let Err(e) = store::save(&self.tables, path) {
            tracing::warn!("could not save database to {}: {}", path.display(), e);
        }
    }

    /// Replaces the table set with the contents of `path`. A missing file
    /// is a fresh empty database; damage in the file keeps whatever tables
    /// decoded cleanly before it.
    pub fn load_from_store(&mut self, path: &Path) {
        match store::load(path) {
            Ok(tables) => self.tables = tables,
            Err(e) => {
                tracing::warn!("could not load database from {}: {}", path.display(), e);
            }
        }
    }
}

/// Optional leading sign followed by nothing but digits.
fn is_valid_int(value: &str) -> bool {
    let digits = match value.as_bytes().first() {
        Some(b'+') | Some(b'-') => &value[1..],
        _ => value,
    };
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Optional leading sign, at most one decimal point, at least one digit,
/// nothing else.
fn is_valid_float(value: &str) -> bool {
    let rest = match value.as_bytes().first() {
        Some(b'+') | Some(b'-') => &value[1..],
        _ => value,
    };
    if rest.is_empty() {
        return false;
    }
    let mut has_digit = false;
    let mut has_point = false;
    for b in rest.bytes() {
        match b {
            b'0'..=b'9' => has_digit = true,
            b'.' if !has_point => has_point = true,
            _ => return false,
        }
    }
    has_digit
}
