use crate::core::condition::{Condition, Operator};
use crate::core::error::ParseError;
use crate::core::types::{Column, ColumnType};

use super::Statement;

/// Turns one raw command string into a [`Statement`].
///
/// The grammar is deliberately loose: keywords are located by
/// case-insensitive search, and both inserted values and predicate literals
/// are raw trimmed text in which quote characters carry no special meaning
/// (`INSERT INTO users VALUES (1, alice, 30)` is well-formed). Nothing here
/// consults a table schema; schema-dependent checks belong to the engine.
pub struct QueryParser;

impl QueryParser {
    /// Routes on the leading keyword and extracts the statement payload.
    pub fn parse(command: &str) -> Result<Statement, ParseError> {
        let command = command.trim();
        let upper = command.to_ascii_uppercase();
        if upper.starts_with("CREATE TABLE") {
            parse_create_table(command)
        } else if upper.starts_with("INSERT INTO") {
            parse_insert(command)
        } else if upper.starts_with("SELECT") {
            parse_select(command)
        } else if upper.starts_with("UPDATE") {
            parse_update(command)
        } else if upper.starts_with("DELETE") {
            parse_delete(command)
        } else if upper.starts_with("DROP TABLE") {
            parse_drop_table(command)
        } else {
            Err(ParseError::UnknownCommand(command.to_string()))
        }
    }
}

fn parse_create_table(query: &str) -> Result<Statement, ParseError> {
    let table_kw = find_ci(query, "TABLE").ok_or(ParseError::InvalidCreate)?;
    let rest = &query[table_kw + 5..];
    let open = rest.find('(').ok_or(ParseError::InvalidCreate)?;
    let name = rest[..open].trim();
    if name.is_empty() {
        return Err(ParseError::InvalidCreate);
    }
    let close = rest.rfind(')').ok_or(ParseError::MissingParen)?;
    if close <= open {
        return Err(ParseError::MissingParen);
    }
    let body = &rest[open + 1..close];

    let mut columns = Vec::new();
    let mut seen_primary_key = false;
    for def in split_top_level(body) {
        let def = def.trim();
        let mut tokens = def.split_whitespace();
        let (Some(column_name), Some(type_token)) = (tokens.next(), tokens.next()) else {
            return Err(ParseError::InvalidColumnDef(def.to_string()));
        };

        let upper_def = def.to_ascii_uppercase();
        let primary_key = upper_def.contains("PRIMARY KEY");
        let not_null = upper_def.contains("NOT NULL");
        if primary_key {
            if seen_primary_key {
                return Err(ParseError::MultiplePrimaryKeys);
            }
            seen_primary_key = true;
        }

        columns.push(Column {
            name: column_name.to_string(),
            ty: parse_column_type(type_token)?,
            primary_key,
            not_null,
        });
    }

    if columns.is_empty() {
        return Err(ParseError::NoColumns);
    }

    Ok(Statement::CreateTable {
        name: name.to_string(),
        columns,
    })
}

/// `INT`, `FLOAT`, or `VARCHAR(n)`; `VARCHAR` with no parenthesized length
/// defaults to 255. The type must be a single whitespace token, so
/// `VARCHAR (50)` reads as a sizeless `VARCHAR`.
fn parse_column_type(token: &str) -> Result<ColumnType, ParseError> {
    let upper = token.to_ascii_uppercase();
    if upper == "INT" {
        return Ok(ColumnType::Int);
    }
    if upper == "FLOAT" {
        return Ok(ColumnType::Float);
    }
    if upper.starts_with("VARCHAR") {
        let size = match (upper.find('('), upper.find(')')) {
            (Some(open), Some(close)) if open < close => upper[open + 1..close]
                .trim()
                .parse()
                .map_err(|_| ParseError::UnknownType(token.to_string()))?,
            _ => 255,
        };
        return Ok(ColumnType::Varchar(size));
    }
    Err(ParseError::UnknownType(token.to_string()))
}

fn parse_insert(query: &str) -> Result<Statement, ParseError> {
    let into_kw = find_ci(query, "INTO").ok_or(ParseError::InvalidInsert)?;
    let after_into = into_kw + 4;
    let values_kw = find_ci_from(query, "VALUES", after_into).ok_or(ParseError::InvalidInsert)?;
    let table = query[after_into..values_kw].trim().to_string();

    let open = query[values_kw..]
        .find('(')
        .map(|i| values_kw + i)
        .ok_or(ParseError::MissingValues)?;
    let close = query.rfind(')').ok_or(ParseError::MissingValues)?;
    if close <= open {
        return Err(ParseError::MissingValues);
    }

    let values = split_fields(&query[open + 1..close]);
    Ok(Statement::Insert { table, values })
}

fn parse_select(query: &str) -> Result<Statement, ParseError> {
    let from_kw = find_ci(query, "FROM").ok_or(ParseError::SelectWithoutFrom)?;

    // the text between the SELECT keyword and FROM is the projection; a
    // lone star becomes the empty "all columns" list
    let projection = query[6..from_kw].trim();
    let columns = if projection == "*" {
        Vec::new()
    } else {
        split_fields(projection)
    };

    let (table, conditions) = table_and_predicate(query, from_kw + 4)?;
    Ok(Statement::Select {
        table,
        columns,
        conditions,
    })
}

fn parse_delete(query: &str) -> Result<Statement, ParseError> {
    let from_kw = find_ci(query, "FROM").ok_or(ParseError::DeleteWithoutFrom)?;
    // no WHERE clause means "all rows"
    let (table, conditions) = table_and_predicate(query, from_kw + 4)?;
    Ok(Statement::Delete { table, conditions })
}

fn parse_update(query: &str) -> Result<Statement, ParseError> {
    let set_kw = find_ci(query, "SET").ok_or(ParseError::UpdateWithoutSet)?;
    let table = query[6..set_kw].trim().to_string();

    let (set_end, conditions) = match find_ci_from(query, "WHERE", set_kw) {
        Some(where_kw) => (where_kw, parse_where_chain(&query[where_kw + 5..])),
        None => (query.len(), Vec::new()),
    };

    // each assignment splits once, on its first '='; pieces without any
    // '=' are ignored
    let mut assignments = Vec::new();
    for piece in split_fields(&query[set_kw + 3..set_end]) {
        if let Some(eq) = piece.find('=') {
            let column = piece[..eq].trim().to_string();
            let value = piece[eq + 1..].trim().to_string();
            assignments.push((column, value));
        }
    }

    Ok(Statement::Update {
        table,
        assignments,
        conditions,
    })
}

fn parse_drop_table(query: &str) -> Result<Statement, ParseError> {
    let table_kw = find_ci(query, "TABLE").ok_or(ParseError::DropWithoutName)?;
    let mut name = query[table_kw + 5..].trim();
    name = name.strip_suffix(';').unwrap_or(name).trim();
    if name.is_empty() {
        return Err(ParseError::DropWithoutName);
    }
    Ok(Statement::DropTable {
        name: name.to_string(),
    })
}

/// Table name between `start` and the WHERE keyword (or end of input), plus
/// the parsed predicate chain if a WHERE clause is present.
fn table_and_predicate(query: &str, start: usize) -> Result<(String, Vec<Condition>), ParseError> {
    let (table_end, conditions) = match find_ci_from(query, "WHERE", start) {
        Some(where_kw) => (where_kw, parse_where_chain(&query[where_kw + 5..])),
        None => (query.len(), Vec::new()),
    };
    Ok((query[start..table_end].trim().to_string(), conditions))
}

/// Splits the WHERE text on case-insensitive ` AND ` and extracts one
/// condition per conjunct. A conjunct containing no comparator at all
/// yields no condition; the chain simply gets shorter.
fn parse_where_chain(text: &str) -> Vec<Condition> {
    let mut conditions = Vec::new();
    let mut rest = text;
    loop {
        let (conjunct, next) = match find_ci(rest, " AND ") {
            Some(pos) => (&rest[..pos], Some(&rest[pos + 5..])),
            None => (rest, None),
        };
        if let Some(cond) = parse_conjunct(conjunct.trim()) {
            conditions.push(cond);
        }
        match next {
            Some(next) => rest = next,
            None => break,
        }
    }
    conditions
}

/// The comparator is the first hit in [`Operator::PRIORITY`] order anywhere
/// in the conjunct; text before it is the column, text after the literal.
fn parse_conjunct(text: &str) -> Option<Condition> {
    for op in Operator::PRIORITY {
        if let Some(pos) = text.find(op.symbol()) {
            let column = text[..pos].trim();
            let value = text[pos + op.symbol().len()..].trim();
            return Some(Condition::new(column, op, value));
        }
    }
    None
}

/// Byte offset of the first case-insensitive occurrence of `needle`, which
/// must be uppercase ASCII. Offsets are valid for the original string.
fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    haystack.to_ascii_uppercase().find(needle)
}

fn find_ci_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    find_ci(&haystack[from..], needle).map(|pos| pos + from)
}

/// Comma split with stream semantics: one trailing separator does not
/// produce an empty trailing field, and interior empties are kept.
fn split_fields(text: &str) -> Vec<String> {
    let mut parts: Vec<&str> = text.split(',').collect();
    if parts.last() == Some(&"") {
        parts.pop();
    }
    parts.into_iter().map(|p| p.trim().to_string()).collect()
}

/// Comma split that ignores commas nested inside parentheses, for column
/// definition lists. Shares the trailing-separator rule of `split_fields`.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    if parts.last() == Some(&"") {
        parts.pop();
    }
    parts
}
