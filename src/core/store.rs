//! Persistence codec: one database becomes one flat, line-oriented text
//! file. All integers and flags are decimal text.
//!
//! ```text
//! <tableCount>
//! TABLE
//! <tableName>
//! <columnCount>
//! <colName>
//! <typeCode> <size> <isPrimaryKey:0|1> <isNotNull:0|1>   (per column)
//! <rowCount>
//! <valueCount>
//! <value>                                                (per value, per row)
//! ```
//!
//! Type codes: 0 = INT, 1 = FLOAT, 2 = VARCHAR. Tables appear in key order.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use std::str::Lines;

use crate::core::table::Table;
use crate::core::types::{Column, ColumnType, Row};

/// Serializes the whole table set.
pub fn encode(tables: &BTreeMap<String, Table>) -> String {
    let mut out = String::new();
    out.push_str(&tables.len().to_string());
    out.push('\n');

    for table in tables.values() {
        out.push_str("TABLE\n");
        out.push_str(table.name());
        out.push('\n');
        out.push_str(&table.column_count().to_string());
        out.push('\n');

        for column in table.columns() {
            out.push_str(&column.name);
            out.push('\n');
            out.push_str(&format!(
                "{} {} {} {}\n",
                column.ty.type_code(),
                column.ty.size(),
                u8::from(column.primary_key),
                u8::from(column.not_null),
            ));
        }

        out.push_str(&table.row_count().to_string());
        out.push('\n');
        for row in table.rows() {
            out.push_str(&row.len().to_string());
            out.push('\n');
            for value in row.values() {
                out.push_str(value);
                out.push('\n');
            }
        }
    }
    out
}

/// Decodes a store file. Damage mid-table drops that table and stops
/// reading, so a truncated file yields exactly the tables that decoded
/// cleanly before it. Never panics, never errors.
pub fn decode(content: &str) -> BTreeMap<String, Table> {
    let mut tables = BTreeMap::new();
    let mut lines = content.lines();

    let Some(header) = lines.next() else {
        return tables;
    };
    let Ok(table_count) = header.trim().parse::<usize>() else {
        tracing::warn!("store header is not a table count: {:?}", header);
        return tables;
    };

    for _ in 0..table_count {
        match decode_table(&mut lines) {
            Some(table) => {
                tables.insert(table.name().to_string(), table);
            }
            None => {
                tracing::warn!(
                    "store file truncated or malformed; keeping {} table(s)",
                    tables.len()
                );
                break;
            }
        }
    }
    tables
}

fn decode_table(lines: &mut Lines<'_>) -> Option<Table> {
    if lines.next()? != "TABLE" {
        return None;
    }
    let mut table = Table::new(lines.next()?);

    let column_count: usize = lines.next()?.trim().parse().ok()?;
    for _ in 0..column_count {
        let name = lines.next()?;
        let mut fields = lines.next()?.split_whitespace();
        let code: u8 = fields.next()?.parse().ok()?;
        let size: usize = fields.next()?.parse().ok()?;
        let primary_key = fields.next()?.parse::<i32>().ok()? != 0;
        let not_null = fields.next()?.parse::<i32>().ok()? != 0;
        table.add_column(Column {
            name: name.to_string(),
            ty: ColumnType::from_code(code, size)?,
            primary_key,
            not_null,
        });
    }

    let row_count: usize = lines.next()?.trim().parse().ok()?;
    for _ in 0..row_count {
        let value_count: usize = lines.next()?.trim().parse().ok()?;
        let mut row = Row::default();
        for _ in 0..value_count {
            row.push(lines.next()?.to_string());
        }
        table.add_row(row);
    }
    Some(table)
}

/// Writes the store file, creating parent directories as needed.
pub fn save(tables: &BTreeMap<String, Table>, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, encode(tables))
}

/// Reads the store file. A missing file is an empty, fresh database.
pub fn load(path: &Path) -> io::Result<BTreeMap<String, Table>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(decode(&content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_tables() -> BTreeMap<String, Table> {
        let mut inventory = Table::new("inventory");
        let mut sku = Column::new("sku", ColumnType::Int);
        sku.primary_key = true;
        inventory.add_column(sku);
        let mut label = Column::new("label", ColumnType::Varchar(40));
        label.not_null = true;
        inventory.add_column(label);
        inventory.add_column(Column::new("price", ColumnType::Float));
        inventory.add_row(Row::new(vec![
            "1".to_string(),
            "blue widget, large".to_string(),
            "9.99".to_string(),
        ]));
        inventory.add_row(Row::new(vec![
            "2".to_string(),
            "it's quoted".to_string(),
            "0.5".to_string(),
        ]));

        let mut staff = Table::new("staff");
        staff.add_column(Column::new("name", ColumnType::Varchar(255)));
        staff.add_row(Row::new(vec!["ann".to_string()]));

        let mut tables = BTreeMap::new();
        tables.insert("inventory".to_string(), inventory);
        tables.insert("staff".to_string(), staff);
        tables
    }

    #[test]
    fn encode_decode_round_trips() {
        let tables = sample_tables();
        let decoded = decode(&encode(&tables));
        assert_eq!(decoded, tables);
    }

    #[test]
    fn decoded_tables_rebuild_the_primary_key_index() {
        let tables = sample_tables();
        let decoded = decode(&encode(&tables));
        assert_eq!(decoded["inventory"].primary_key_index(), Some(0));
        assert_eq!(decoded["staff"].primary_key_index(), None);
    }

    #[test]
    fn encode_layout_matches_the_documented_format() {
        let mut tables = BTreeMap::new();
        let mut t = Table::new("t");
        let mut id = Column::new("id", ColumnType::Int);
        id.primary_key = true;
        t.add_column(id);
        t.add_column(Column::new("name", ColumnType::Varchar(5)));
        t.add_row(Row::new(vec!["1".to_string(), "ann".to_string()]));
        tables.insert("t".to_string(), t);

        let expected = "1\nTABLE\nt\n2\nid\n0 0 1 0\nname\n2 5 0 0\n1\n2\n1\nann\n";
        assert_eq!(encode(&tables), expected);
    }

    #[test]
    fn empty_and_garbage_headers_decode_to_nothing() {
        assert!(decode("").is_empty());
        assert!(decode("not a number\n").is_empty());
    }

    #[test]
    fn truncated_file_keeps_tables_that_decoded_cleanly() {
        let tables = sample_tables();
        let full = encode(&tables);

        // cut inside the second table ("staff" sorts after "inventory")
        let cut = full.find("staff").unwrap();
        let decoded = decode(&full[..cut]);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded["inventory"], tables["inventory"]);
    }

    #[test]
    fn bad_type_code_drops_the_table() {
        let content = "1\nTABLE\nt\n1\nid\n9 0 0 0\n0\n";
        assert!(decode(content).is_empty());
    }

    #[test]
    fn save_and_load_through_the_filesystem() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.db");

        let tables = sample_tables();
        save(&tables, &path).unwrap();
        assert_eq!(load(&path).unwrap(), tables);
    }

    #[test]
    fn missing_file_loads_as_an_empty_database() {
        let dir = TempDir::new().unwrap();
        let loaded = load(&dir.path().join("nope.db")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deep").join("down").join("database.db");
        save(&sample_tables(), &path).unwrap();
        assert!(path.is_file());
    }
}
