use crate::core::condition::Condition;
use crate::core::types::{Column, Row};

/// One named table: ordered schema, ordered rows, and the cached position
/// of the primary-key column if there is one. Rows keep insertion order;
/// a SELECT without a predicate returns them in exactly that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Row>,
    primary_key: Option<usize>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Table {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
            primary_key: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn primary_key_index(&self) -> Option<usize> {
        self.primary_key
    }

    /// Appends a column. The last column flagged as primary key wins the
    /// cached index; the parser already rejects more than one per statement.
    pub fn add_column(&mut self, column: Column) {
        if column.primary_key {
            self.primary_key = Some(self.columns.len());
        }
        self.columns.push(column);
    }

    /// Appends a row. The caller guarantees the arity matches the schema.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Case-insensitive column lookup. `None` means "no such column" and is
    /// a user-facing error at the engine level, never a panic.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// True when some existing row already holds `value` in the primary-key
    /// column, by exact string equality. Always false without a primary key.
    pub fn has_primary_key(&self, value: &str) -> bool {
        match self.primary_key {
            Some(index) => self.rows.iter().any(|row| row.value(index) == value),
            None => false,
        }
    }

    /// A row matches when every condition holds, short-circuiting left to
    /// right. A condition naming an unknown column is vacuously true.
    pub fn row_matches(&self, row: &Row, conditions: &[Condition]) -> bool {
        for cond in conditions {
            let Some(index) = self.column_index(&cond.column) else {
                continue;
            };
            if !cond.evaluate(row.value(index), &self.columns[index].ty) {
                return false;
            }
        }
        true
    }

    /// Removes every row satisfying the whole conjunction and returns how
    /// many went away. No conditions at all means delete everything.
    pub fn delete_rows(&mut self, conditions: &[Condition]) -> usize {
        if conditions.is_empty() {
            let count = self.rows.len();
            self.rows.clear();
            return count;
        }

        let mut kept = Vec::with_capacity(self.rows.len());
        let mut deleted = 0;
        for row in std::mem::take(&mut self.rows) {
            if self.row_matches(&row, conditions) {
                deleted += 1;
            } else {
                kept.push(row);
            }
        }
        self.rows = kept;
        deleted
    }

    /// Overwrites the assigned columns on every matching row and returns the
    /// number of rows touched. Assignments naming unknown columns are
    /// skipped; empty conditions mean every row matches.
    pub fn update_rows(&mut self, assignments: &[(String, String)], conditions: &[Condition]) -> usize {
        let targets: Vec<(usize, &str)> = assignments
            .iter()
            .filter_map(|(column, value)| {
                self.column_index(column).map(|index| (index, value.as_str()))
            })
            .collect();

        let matching: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| self.row_matches(row, conditions))
            .map(|(i, _)| i)
            .collect();

        for &i in &matching {
            for &(index, value) in &targets {
                self.rows[i].set_value(index, value.to_string());
            }
        }
        matching.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::condition::Operator;
    use crate::core::types::ColumnType;

    fn people() -> Table {
        let mut table = Table::new("people");
        let mut id = Column::new("id", ColumnType::Int);
        id.primary_key = true;
        table.add_column(id);
        table.add_column(Column::new("name", ColumnType::Varchar(20)));
        table.add_column(Column::new("age", ColumnType::Int));
        for (id, name, age) in [(1, "alice", 30), (2, "bob", 25), (3, "carol", 41)] {
            table.add_row(Row::new(vec![
                id.to_string(),
                name.to_string(),
                age.to_string(),
            ]));
        }
        table
    }

    #[test]
    fn column_lookup_is_case_insensitive() {
        let table = people();
        assert_eq!(table.column_index("AGE"), Some(2));
        assert_eq!(table.column_index("Name"), Some(1));
        assert_eq!(table.column_index("missing"), None);
    }

    #[test]
    fn primary_key_scan_uses_exact_string_equality() {
        let table = people();
        assert_eq!(table.primary_key_index(), Some(0));
        assert!(table.has_primary_key("2"));
        assert!(!table.has_primary_key("02"));
        assert!(!table.has_primary_key("4"));
    }

    #[test]
    fn table_without_primary_key_never_reports_duplicates() {
        let mut table = Table::new("t");
        table.add_column(Column::new("v", ColumnType::Int));
        table.add_row(Row::new(vec!["7".to_string()]));
        assert!(!table.has_primary_key("7"));
    }

    #[test]
    fn delete_without_conditions_clears_everything() {
        let mut table = people();
        assert_eq!(table.delete_rows(&[]), 3);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn delete_keeps_the_complement_in_order() {
        let mut table = people();
        let conditions = vec![Condition::new("age", Operator::Lt, "35")];
        assert_eq!(table.delete_rows(&conditions), 2);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows()[0].value(1), "carol");
    }

    #[test]
    fn delete_conjunction_requires_every_condition() {
        let mut table = people();
        let conditions = vec![
            Condition::new("age", Operator::Lt, "35"),
            Condition::new("name", Operator::Eq, "bob"),
        ];
        assert_eq!(table.delete_rows(&conditions), 1);
        let names: Vec<&str> = table.rows().iter().map(|r| r.value(1)).collect();
        assert_eq!(names, vec!["alice", "carol"]);
    }

    #[test]
    fn unknown_condition_column_is_vacuously_true() {
        // a condition on a missing column never excludes a row, so a delete
        // guarded only by such a condition removes every row
        let mut table = people();
        let conditions = vec![Condition::new("nope", Operator::Eq, "1")];
        assert_eq!(table.delete_rows(&conditions), 3);
    }

    #[test]
    fn update_touches_only_matching_rows() {
        let mut table = people();
        let assignments = vec![("age".to_string(), "50".to_string())];
        let conditions = vec![Condition::new("name", Operator::Eq, "bob")];
        assert_eq!(table.update_rows(&assignments, &conditions), 1);
        assert_eq!(table.rows()[1].value(2), "50");
        assert_eq!(table.rows()[0].value(2), "30");
    }

    #[test]
    fn update_without_conditions_touches_every_row() {
        let mut table = people();
        let assignments = vec![("age".to_string(), "0".to_string())];
        assert_eq!(table.update_rows(&assignments, &[]), 3);
        assert!(table.rows().iter().all(|r| r.value(2) == "0"));
    }

    #[test]
    fn update_skips_unknown_assignment_columns() {
        let mut table = people();
        let assignments = vec![
            ("ghost".to_string(), "1".to_string()),
            ("age".to_string(), "9".to_string()),
        ];
        assert_eq!(table.update_rows(&assignments, &[]), 3);
        assert_eq!(table.rows()[0].value(2), "9");
    }
}
