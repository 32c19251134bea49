use std::fmt;

use crate::core::types::ColumnType;

/// Comparators usable in a WHERE conjunct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Ne,
    Le,
    Ge,
    Eq,
    Lt,
    Gt,
}

impl Operator {
    /// Candidates in match priority order. Two-character operators come
    /// before their one-character prefixes, so `<=` is never read as `<`
    /// followed by a stray `=`.
    pub const PRIORITY: [Operator; 6] = [
        Operator::Ne,
        Operator::Le,
        Operator::Ge,
        Operator::Eq,
        Operator::Lt,
        Operator::Gt,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Ne => "!=",
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Gt => ">",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One `column operator literal` clause of an AND chain. Stateless; it is
/// evaluated against a row's raw field and that column's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: String,
    pub op: Operator,
    pub value: String,
}

impl Condition {
    pub fn new(column: impl Into<String>, op: Operator, value: impl Into<String>) -> Self {
        Condition {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// Evaluates against one raw stored field. Numeric columns compare both
    /// sides as f64; a side that does not parse degrades to 0 rather than
    /// erroring. Varchar columns compare ordinally on the raw text.
    pub fn evaluate(&self, actual: &str, ty: &ColumnType) -> bool {
        match ty {
            ColumnType::Int | ColumnType::Float => {
                let lhs: f64 = actual.trim().parse().unwrap_or(0.0);
                let rhs: f64 = self.value.trim().parse().unwrap_or(0.0);
                match self.op {
                    Operator::Eq => lhs == rhs,
                    Operator::Ne => lhs != rhs,
                    Operator::Lt => lhs < rhs,
                    Operator::Gt => lhs > rhs,
                    Operator::Le => lhs <= rhs,
                    Operator::Ge => lhs >= rhs,
                }
            }
            ColumnType::Varchar(_) => {
                let rhs = self.value.as_str();
                match self.op {
                    Operator::Eq => actual == rhs,
                    Operator::Ne => actual != rhs,
                    Operator::Lt => actual < rhs,
                    Operator::Gt => actual > rhs,
                    Operator::Le => actual <= rhs,
                    Operator::Ge => actual >= rhs,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_columns_compare_numerically() {
        let cond = Condition::new("age", Operator::Lt, "10");
        // lexicographically "9" > "10"; numerically 9 < 10
        assert!(cond.evaluate("9", &ColumnType::Int));
        assert!(!cond.evaluate("11", &ColumnType::Int));

        let cond = Condition::new("price", Operator::Ge, "12.5");
        assert!(cond.evaluate("12.5", &ColumnType::Float));
        assert!(cond.evaluate("13", &ColumnType::Float));
        assert!(!cond.evaluate("-3", &ColumnType::Float));
    }

    #[test]
    fn unparsable_numeric_literal_degrades_to_zero() {
        let cond = Condition::new("age", Operator::Eq, "abc");
        assert!(cond.evaluate("0", &ColumnType::Int));
        assert!(cond.evaluate("junk", &ColumnType::Int));
        assert!(!cond.evaluate("1", &ColumnType::Int));
    }

    #[test]
    fn varchar_columns_compare_ordinally() {
        let cond = Condition::new("name", Operator::Lt, "banana");
        assert!(cond.evaluate("apple", &ColumnType::Varchar(20)));
        assert!(!cond.evaluate("cherry", &ColumnType::Varchar(20)));

        let cond = Condition::new("name", Operator::Eq, "'x'");
        assert!(cond.evaluate("'x'", &ColumnType::Varchar(20)));
        assert!(!cond.evaluate("x", &ColumnType::Varchar(20)));
    }
}
