use std::fmt;

/// Declared column type. Only `Varchar` carries a size bound; the bound is
/// a maximum character count, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Varchar(usize),
}

impl ColumnType {
    /// Numeric tag used by the store format.
    pub fn type_code(&self) -> u8 {
        match self {
            ColumnType::Int => 0,
            ColumnType::Float => 1,
            ColumnType::Varchar(_) => 2,
        }
    }

    /// Size field for the store format; zero for the sizeless types.
    pub fn size(&self) -> usize {
        match self {
            ColumnType::Int | ColumnType::Float => 0,
            ColumnType::Varchar(n) => *n,
        }
    }

    pub fn from_code(code: u8, size: usize) -> Option<Self> {
        match code {
            0 => Some(ColumnType::Int),
            1 => Some(ColumnType::Float),
            2 => Some(ColumnType::Varchar(size)),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Int => write!(f, "INT"),
            ColumnType::Float => write!(f, "FLOAT"),
            ColumnType::Varchar(n) => write!(f, "VARCHAR({})", n),
        }
    }
}

/// One column of a table schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    pub primary_key: bool,
    pub not_null: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Column {
            name: name.into(),
            ty,
            primary_key: false,
            not_null: false,
        }
    }

    /// Full textual definition, e.g. `id INT PRIMARY KEY`.
    pub fn definition(&self) -> String {
        let mut out = format!("{} {}", self.name, self.ty);
        if self.primary_key {
            out.push_str(" PRIMARY KEY");
        }
        if self.not_null {
            out.push_str(" NOT NULL");
        }
        out
    }
}

/// One stored row: raw text fields, positionally aligned with the owning
/// table's column list. Values stay text whatever the declared type; typed
/// interpretation happens at condition-evaluation time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    values: Vec<String>,
}

impl Row {
    pub fn new(values: Vec<String>) -> Self {
        Row { values }
    }

    pub fn push(&mut self, value: String) {
        self.values.push(value);
    }

    /// Field at `index`; out-of-range reads as the empty string.
    pub fn value(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn set_value(&mut self, index: usize, value: String) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
