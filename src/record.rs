/// Splits a line on a single-character delimiter. No quoting or escaping: a
/// line with N delimiters always yields N+1 fields, with empty fields for
/// consecutive, leading, or trailing delimiters. An empty line yields one
/// empty field.
pub fn split(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter).map(str::to_owned).collect()
}

/// The first three characters of a postal code, or the whole code if it is
/// shorter. Both sides of every postal-code comparison go through this, so
/// full codes and bare prefixes compare consistently.
pub fn prefix(code: &str) -> &str {
    match code.char_indices().nth(3) {
        Some((i, _)) => &code[..i],
        None => code,
    }
}

/// The column every reference table must carry.
pub const POSTAL_CODE_COLUMN: &str = "Postal Code";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("no column named \"{POSTAL_CODE_COLUMN}\"")]
    MissingPostalColumn,
    #[error("duplicate column \"{0}\"")]
    DuplicateColumn(String),
}

/// The ordered column names shared by reference records and customer postal
/// sub-records. Immutable once built; the position of the postal-code column
/// is resolved here, once, and reused everywhere.
#[derive(Debug, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
    postal_index: usize,
}

impl Schema {
    pub fn new(columns: Vec<String>) -> Result<Self, SchemaError> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) {
                return Err(SchemaError::DuplicateColumn(column.clone()));
            }
        }
        let postal_index = columns
            .iter()
            .position(|c| c == POSTAL_CODE_COLUMN)
            .ok_or(SchemaError::MissingPostalColumn)?;
        Ok(Self {
            columns,
            postal_index,
        })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn postal_index(&self) -> usize {
        self.postal_index
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// One row of the reference table: a value for every schema column. Owned by
/// the registry and immutable after load.
#[derive(Debug, PartialEq, Eq)]
pub struct ReferenceRecord {
    values: Vec<String>,
}

impl ReferenceRecord {
    // Only the registry constructs these, and it checks the field count
    // against the schema first.
    pub(crate) fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn postal_code(&self, schema: &Schema) -> &str {
        &self.values[schema.postal_index()]
    }
}
