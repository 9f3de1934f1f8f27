use std::io::BufRead;

use crate::record::{self, ReferenceRecord, Schema, SchemaError};

/// Delimiter used by the postal-code reference table.
pub const REFERENCE_DELIMITER: char = '|';

/// The reference table of known postal codes, loaded once per session from
/// text supplied by the caller and immutable afterwards.
pub struct PostalCodeRegistry {
    schema: Schema,
    // Load order matters for lookups, so this is a Vec rather than a map.
    entries: Vec<ReferenceRecord>,
    skipped: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing header line")]
    MissingHeader,
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl PostalCodeRegistry {
    /// Loads the registry: a `|`-separated header line defining the schema,
    /// then one record per line until an empty line or end of input. Data
    /// lines whose field count does not match the schema are skipped and
    /// counted rather than aborting the load.
    pub fn load(reader: impl BufRead) -> Result<Self, RegistryError> {
        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(line) => line?,
            None => return Err(RegistryError::MissingHeader),
        };
        let schema = Schema::new(record::split(&header, REFERENCE_DELIMITER))?;

        let mut entries = Vec::new();
        let mut skipped = 0;
        for line in lines {
            let line = line?;
            if line.is_empty() {
                break;
            }
            let values = record::split(&line, REFERENCE_DELIMITER);
            if values.len() != schema.len() {
                skipped += 1;
                continue;
            }
            entries.push(ReferenceRecord::new(values));
        }

        Ok(Self {
            schema,
            entries,
            skipped,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of malformed data lines dropped during loading.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Finds the reference entry whose postal-code prefix equals the queried
    /// code's prefix. Every entry is scanned; when several entries share a
    /// prefix, the last one in load order wins.
    // TODO: confirm with the reference-data owners whether duplicate
    // prefixes are expected at all; if not, first match would do and the
    // scan could stop early.
    pub fn lookup_prefix(&self, code: &str) -> Option<&ReferenceRecord> {
        let wanted = record::prefix(code);
        let mut found = None;
        for entry in &self.entries {
            if record::prefix(entry.postal_code(&self.schema)) == wanted {
                found = Some(entry);
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(data: &str) -> PostalCodeRegistry {
        PostalCodeRegistry::load(data.as_bytes()).unwrap()
    }

    #[test]
    fn test_load() {
        let registry = load(
            "Postal Code|Place Name|Province\n\
             ABC123|Town|ON\n\
             XYZ789|Village|BC\n",
        );
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.skipped(), 0);
        assert_eq!(
            registry.schema().columns(),
            &["Postal Code", "Place Name", "Province"]
        );
    }

    #[test]
    fn test_load_stops_at_empty_line() {
        let registry = load(
            "Postal Code|Place Name\n\
             ABC123|Town\n\
             \n\
             XYZ789|Village\n",
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_load_skips_malformed_lines() {
        // Wrong field counts are skipped and counted, not fatal.
        let registry = load(
            "Postal Code|Place Name|Province\n\
             ABC123|Town\n\
             XYZ789|Village|BC|extra\n\
             DEF456|City|AB\n",
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.skipped(), 2);
    }

    #[test]
    fn test_load_missing_header() {
        assert!(matches!(
            PostalCodeRegistry::load("".as_bytes()),
            Err(RegistryError::MissingHeader)
        ));
    }

    #[test]
    fn test_load_missing_postal_column_is_fatal() {
        assert!(matches!(
            PostalCodeRegistry::load("Place Name|Province\nTown|ON\n".as_bytes()),
            Err(RegistryError::Schema(SchemaError::MissingPostalColumn))
        ));
    }

    #[test]
    fn test_lookup_prefix_matches_on_first_three_characters() {
        let registry = load("Postal Code|Place Name\nABC123|Town\n");
        // The queried code is compared by prefix too, so any code sharing
        // the first three characters matches.
        let entry = registry.lookup_prefix("ABC999").unwrap();
        assert_eq!(entry.values(), &["ABC123", "Town"]);
        assert!(registry.lookup_prefix("ABD999").is_none());
    }

    #[test]
    fn test_lookup_prefix_last_match_wins() {
        let registry = load(
            "Postal Code|Place Name\n\
             ABC123|Town\n\
             ABC456|Other Town\n",
        );
        let entry = registry.lookup_prefix("ABC000").unwrap();
        assert_eq!(entry.values(), &["ABC456", "Other Town"]);
    }

    #[test]
    fn test_lookup_prefix_short_code() {
        // Codes shorter than three characters compare their whole value.
        let registry = load("Postal Code|Place Name\nAB|Hamlet\n");
        assert!(registry.lookup_prefix("AB").is_some());
        assert!(registry.lookup_prefix("ABC").is_none());
    }
}
