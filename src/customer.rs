use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::Schema;
use crate::registry::PostalCodeRegistry;

/// A customer's partial assignment of the reference schema. The postal-code
/// column is set from construction; the other columns start unset and are
/// back-filled from a matched reference entry during validation.
#[derive(Debug, PartialEq, Eq)]
pub struct PostalRecord {
    values: Vec<Option<String>>,
    postal_index: usize,
}

impl PostalRecord {
    pub fn new(schema: &Schema, postal_code: String) -> Self {
        let mut values = vec![None; schema.len()];
        values[schema.postal_index()] = Some(postal_code);
        Self {
            values,
            postal_index: schema.postal_index(),
        }
    }

    pub fn postal_code(&self) -> &str {
        // Set in the constructor and never cleared.
        self.values[self.postal_index].as_deref().unwrap()
    }

    /// Checks the postal code against the registry. On a match, every unset
    /// column is filled in from the matched reference entry; on no match the
    /// record is left exactly as it was.
    pub fn validate(&mut self, registry: &PostalCodeRegistry) -> bool {
        let Some(entry) = registry.lookup_prefix(self.postal_code()) else {
            return false;
        };
        for (slot, value) in self.values.iter_mut().zip(entry.values()) {
            if slot.is_none() {
                *slot = Some(value.clone());
            }
        }
        true
    }

    /// The column values in schema order; unset columns are empty strings.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|v| v.as_deref().unwrap_or(""))
    }
}

impl std::fmt::Display for PostalRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, value) in self.values().enumerate() {
            if i != 0 {
                f.write_str(",")?;
            }
            f.write_str(value)?;
        }
        Ok(())
    }
}

// At least nine ASCII digits, nothing else. Checked before the checksum so
// the checksum only ever sees digit bytes.
static CARD_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{9,}$").unwrap());

/// Checksum verdict for a raw credit-card number. Never panics: anything
/// shorter than nine characters or containing a non-digit is simply invalid.
///
/// Walking from the rightmost digit, digits at even offsets are summed
/// directly; digits at odd offsets (so starting from the second-to-last) are
/// doubled and their digit sums added. The number is valid when the combined
/// sum is a multiple of ten. The existing card data validates under exactly
/// this parity, so keep it even where published descriptions of the checksum
/// differ.
pub fn validate_credit_card(number: &str) -> bool {
    if !CARD_SHAPE.is_match(number) {
        return false;
    }
    let mut sum1 = 0;
    let mut sum2 = 0;
    for (offset, byte) in number.bytes().rev().enumerate() {
        let digit = u32::from(byte - b'0');
        if offset % 2 == 0 {
            sum1 += digit;
        } else {
            sum2 += digit_sum(digit * 2);
        }
    }
    (sum1 + sum2) % 10 == 0
}

/// Sum of the decimal digits of `n`.
fn digit_sum(mut n: u32) -> u32 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

/// One customer entry: identity, name fields, city, the postal sub-record,
/// and the raw credit-card number. Only stored once both validations pass.
#[derive(Debug)]
pub struct Customer {
    id: u32,
    first_name: String,
    last_name: String,
    city: String,
    postal: PostalRecord,
    credit_card_number: String,
}

impl Customer {
    pub fn new(
        id: u32,
        first_name: String,
        last_name: String,
        city: String,
        schema: &Schema,
        postal_code: String,
        credit_card_number: String,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            city,
            postal: PostalRecord::new(schema, postal_code),
            credit_card_number,
        }
    }

    /// Postal check with back-fill on success, see [`PostalRecord::validate`].
    pub fn validate_postal(&mut self, registry: &PostalCodeRegistry) -> bool {
        self.postal.validate(registry)
    }

    pub fn validate_credit_card(&self) -> bool {
        validate_credit_card(&self.credit_card_number)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn postal(&self) -> &PostalRecord {
        &self.postal
    }

    pub fn credit_card_number(&self) -> &str {
        &self.credit_card_number
    }
}

impl std::fmt::Display for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{}",
            self.id,
            self.last_name,
            self.first_name,
            self.city,
            self.postal,
            self.credit_card_number
        )
    }
}
