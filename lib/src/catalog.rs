//! The circuit catalog.
//!
//! An externally maintained, read-only table mapping rule integers to
//! minimal Boolean circuits, stored as line-oriented text:
//!
//! ```text
//! 3080:  12143031020413100100
//! ```
//!
//! The catalog is loaded once and shared read-only for the lifetime of a
//! run; lookups never touch the file again.

use crate::{circuit::Circuit, error::Error};
use std::{collections::HashMap, fs::File, io::BufRead, io::BufReader, path::Path};

/// The five rule integers whose circuits bypass the catalog.
///
/// These are the degenerate quaternary functions (constant zero and the
/// four trivial projections); their identifiers are fixed.
const RESERVED: [(u16, &str); 5] = [
    (0, "-004"),
    (65280, "-331"),
    (61680, "-221"),
    (52428, "-111"),
    (43690, "-001"),
];

/// An immutable catalog of circuit identifiers keyed by rule integer.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    identifiers: HashMap<u16, String>,
}

impl Catalog {
    /// Loads a catalog from a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Ok(Self::from_reader(BufReader::new(File::open(path)?))?)
    }

    /// Loads a catalog from any buffered reader.
    ///
    /// Malformed lines (bad key, bad separator, ill-formed identifier) are
    /// skipped rather than fatal: the catalog is a large externally
    /// maintained dataset. When several lines share a key, the last one
    /// wins, matching the original full-file scan.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, std::io::Error> {
        let mut identifiers = HashMap::new();
        for line in reader.lines() {
            let line = line?;
            let (key, identifier) = match line.split_once(":  ") {
                Some(parts) => parts,
                None => continue,
            };
            let key: u16 = match key.trim().parse() {
                Ok(key) => key,
                Err(_) => continue,
            };
            let identifier = identifier.trim_end();
            if Circuit::decode(identifier).is_none() {
                continue;
            }
            identifiers.insert(key, identifier.to_string());
        }
        Ok(Catalog { identifiers })
    }

    /// The number of catalogued rules, not counting the reserved ones.
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    /// Whether the catalog file contributed no entries.
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Resolves a rule integer to its circuit identifier.
    ///
    /// The five reserved integers resolve to their fixed identifiers even
    /// if the catalog carries an entry for them.
    pub fn identifier(&self, rule_integer: u16) -> Result<&str, Error> {
        if let Some((_, identifier)) = RESERVED.iter().find(|&&(k, _)| k == rule_integer) {
            return Ok(identifier);
        }
        self.identifiers
            .get(&rule_integer)
            .map(String::as_str)
            .ok_or(Error::UnknownCircuit(rule_integer))
    }

    /// Resolves and decodes the circuit for a rule integer.
    pub fn circuit(&self, rule_integer: u16) -> Result<Circuit, Error> {
        let identifier = self.identifier(rule_integer)?;
        // Identifiers were validated at load time; reserved ones are fixed.
        Circuit::decode(identifier).ok_or(Error::UnknownCircuit(rule_integer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Op;

    #[test]
    fn reserved_bypass_catalog() {
        let catalog = Catalog::default();
        let circuit = catalog.circuit(0).unwrap();
        assert_eq!(circuit.len(), 1);
        assert_eq!(circuit.steps()[0].op, Op::Xor);
        assert_eq!(circuit.steps()[0].src1, circuit.steps()[0].src2);
    }

    #[test]
    fn reserved_override_catalog_entries() {
        let catalog = Catalog::from_reader("0:  -014\n".as_bytes()).unwrap();
        assert_eq!(catalog.identifier(0).unwrap(), "-004");
    }

    #[test]
    fn unknown_rule_is_fatal() {
        let catalog = Catalog::default();
        assert_eq!(
            catalog.circuit(3080).unwrap_err(),
            Error::UnknownCircuit(3080)
        );
    }

    #[test]
    fn last_duplicate_wins() {
        let text = "123:  -004\n123:  -014\n";
        let catalog = Catalog::from_reader(text.as_bytes()).unwrap();
        assert_eq!(catalog.identifier(123).unwrap(), "-014");
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let text = "not a line\n77: -004\n99:  xyzw\n123:  -004\n";
        let catalog = Catalog::from_reader(text.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.identifier(123).unwrap(), "-004");
        assert!(catalog.identifier(77).is_err());
        assert!(catalog.identifier(99).is_err());
    }
}
