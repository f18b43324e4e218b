// Callsign -> country resolution over a parsed cty.dat table

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use super::parser::{parse_cty_dat, parse_file, parse_reader};
use super::{CountryRecord, CtyError, PrefixTable};

/// Read-only resolver built from one cty.dat file
///
/// The table is never modified after construction, so a resolver can be
/// shared between threads behind an Arc without locking.
#[derive(Debug, Clone)]
pub struct CountryResolver {
    table: PrefixTable,
}

impl CountryResolver {
    pub fn new(table: PrefixTable) -> Self {
        Self { table }
    }

    /// Build from cty.dat text
    pub fn parse(content: &str) -> Result<Self, CtyError> {
        parse_cty_dat(content).map(Self::new)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CtyError> {
        parse_reader(reader).map(Self::new)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CtyError> {
        parse_file(path).map(Self::new)
    }

    pub fn table(&self) -> &PrefixTable {
        &self.table
    }

    /// Look up the country for a callsign (case-insensitive).
    ///
    /// An exact entry ("=CALL") wins; otherwise the longest stored prefix of
    /// the callsign is used. Returns None if nothing matches.
    pub fn lookup(&self, callsign: &str) -> Option<&CountryRecord> {
        let call = callsign.trim().to_uppercase();
        let exact_key = format!("={}", call);

        if let Some(record) = self.table.get(&exact_key) {
            log::trace!("{}: exact match {}", call, record.name);
            return Some(record);
        }

        // Prefix ends at every char boundary, longest first
        let mut ends: Vec<usize> = call.char_indices().map(|(i, _)| i).skip(1).collect();
        if !call.is_empty() {
            ends.push(call.len());
        }

        for &end in ends.iter().rev() {
            if let Some(record) = self.table.get(&call[..end]) {
                log::trace!("{}: prefix {} -> {}", call, &call[..end], record.name);
                return Some(record);
            }
        }

        log::trace!("{}: no match", call);
        None
    }

    /// Country definitions, sorted by name
    pub fn countries_by_name(&self) -> Vec<&CountryRecord> {
        let mut countries: Vec<&CountryRecord> = self.table.countries().collect();
        countries.sort_by(|a, b| a.name.cmp(&b.name));
        countries
    }

    /// Find a country by name (case-insensitive)
    pub fn country_by_name(&self, name: &str) -> Option<&CountryRecord> {
        let name_lower = name.trim().to_lowercase();
        self.table
            .countries()
            .find(|c| c.name.to_lowercase() == name_lower)
    }

    /// All keys bound to the country with this primary prefix, sorted
    pub fn prefixes_for(&self, primary_prefix: &str) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .table
            .iter()
            .filter(|(_, record)| record.primary_prefix == primary_prefix)
            .map(|(key, _)| key)
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Dump the whole table as JSON, keys sorted, four-space indent
    pub fn to_json(&self) -> Result<String, CtyError> {
        let sorted: BTreeMap<&str, &CountryRecord> = self
            .table
            .iter()
            .map(|(key, record)| (key, record.as_ref()))
            .collect();

        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        sorted.serialize(&mut serializer)?;

        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cty::overrides::has_override_marker;
    use crate::cty::{init_test_logging, SAMPLE_CTY};

    fn sample() -> CountryResolver {
        CountryResolver::parse(SAMPLE_CTY).unwrap()
    }

    #[test]
    fn test_prefix_lookup() {
        init_test_logging();
        let cty = sample();
        assert_eq!(cty.lookup("LZ1XYZ").unwrap().name, "Bulgaria");
        assert_eq!(cty.lookup("W1ABC").unwrap().name, "United States");
        assert_eq!(cty.lookup("KH6ABC").unwrap().name, "Hawaii");
        assert_eq!(cty.lookup("K1ABC").unwrap().name, "United States");
        assert_eq!(cty.lookup("BV9SAB").unwrap().name, "Spratly Islands");
    }

    #[test]
    fn test_case_and_whitespace() {
        let cty = sample();
        assert_eq!(cty.lookup("  lz1xyz \n").unwrap().name, "Bulgaria");
        assert_eq!(cty.lookup("kh6abc").unwrap().cq_zone, 31);
    }

    #[test]
    fn test_longest_prefix_wins() {
        let cty = sample();
        // R is European Russia, R8 and R0 are Asiatic Russia
        assert_eq!(cty.lookup("RA3AA").unwrap().name, "European Russia");
        assert_eq!(cty.lookup("R8ABC").unwrap().name, "Asiatic Russia");

        let r0 = cty.lookup("R0FA").unwrap();
        assert_eq!(r0.name, "Asiatic Russia");
        assert_eq!((r0.cq_zone, r0.itu_zone), (19, 34));
    }

    #[test]
    fn test_longest_prefix_generic() {
        let text = concat!(
            "Short: 1: 1: EU: 0: 0: 0: L:\n    L;\n",
            "Long: 20: 28: EU: 0: 0: 0: LZ:\n    LZ;\n",
        );
        let cty = CountryResolver::parse(text).unwrap();
        assert_eq!(cty.lookup("LZ1ABC").unwrap().name, "Long");
        assert_eq!(cty.lookup("LA1ABC").unwrap().name, "Short");
    }

    #[test]
    fn test_exact_match_wins() {
        let cty = sample();
        let rec = cty.lookup("AA5UZ").unwrap();
        assert_eq!(rec.cq_zone, 4);
        assert_eq!(rec.itu_zone, 8);

        // same prefix, not the exact call
        assert_eq!(cty.lookup("AA5UY").unwrap().cq_zone, 5);

        // exact call shadows a longer-matching country
        assert_eq!(cty.lookup("R8MB/1").unwrap().name, "European Russia");
        assert_eq!(cty.lookup("R8MB/1").unwrap().cq_zone, 17);
        assert_eq!(cty.lookup("R8MB").unwrap().name, "Asiatic Russia");
    }

    #[test]
    fn test_exact_match_over_generic_prefix() {
        let text = concat!(
            "US: 5: 8: NA: 0: 0: 5: K:\n    US;\n",
            "Other: 14: 27: EU: 0: 0: 0: X:\n    =AB1CD;\n",
        );
        let cty = CountryResolver::parse(text).unwrap();
        assert_eq!(cty.lookup("AB1CD").unwrap().name, "Other");
    }

    #[test]
    fn test_exact_entries_are_not_prefixes() {
        let cty = sample();
        // "=RC4I" only matches RC4I itself
        assert_eq!(cty.lookup("RC4IX").unwrap().primary_prefix, "UA");
        assert_eq!(cty.lookup("RC4IX").unwrap().name, "European Russia");
    }

    #[test]
    fn test_not_found() {
        let cty = sample();
        assert!(cty.lookup("ZZZZZ").is_none());
        assert!(cty.lookup("").is_none());
        assert!(cty.lookup("   ").is_none());
    }

    #[test]
    fn test_non_ascii_input() {
        let cty = sample();
        assert_eq!(cty.lookup("LZ1ÄB").unwrap().name, "Bulgaria");
        assert!(cty.lookup("ÄÖÜ").is_none());
    }

    #[test]
    fn test_idempotent_build() {
        let a = sample();
        let b = sample();
        for call in ["LZ1ABC", "AA5UZ", "R0FA", "W1AW/KH6", "ZZZZZ", "BV9SAB", "lz1abc[19"] {
            assert_eq!(a.lookup(call), b.lookup(call), "call {}", call);
        }
    }

    #[test]
    fn test_every_plain_alias_resolves_to_its_country() {
        let cty = sample();
        for (key, record) in cty.table().iter() {
            if has_override_marker(key) {
                continue;
            }
            let call = key.trim_start_matches('=');
            assert_eq!(cty.lookup(call), Some(record.as_ref()), "key {}", key);
        }
    }

    #[test]
    fn test_countries_by_name() {
        let cty = sample();
        let names: Vec<&str> = cty.countries_by_name().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Asiatic Russia",
                "Bulgaria",
                "European Russia",
                "Hawaii",
                "Spratly Islands",
                "United States",
            ]
        );
        assert_eq!(cty.country_by_name("hawaii").unwrap().primary_prefix, "KH6");
        assert!(cty.country_by_name("Atlantis").is_none());
    }

    #[test]
    fn test_prefixes_for() {
        let cty = sample();
        assert_eq!(cty.prefixes_for("LZ"), vec!["=LZ0A", "=LZ1ABC", "=LZ1ABC[19", "LZ"]);
        assert_eq!(cty.prefixes_for("KH6").len(), 8);
        assert!(cty.prefixes_for("XX").is_empty());
    }

    #[test]
    fn test_to_json() {
        let cty = sample();
        let json = cty.to_json().unwrap();
        let head = "{\n    \"1S\": {\n        \"name\": \"Spratly Islands\"";
        assert!(json.starts_with(head), "{}", &json[..80]);

        let parsed: BTreeMap<String, CountryRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), cty.table().len());
        assert_eq!(parsed["=AA5UZ"].cq_zone, 4);
    }
}
