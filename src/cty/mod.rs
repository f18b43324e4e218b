// cty.dat country file support
// Format reference: https://www.country-files.com/cty-dat-format/
//
// The text is parsed once into a PrefixTable, which is read-only afterwards.
// Lookups go through CountryResolver:
// - exact callsign entries ("=W1AW/KH6") win over everything
// - otherwise the longest stored prefix of the callsign wins

pub mod error;
pub mod overrides;
pub mod parser;
pub mod resolver;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use error::CtyError;
pub use overrides::{parse_overrides, PrefixOverrides};
pub use parser::{parse_cty_dat, parse_file, parse_reader};
pub use resolver::CountryResolver;

/// One country (DXCC entity or WAE region) as defined in cty.dat
///
/// Longitude and `time_offset` keep the cty.dat sign convention, where
/// positive means west of Greenwich (United States: 5.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    pub cq_zone: u8,
    pub itu_zone: u8,
    pub continent: String,
    pub latitude: f64,
    pub longitude: f64,
    pub time_offset: f64,
    pub primary_prefix: String,
}

/// Prefix key -> country record
///
/// Keys are plain prefixes ("LZ") or exact callsigns ("=LZ1ABC"). Keys bound
/// without overrides share their country's Arc; overridden keys own a patched
/// copy.
#[derive(Debug, Clone, Default)]
pub struct PrefixTable {
    entries: HashMap<String, Arc<CountryRecord>>,
    /// Country definitions in file order
    countries: Vec<Arc<CountryRecord>>,
}

impl PrefixTable {
    pub(crate) fn add_country(&mut self, record: Arc<CountryRecord>) {
        self.countries.push(record);
    }

    pub(crate) fn insert(&mut self, key: String, record: Arc<CountryRecord>) {
        self.entries.insert(key, record);
    }

    pub fn get(&self, key: &str) -> Option<&CountryRecord> {
        self.entries.get(key).map(|r| r.as_ref())
    }

    /// Shared handle for a key, for callers that keep records around
    pub fn get_shared(&self, key: &str) -> Option<Arc<CountryRecord>> {
        self.entries.get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    /// Un-overridden country records, in the order they were defined
    pub fn countries(&self) -> impl Iterator<Item = &CountryRecord> {
        self.countries.iter().map(|r| r.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<CountryRecord>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
pub(crate) const SAMPLE_CTY: &str = include_str!("../../testdata/cty_sample.dat");

#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
