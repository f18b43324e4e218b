// ctydat Library
// cty.dat parsing and callsign -> country/zone/continent lookup

pub mod cty;

pub use cty::{
    parse_cty_dat, parse_file, parse_overrides, parse_reader, CountryRecord, CountryResolver,
    CtyError, PrefixOverrides, PrefixTable,
};
