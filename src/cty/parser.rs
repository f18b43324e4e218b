// cty.dat Parser
//
// Line grammar:
// # comment
// Name:CQ:ITU:Continent:Lat:Lon:UTC offset:Primary prefix:
//     alias,alias(cq)[itu],=EXACT/CALL{cont},...;
//
// A definition line sets the current country. The indented lines after it
// bind each alias to that country; aliases with override annotations get
// their own patched copy of the record.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::overrides::{has_override_marker, parse_overrides, PrefixOverrides};
use super::{CountryRecord, CtyError, PrefixTable};

/// Parse cty.dat text into a prefix table
///
/// Any malformed line aborts the whole parse; there is no partial table.
pub fn parse_cty_dat(content: &str) -> Result<PrefixTable, CtyError> {
    let mut table = PrefixTable::default();
    let mut country: Option<Arc<CountryRecord>> = None;

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;

        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with(char::is_whitespace) {
            let base = country.as_ref().ok_or_else(|| CtyError::MissingCountry {
                line: line_no,
                content: line.to_string(),
            })?;
            parse_prefix_line(line, line_no, base, &mut table)?;
        } else {
            let record = parse_country_line(line, line_no)?;
            log::debug!(
                "Country {} ({}): CQ {} ITU {} {}",
                record.name,
                record.primary_prefix,
                record.cq_zone,
                record.itu_zone,
                record.continent
            );
            let record = Arc::new(record);
            table.add_country(Arc::clone(&record));
            country = Some(record);
        }
    }

    log::info!(
        "Parsed cty.dat: {} countries, {} prefixes",
        table.countries().count(),
        table.len()
    );
    Ok(table)
}

/// Read all of `reader` and parse it
pub fn parse_reader<R: Read>(mut reader: R) -> Result<PrefixTable, CtyError> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    parse_cty_dat(&content)
}

/// Read a cty.dat / cty_wt.dat file from disk and parse it
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<PrefixTable, CtyError> {
    log::info!("Loading cty.dat from {:?}", path.as_ref());
    let content = fs::read_to_string(path)?;
    parse_cty_dat(&content)
}

fn parse_country_line(line: &str, line_no: usize) -> Result<CountryRecord, CtyError> {
    let mut parts: Vec<&str> = line.split(':').map(str::trim).collect();

    // Published files end every definition with ':'
    if parts.len() == 9 && parts[8].is_empty() {
        parts.pop();
    }

    if parts.len() != 8 {
        return Err(CtyError::format(
            line_no,
            line,
            format!("expected 8 colon-separated fields, found {}", parts.len()),
        ));
    }

    Ok(CountryRecord {
        name: parts[0].to_string(),
        cq_zone: parse_number(parts[1], "CQ zone", line_no, line)?,
        itu_zone: parse_number(parts[2], "ITU zone", line_no, line)?,
        continent: parts[3].to_string(),
        latitude: parse_number(parts[4], "latitude", line_no, line)?,
        longitude: parse_number(parts[5], "longitude", line_no, line)?,
        time_offset: parse_number(parts[6], "time offset", line_no, line)?,
        primary_prefix: parts[7].to_string(),
    })
}

fn parse_prefix_line(
    line: &str,
    line_no: usize,
    country: &Arc<CountryRecord>,
    table: &mut PrefixTable,
) -> Result<(), CtyError> {
    for token in line.trim().split(',') {
        let token = token.trim().trim_end_matches(';').trim();
        if token.is_empty() {
            continue;
        }

        match parse_overrides(token) {
            None => table.insert(token.to_string(), Arc::clone(country)),
            Some(overrides) => {
                if has_override_marker(&overrides.prefix) {
                    log::warn!(
                        "cty.dat line {}: unterminated override in {:?}, keeping it in the key",
                        line_no,
                        token
                    );
                }
                let record = apply_overrides(country, &overrides, line_no, line)?;
                table.insert(overrides.prefix, Arc::new(record));
            }
        }
    }
    Ok(())
}

/// Copy of `base` with the zone, continent and offset overrides applied.
/// Coordinate overrides are not applied.
fn apply_overrides(
    base: &CountryRecord,
    overrides: &PrefixOverrides,
    line_no: usize,
    line: &str,
) -> Result<CountryRecord, CtyError> {
    let mut record = base.clone();

    if let Some(cq) = &overrides.cq_zone {
        record.cq_zone = parse_number(cq, "CQ zone override", line_no, line)?;
    }
    if let Some(itu) = &overrides.itu_zone {
        record.itu_zone = parse_number(itu, "ITU zone override", line_no, line)?;
    }
    if let Some(continent) = &overrides.continent {
        record.continent = continent.clone();
    }
    if let Some(offset) = &overrides.time_offset {
        record.time_offset = parse_number(offset, "time offset override", line_no, line)?;
    }

    Ok(record)
}

fn parse_number<T: FromStr>(
    value: &str,
    what: &str,
    line_no: usize,
    line: &str,
) -> Result<T, CtyError> {
    value
        .trim()
        .parse()
        .map_err(|_| CtyError::format(line_no, line, format!("invalid {} {:?}", what, value)))
}
