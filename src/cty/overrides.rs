// Per-prefix override annotations
//
// An alias in a cty.dat prefix list may carry values that replace fields of
// its country for that alias only:
// (#)      CQ zone
// [#]      ITU zone
// <#/#>    latitude/longitude
// {aa}     continent
// ~#~      UTC offset
//
// Example: "=AA4Q(3)[6]{EU}" -> prefix "=AA4Q", cq 3, itu 6, continent EU

/// Characters that may open an annotation. A token containing none of them is
/// bound to the shared country record as-is.
const OVERRIDE_MARKERS: &[char] = &['(', '[', '<', '{', '~'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OverrideField {
    CqZone,
    ItuZone,
    Coordinates,
    Continent,
    TimeOffset,
}

/// Delimiter pairs, in the order annotations are stripped from the token
const OVERRIDE_DELIMITERS: &[(OverrideField, char, char)] = &[
    (OverrideField::CqZone, '(', ')'),
    (OverrideField::ItuZone, '[', ']'),
    (OverrideField::Coordinates, '<', '>'),
    (OverrideField::Continent, '{', '}'),
    (OverrideField::TimeOffset, '~', '~'),
];

/// Raw override values found in one alias token
///
/// Values are kept as the text between the delimiters; converting them to
/// numbers is up to the parser, which knows the line they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixOverrides {
    /// Token with every complete annotation removed
    pub prefix: String,
    pub cq_zone: Option<String>,
    pub itu_zone: Option<String>,
    pub coordinates: Option<String>,
    pub continent: Option<String>,
    pub time_offset: Option<String>,
}

impl PrefixOverrides {
    fn set(&mut self, field: OverrideField, value: String) {
        let slot = match field {
            OverrideField::CqZone => &mut self.cq_zone,
            OverrideField::ItuZone => &mut self.itu_zone,
            OverrideField::Coordinates => &mut self.coordinates,
            OverrideField::Continent => &mut self.continent,
            OverrideField::TimeOffset => &mut self.time_offset,
        };
        *slot = Some(value);
    }

    /// True if no annotation was complete, e.g. "=LZ1ABC[19"
    pub fn is_empty(&self) -> bool {
        self.cq_zone.is_none()
            && self.itu_zone.is_none()
            && self.coordinates.is_none()
            && self.continent.is_none()
            && self.time_offset.is_none()
    }
}

/// Extract override annotations from an alias token.
///
/// Returns None when the token has no annotation marker at all. A marker
/// without its closing delimiter still counts as present: the result then
/// has that field unset and the stray text left in `prefix`.
pub fn parse_overrides(token: &str) -> Option<PrefixOverrides> {
    if !has_override_marker(token) {
        return None;
    }

    let mut overrides = PrefixOverrides::default();
    for &(field, open, close) in OVERRIDE_DELIMITERS {
        if let Some((start, end)) = find_delimited(token, open, close, 0) {
            let inner = &token[start + open.len_utf8()..end];
            overrides.set(field, inner.to_string());
        }
    }

    let mut cleaned = token.to_string();
    for &(_, open, close) in OVERRIDE_DELIMITERS {
        cleaned = strip_delimited(&cleaned, open, close);
    }
    overrides.prefix = cleaned.trim().to_string();

    Some(overrides)
}

pub(crate) fn has_override_marker(token: &str) -> bool {
    token.contains(OVERRIDE_MARKERS)
}

/// Byte range of the first `open ... close` pair at or after `from`, as
/// (index of open, index of close). The closing delimiter is the nearest one.
fn find_delimited(s: &str, open: char, close: char, from: usize) -> Option<(usize, usize)> {
    let start = from + s[from..].find(open)?;
    let inner_start = start + open.len_utf8();
    let end = inner_start + s[inner_start..].find(close)?;
    Some((start, end))
}

/// Remove every complete `open ... close` pair, leaving unmatched delimiters
fn strip_delimited(s: &str, open: char, close: char) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pos = 0;
    while let Some((start, end)) = find_delimited(s, open, close, pos) {
        out.push_str(&s[pos..start]);
        pos = end + close.len_utf8();
    }
    out.push_str(&s[pos..]);
    out
}
