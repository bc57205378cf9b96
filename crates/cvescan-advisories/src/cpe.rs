//! CPE URI parsing and vendor filtering.

/// The fields pulled out of a CPE URI that the matcher needs: the vendor
/// component, and whatever sits in the "version" position for that CPE
/// generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpeParts {
    pub vendor: Option<String>,
    pub version_field: Option<String>,
}

/// Split a CPE URI on unescaped colons (`\:` is a literal colon within a
/// field, per the CPE 2.3 binding).
fn split_unescaped_colons(uri: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = uri.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                current.push(next);
                continue;
            }
        }
        if c == ':' {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    fields.push(current);
    fields
}

/// Parse a CPE URI into its vendor and version-position fields.
///
/// Recognizes `cpe:2.3:<part>:<vendor>:<product>:<version>:…` (vendor at
/// index 3, version at index 5) and legacy `cpe:/<part>:<vendor>:<product>:…`
/// (vendor at index 2; we take the field immediately after product — index
/// 4 — as the version position, since the legacy binding doesn't carry
/// trailing update/edition/language fields as reliably as 2.3 does).
///
/// Returns `None` if the URI doesn't even start with the `cpe` scheme —
/// the caller falls back to a raw witness and a conservative accept in
/// that case.
pub fn parse_cpe(uri: &str) -> Option<CpeParts> {
    let fields = split_unescaped_colons(uri);
    if fields.first().map(|s| s.as_str()) != Some("cpe") {
        return None;
    }

    let is_2_3 = fields.get(1).map(|s| s.as_str()) == Some("2.3");
    let (vendor_idx, version_idx) = if is_2_3 { (3, 5) } else { (2, 4) };

    let vendor = fields.get(vendor_idx).cloned();
    let version_field = fields.get(version_idx).cloned();
    Some(CpeParts { vendor, version_field })
}

/// Vendor filter: if a query vendor is supplied and the CPE vendor is
/// present and not `*`, require a case-insensitive match. No query vendor
/// supplied, or no CPE vendor available, means the filter is disabled.
pub fn vendor_matches(query_vendor: Option<&str>, cpe_vendor: Option<&str>) -> bool {
    let Some(query_vendor) = query_vendor else {
        return true;
    };
    match cpe_vendor {
        None => true,
        Some(v) if v == "*" => true,
        Some(v) => v.eq_ignore_ascii_case(query_vendor),
    }
}
