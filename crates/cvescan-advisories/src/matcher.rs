//! CPE Matcher.

use crate::cpe::{parse_cpe, vendor_matches};
use cvescan_core::{CpeMatch, CveRecord, Witness};
use cvescan_versioning::{satisfies, VersionBounds};

/// A vulnerability lookup query. `product` is not re-checked against the
/// CPE's product field here: the database client already scopes the CVE
/// set to a keyword search over `product`, so this matcher
/// only needs to narrow by vendor and version.
#[derive(Debug, Clone, Copy)]
pub struct MatchQuery<'a> {
    pub vendor: Option<&'a str>,
    pub product: &'a str,
    pub version: &'a str,
}

fn bounds_from(m: &CpeMatch) -> VersionBounds {
    VersionBounds {
        start_including: m.start_including.clone(),
        start_excluding: m.start_excluding.clone(),
        end_including: m.end_including.clone(),
        end_excluding: m.end_excluding.clone(),
    }
}

/// Evaluate one CPE match entry against the query. Returns the witness iff
/// it applies.
fn evaluate(m: &CpeMatch, query: &MatchQuery) -> Option<Witness> {
    if !m.vulnerable {
        return None;
    }

    let parts = parse_cpe(&m.cpe_uri);
    let cpe_vendor = parts.as_ref().and_then(|p| p.vendor.as_deref());
    if !vendor_matches(query.vendor, cpe_vendor) {
        return None;
    }

    if m.has_range_bound() {
        let bounds = bounds_from(m);
        return satisfies(query.version, &bounds).then(|| Witness::from_bounds(m));
    }

    match parts.as_ref().and_then(|p| p.version_field.as_deref()) {
        Some("*") | Some("-") => Some(Witness::from_version("*")),
        Some(v) => (v.trim() == query.version.trim()).then(|| Witness::from_version(v)),
        // The CPE URI itself is unparseable and carries no range bounds:
        // conservatively accept, same rationale as an unparseable version
        // in the range evaluator.
        None => Some(Witness::from_raw_cpe(&m.cpe_uri)),
    }
}

/// All distinct witnesses across a CVE's vulnerable CPE matches. Empty
/// means the CVE does not apply to this query.
pub fn matching_witnesses(cve: &CveRecord, query: &MatchQuery) -> Vec<Witness> {
    let mut witnesses = Vec::new();
    for m in &cve.cpe_matches {
        if let Some(w) = evaluate(m, query) {
            if !witnesses.contains(&w) {
                witnesses.push(w);
            }
        }
    }
    witnesses
}

/// Whether `cve` affects the query at all.
pub fn cve_matches(cve: &CveRecord, query: &MatchQuery) -> bool {
    !matching_witnesses(cve, query).is_empty()
}

/// Filter a batch of CVE records down to the ones that apply to the query.
pub fn filter_matching(cves: Vec<CveRecord>, query: &MatchQuery) -> Vec<CveRecord> {
    cves.into_iter().filter(|c| cve_matches(c, query)).collect()
}
