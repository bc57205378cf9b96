use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A CVE record as normalized from the public CVE feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CveRecord {
    pub id: String,
    pub description: Option<String>,
    pub cvss_score: Option<f64>,
    pub severity: Severity,
    pub published_date: Option<String>,
    pub cpe_matches: Vec<CpeMatch>,
}

impl CveRecord {
    /// Check the documented 0.0-10.0 CVSS range. Does not reject the
    /// record outright — callers log and keep it, the same fail-soft
    /// posture applied to every other normalization step in this pipeline.
    pub fn validate(&self) -> Result<()> {
        if let Some(score) = self.cvss_score {
            if !(0.0..=10.0).contains(&score) {
                return Err(CoreError::InvalidCvssScore {
                    cve_id: self.id.clone(),
                    score,
                });
            }
        }
        Ok(())
    }
}

/// Severity derives from the highest-version CVSS metric available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    None,
    Unknown,
}

impl Severity {
    /// Band a numeric CVSS v2 base score into a severity when no richer
    /// metric (v3/v4 `baseSeverity`) is available.
    pub fn from_cvss_score(score: f64) -> Self {
        if score >= 9.0 {
            Severity::Critical
        } else if score >= 7.0 {
            Severity::High
        } else if score >= 4.0 {
            Severity::Medium
        } else if score > 0.0 {
            Severity::Low
        } else {
            Severity::None
        }
    }
}

/// One row of vulnerability applicability from a CVE's CPE configuration.
///
/// Invariant: either at least one of the four bounds is present, or
/// `cpe_uri`'s sixth colon-delimited field carries a concrete version (or a
/// `*`/`-` wildcard).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpeMatch {
    pub cpe_uri: String,
    pub vulnerable: bool,
    pub start_including: Option<String>,
    pub start_excluding: Option<String>,
    pub end_including: Option<String>,
    pub end_excluding: Option<String>,
}

impl CpeMatch {
    pub fn has_range_bound(&self) -> bool {
        self.start_including.is_some()
            || self.start_excluding.is_some()
            || self.end_including.is_some()
            || self.end_excluding.is_some()
    }

    /// Check the invariant documented on this struct: a range bound, or a
    /// usable version field in the CPE URI's sixth component.
    pub fn validate(&self) -> Result<()> {
        if self.has_range_bound() {
            return Ok(());
        }
        match self.cpe_uri.split(':').nth(5) {
            Some(version) if !version.is_empty() => Ok(()),
            _ => Err(CoreError::InvalidCpeMatch {
                cpe_uri: self.cpe_uri.clone(),
            }),
        }
    }
}

/// Compact, deduplicated explanation of why a CPE match applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness(pub BTreeMap<String, String>);

impl Witness {
    pub fn from_bounds(m: &CpeMatch) -> Self {
        let mut fields = BTreeMap::new();
        if let Some(v) = &m.start_including {
            fields.insert("startIncluding".to_string(), v.clone());
        }
        if let Some(v) = &m.start_excluding {
            fields.insert("startExcluding".to_string(), v.clone());
        }
        if let Some(v) = &m.end_including {
            fields.insert("endIncluding".to_string(), v.clone());
        }
        if let Some(v) = &m.end_excluding {
            fields.insert("endExcluding".to_string(), v.clone());
        }
        Witness(fields)
    }

    pub fn from_version(version: &str) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("version".to_string(), version.to_string());
        Witness(fields)
    }

    pub fn from_raw_cpe(cpe_uri: &str) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("cpe_raw".to_string(), cpe_uri.to_string());
        Witness(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cvss_banding_matches_spec_thresholds() {
        assert_eq!(Severity::from_cvss_score(10.0), Severity::Critical);
        assert_eq!(Severity::from_cvss_score(9.0), Severity::Critical);
        assert_eq!(Severity::from_cvss_score(8.9), Severity::High);
        assert_eq!(Severity::from_cvss_score(7.0), Severity::High);
        assert_eq!(Severity::from_cvss_score(6.9), Severity::Medium);
        assert_eq!(Severity::from_cvss_score(4.0), Severity::Medium);
        assert_eq!(Severity::from_cvss_score(3.9), Severity::Low);
        assert_eq!(Severity::from_cvss_score(0.1), Severity::Low);
        assert_eq!(Severity::from_cvss_score(0.0), Severity::None);
    }

    #[test]
    fn witness_from_bounds_strips_absent_keys() {
        let m = CpeMatch {
            cpe_uri: "cpe:2.3:a:openssl:openssl:*:*:*:*:*:*:*:*".to_string(),
            vulnerable: true,
            start_including: Some("1.0.0".to_string()),
            start_excluding: None,
            end_including: None,
            end_excluding: Some("2.0.0".to_string()),
        };
        let w = Witness::from_bounds(&m);
        assert_eq!(w.0.len(), 2);
        assert_eq!(w.0.get("startIncluding").unwrap(), "1.0.0");
        assert_eq!(w.0.get("endExcluding").unwrap(), "2.0.0");
    }

    fn bare_cpe_match(cpe_uri: &str) -> CpeMatch {
        CpeMatch {
            cpe_uri: cpe_uri.to_string(),
            vulnerable: true,
            start_including: None,
            start_excluding: None,
            end_including: None,
            end_excluding: None,
        }
    }

    #[test]
    fn cpe_match_with_range_bound_is_valid_without_a_version_field() {
        let mut m = bare_cpe_match("cpe:2.3:a:openssl:openssl:-:*:*:*:*:*:*:*");
        m.start_including = Some("1.0.0".to_string());
        assert!(m.validate().is_ok());
    }

    #[test]
    fn cpe_match_with_concrete_version_field_is_valid_without_a_range_bound() {
        let m = bare_cpe_match("cpe:2.3:a:openssl:openssl:1.0.0:*:*:*:*:*:*:*");
        assert!(m.validate().is_ok());
    }

    #[test]
    fn cpe_match_with_wildcard_version_field_is_valid() {
        let m = bare_cpe_match("cpe:2.3:a:openssl:openssl:*:*:*:*:*:*:*:*");
        assert!(m.validate().is_ok());
    }

    #[test]
    fn cpe_match_with_neither_bound_nor_version_field_is_invalid() {
        let m = bare_cpe_match("cpe:2.3:a:openssl:openssl");
        assert!(matches!(m.validate(), Err(CoreError::InvalidCpeMatch { .. })));
    }

    #[test]
    fn cve_record_validate_rejects_out_of_range_cvss_score() {
        let record = CveRecord {
            id: "CVE-2024-9999".to_string(),
            description: None,
            cvss_score: Some(11.0),
            severity: Severity::Critical,
            published_date: None,
            cpe_matches: Vec::new(),
        };
        assert!(matches!(record.validate(), Err(CoreError::InvalidCvssScore { .. })));
    }

    #[test]
    fn cve_record_validate_accepts_in_range_cvss_score() {
        let record = CveRecord {
            id: "CVE-2024-9999".to_string(),
            description: None,
            cvss_score: Some(9.1),
            severity: Severity::Critical,
            published_date: None,
            cpe_matches: Vec::new(),
        };
        assert!(record.validate().is_ok());
    }
}
