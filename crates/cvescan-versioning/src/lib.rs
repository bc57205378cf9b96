//! Version Range Evaluator.
//!
//! Decides whether a concrete version string satisfies a CPE-style version
//! constraint expressed as up to four optional bounds. Every failure mode
//! is conservative: an unparseable concrete version, an unparseable bound,
//! or the `unknown`/`any` sentinel all resolve to "satisfies" so a possible
//! vulnerability is never silently hidden.

mod version;

use version::ParsedVersion;

/// The four optional comparators a CPE match may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionBounds {
    pub start_including: Option<String>,
    pub start_excluding: Option<String>,
    pub end_including: Option<String>,
    pub end_excluding: Option<String>,
}

impl VersionBounds {
    pub fn is_empty(&self) -> bool {
        self.start_including.is_none()
            && self.start_excluding.is_none()
            && self.end_including.is_none()
            && self.end_excluding.is_none()
    }
}

fn is_sentinel(version: &str) -> bool {
    matches!(version.trim().to_lowercase().as_str(), "unknown" | "any")
}

/// `satisfies(concrete_version, bounds) -> bool`.
pub fn satisfies(concrete_version: &str, bounds: &VersionBounds) -> bool {
    if is_sentinel(concrete_version) {
        return true;
    }

    let v = match ParsedVersion::parse(concrete_version) {
        Some(v) => v,
        None => return true,
    };

    if bounds.is_empty() {
        return true;
    }

    // A single unparseable bound makes the whole decision conservative:
    // we cannot be sure which side of that bound the real version falls on.
    let parsed_bounds = match parse_all_bounds(bounds) {
        Some(parsed) => parsed,
        None => return true,
    };

    if let Some(start_including) = &parsed_bounds.start_including {
        if v < *start_including {
            return false;
        }
    }
    if let Some(start_excluding) = &parsed_bounds.start_excluding {
        if v <= *start_excluding {
            return false;
        }
    }
    if let Some(end_including) = &parsed_bounds.end_including {
        if v > *end_including {
            return false;
        }
    }
    if let Some(end_excluding) = &parsed_bounds.end_excluding {
        if v >= *end_excluding {
            return false;
        }
    }

    true
}

struct ParsedBounds {
    start_including: Option<ParsedVersion>,
    start_excluding: Option<ParsedVersion>,
    end_including: Option<ParsedVersion>,
    end_excluding: Option<ParsedVersion>,
}

fn parse_all_bounds(bounds: &VersionBounds) -> Option<ParsedBounds> {
    Some(ParsedBounds {
        start_including: parse_bound(&bounds.start_including)?,
        start_excluding: parse_bound(&bounds.start_excluding)?,
        end_including: parse_bound(&bounds.end_including)?,
        end_excluding: parse_bound(&bounds.end_excluding)?,
    })
}

/// `None` means "absent, fine"; `Some(None)` is the failure signal that
/// short-circuits the outer `parse_all_bounds` via `?`.
fn parse_bound(bound: &Option<String>) -> Option<Option<ParsedVersion>> {
    match bound {
        None => Some(None),
        Some(text) => ParsedVersion::parse(text).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(start_inc: Option<&str>, end_exc: Option<&str>) -> VersionBounds {
        VersionBounds {
            start_including: start_inc.map(String::from),
            start_excluding: None,
            end_including: None,
            end_excluding: end_exc.map(String::from),
        }
    }

    // CPE version range.
    #[test]
    fn s3_version_in_range_matches() {
        let b = bounds(Some("1.0.0"), Some("2.0.0"));
        assert!(satisfies("1.5.0", &b));
    }

    #[test]
    fn s3_version_at_exclusive_end_does_not_match() {
        let b = bounds(Some("1.0.0"), Some("2.0.0"));
        assert!(!satisfies("2.0.0", &b));
    }

    #[test]
    fn s3_version_before_start_does_not_match() {
        let b = bounds(Some("1.0.0"), Some("2.0.0"));
        assert!(!satisfies("0.9.8", &b));
    }

    #[test]
    fn s3_unknown_sentinel_is_conservative() {
        let b = bounds(Some("1.0.0"), Some("2.0.0"));
        assert!(satisfies("unknown", &b));
        assert!(satisfies("any", &b));
        assert!(satisfies("UNKNOWN", &b));
    }

    #[test]
    fn unparseable_concrete_version_is_conservative() {
        let b = bounds(Some("1.0.0"), Some("2.0.0"));
        assert!(satisfies("***", &b));
        assert!(satisfies("", &b));
    }

    #[test]
    fn unparseable_bound_is_conservative() {
        let b = bounds(Some("***"), Some("2.0.0"));
        assert!(satisfies("0.1.0", &b));
    }

    #[test]
    fn inclusive_and_exclusive_start_bounds_differ_at_the_edge() {
        let inclusive = VersionBounds {
            start_including: Some("1.0.0".to_string()),
            ..Default::default()
        };
        let exclusive = VersionBounds {
            start_excluding: Some("1.0.0".to_string()),
            ..Default::default()
        };
        assert!(satisfies("1.0.0", &inclusive));
        assert!(!satisfies("1.0.0", &exclusive));
    }

    #[test]
    fn no_bounds_present_is_vacuously_satisfied() {
        assert!(satisfies("1.0.0", &VersionBounds::default()));
    }
}
