/// One PEP440-ish version segment: either a numeric run or an alphabetic
/// run. CPE version tokens are not guaranteed to be semver, so we tokenize
/// on delimiter characters *and* on digit/alpha boundaries the way PEP440
/// separates release segments from pre-release qualifiers (e.g. `2023a`
/// becomes `[Num(2023), Alpha("a")]`).
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Num(u64),
    Alpha(String),
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self, other) {
            (Segment::Num(a), Segment::Num(b)) => a.cmp(b),
            (Segment::Alpha(a), Segment::Alpha(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            // A numeric segment outranks an alphabetic one at the same
            // position (so "1.0.0" > "1.0.0rc1" is false under strict
            // PEP440 pre-release semantics, but for CPE's flat version
            // strings we only need a deterministic, documented tie-break).
            (Segment::Num(_), Segment::Alpha(_)) => std::cmp::Ordering::Greater,
            (Segment::Alpha(_), Segment::Num(_)) => std::cmp::Ordering::Less,
        }
    }
}

/// A parsed, comparable version. Normalizes away leading zeros within a
/// numeric run and treats missing trailing segments as zero, so "1.2" and
/// "1.2.0" compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVersion {
    segments: Vec<Segment>,
}

impl ParsedVersion {
    /// Tokenize `text` into segments. Returns `None` if `text` carries no
    /// alphanumeric content at all (the only case we treat as an outright
    /// parse failure; everything else normalizes to *some* comparable
    /// segment sequence).
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() || !trimmed.chars().any(|c| c.is_ascii_alphanumeric()) {
            return None;
        }

        let mut segments = Vec::new();
        let mut current = String::new();
        let mut current_is_digit: Option<bool> = None;

        let flush = |current: &mut String, is_digit: bool, segments: &mut Vec<Segment>| {
            if current.is_empty() {
                return;
            }
            if is_digit {
                // Fall back to string comparison if the numeric run somehow
                // overflows u64 rather than treating it as a parse failure.
                let value = current.parse::<u64>().unwrap_or(u64::MAX);
                segments.push(Segment::Num(value));
            } else {
                segments.push(Segment::Alpha(current.clone()));
            }
            current.clear();
        };

        for ch in trimmed.chars() {
            if ch.is_ascii_alphanumeric() {
                let is_digit = ch.is_ascii_digit();
                match current_is_digit {
                    Some(prev) if prev == is_digit => current.push(ch),
                    Some(prev) => {
                        flush(&mut current, prev, &mut segments);
                        current.push(ch);
                        current_is_digit = Some(is_digit);
                    }
                    None => {
                        current.push(ch);
                        current_is_digit = Some(is_digit);
                    }
                }
            } else if let Some(prev) = current_is_digit {
                flush(&mut current, prev, &mut segments);
                current_is_digit = None;
            }
        }
        if let Some(prev) = current_is_digit {
            flush(&mut current, prev, &mut segments);
        }

        Some(ParsedVersion { segments })
    }
}

impl PartialOrd for ParsedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ParsedVersion {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let a = self.segments.get(i).cloned().unwrap_or(Segment::Num(0));
            let b = other.segments.get(i).cloned().unwrap_or(Segment::Num(0));
            let ord = a.cmp(&b);
            if ord != std::cmp::Ordering::Equal {
                return ord;
            }
        }
        std::cmp::Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn equal_versions_with_trailing_zero_padding() {
        let a = ParsedVersion::parse("1.2").unwrap();
        let b = ParsedVersion::parse("1.2.0").unwrap();
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn numeric_segments_compare_by_magnitude_not_lexicographically() {
        let a = ParsedVersion::parse("1.9.0").unwrap();
        let b = ParsedVersion::parse("1.10.0").unwrap();
        assert_eq!(a.cmp(&b), Ordering::Less);
    }

    #[test]
    fn alpha_and_digit_runs_split_into_separate_segments() {
        let v = ParsedVersion::parse("2023a").unwrap();
        assert_eq!(v.segments.len(), 2);
    }

    #[test]
    fn empty_or_punctuation_only_is_unparseable() {
        assert!(ParsedVersion::parse("").is_none());
        assert!(ParsedVersion::parse("   ").is_none());
        assert!(ParsedVersion::parse("***").is_none());
    }
}
