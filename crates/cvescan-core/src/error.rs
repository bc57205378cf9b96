use thiserror::Error;

/// Invariant violations in the shared data model, caught at construction
/// time rather than propagated silently into downstream matching logic.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Neither a version-range bound nor a parseable (or wildcard) version
    /// field was present on a CPE match entry — the invariant documented on
    /// `CpeMatch` requires one or the other.
    #[error("CPE match has neither a range bound nor a usable version field: {cpe_uri}")]
    InvalidCpeMatch { cpe_uri: String },

    /// A CVSS score outside the documented 0.0-10.0 range.
    #[error("CVSS score {score} for {cve_id} is outside the valid 0.0-10.0 range")]
    InvalidCvssScore { cve_id: String, score: f64 },
}

pub type Result<T> = std::result::Result<T, CoreError>;
