pub mod client;
pub mod cpe;
pub mod error;
pub mod matcher;
pub mod nvd;

pub use client::CveClient;
pub use error::{AdvisoryError, Result};
pub use matcher::{cve_matches, filter_matching, matching_witnesses, MatchQuery};
