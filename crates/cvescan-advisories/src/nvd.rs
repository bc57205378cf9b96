//! Normalization of the NVD REST API 2.0 response shape into
//! `cvescan_core::CveRecord`.
//!
//! Based on <https://nvd.nist.gov/developers/vulnerabilities>.

use cvescan_core::{CpeMatch, CveRecord, Severity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct NvdResponse {
    #[serde(default, rename = "vulnerabilities")]
    pub vulnerabilities: Vec<NvdEntry>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NvdEntry {
    pub cve: NvdCve,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NvdCve {
    pub id: String,
    pub published: Option<String>,
    #[serde(rename = "lastModified")]
    pub last_modified: Option<String>,
    pub descriptions: Option<Vec<NvdDescription>>,
    pub metrics: Option<NvdMetrics>,
    pub configurations: Option<Vec<NvdConfiguration>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NvdDescription {
    pub lang: String,
    pub value: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NvdMetrics {
    #[serde(rename = "cvssMetricV31")]
    pub cvss_metric_v31: Option<Vec<NvdCvssMetric>>,
    #[serde(rename = "cvssMetricV30")]
    pub cvss_metric_v30: Option<Vec<NvdCvssMetric>>,
    #[serde(rename = "cvssMetricV40")]
    pub cvss_metric_v40: Option<Vec<NvdCvssMetric>>,
    #[serde(rename = "cvssMetricV2")]
    pub cvss_metric_v2: Option<Vec<NvdCvssMetric>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NvdCvssMetric {
    #[serde(rename = "cvssData")]
    pub cvss_data: NvdCvssData,
    #[serde(rename = "baseSeverity")]
    pub base_severity: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NvdCvssData {
    #[serde(rename = "baseScore")]
    pub base_score: f64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NvdConfiguration {
    pub nodes: Option<Vec<NvdNode>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NvdNode {
    #[serde(rename = "cpeMatch")]
    pub cpe_match: Option<Vec<NvdCpeMatch>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NvdCpeMatch {
    pub vulnerable: bool,
    pub criteria: String,
    #[serde(rename = "versionStartIncluding")]
    pub version_start_including: Option<String>,
    #[serde(rename = "versionStartExcluding")]
    pub version_start_excluding: Option<String>,
    #[serde(rename = "versionEndIncluding")]
    pub version_end_including: Option<String>,
    #[serde(rename = "versionEndExcluding")]
    pub version_end_excluding: Option<String>,
}

/// Severity derives from the highest-version CVSS metric available:
/// prefer v3.1, then v4.0, then v3.0, then band a bare v2 numeric score.
fn severity_and_score(metrics: &Option<NvdMetrics>) -> (Severity, Option<f64>) {
    let Some(m) = metrics else {
        return (Severity::Unknown, None);
    };

    let from_metric = |metric: &NvdCvssMetric| {
        let score = metric.cvss_data.base_score;
        let severity = metric
            .base_severity
            .as_deref()
            .and_then(parse_named_severity)
            .unwrap_or_else(|| Severity::from_cvss_score(score));
        (severity, Some(score))
    };

    if let Some(v) = m.cvss_metric_v31.as_ref().and_then(|v| v.first()) {
        return from_metric(v);
    }
    if let Some(v) = m.cvss_metric_v40.as_ref().and_then(|v| v.first()) {
        return from_metric(v);
    }
    if let Some(v) = m.cvss_metric_v30.as_ref().and_then(|v| v.first()) {
        return from_metric(v);
    }
    if let Some(v) = m.cvss_metric_v2.as_ref().and_then(|v| v.first()) {
        // v2 entries rarely carry baseSeverity; band the numeric score.
        let score = v.cvss_data.base_score;
        return (Severity::from_cvss_score(score), Some(score));
    }

    (Severity::Unknown, None)
}

fn parse_named_severity(s: &str) -> Option<Severity> {
    match s.to_uppercase().as_str() {
        "CRITICAL" => Some(Severity::Critical),
        "HIGH" => Some(Severity::High),
        "MEDIUM" => Some(Severity::Medium),
        "LOW" => Some(Severity::Low),
        "NONE" => Some(Severity::None),
        _ => None,
    }
}

fn parse_cpe_matches(configs: &Option<Vec<NvdConfiguration>>) -> Vec<CpeMatch> {
    let mut out = Vec::new();
    let Some(configs) = configs else {
        return out;
    };
    for config in configs {
        let Some(nodes) = &config.nodes else { continue };
        for node in nodes {
            let Some(matches) = &node.cpe_match else { continue };
            for m in matches {
                out.push(CpeMatch {
                    cpe_uri: m.criteria.clone(),
                    vulnerable: m.vulnerable,
                    start_including: m.version_start_including.clone(),
                    start_excluding: m.version_start_excluding.clone(),
                    end_including: m.version_end_including.clone(),
                    end_excluding: m.version_end_excluding.clone(),
                });
            }
        }
    }
    out
}

pub fn parse_nvd_entry(entry: &NvdEntry) -> CveRecord {
    let cve = &entry.cve;

    let description = cve.descriptions.as_ref().and_then(|descs| {
        descs
            .iter()
            .find(|d| d.lang == "en")
            .or_else(|| descs.first())
            .map(|d| d.value.clone())
    });

    let (severity, cvss_score) = severity_and_score(&cve.metrics);

    let record = CveRecord {
        id: cve.id.clone(),
        description,
        cvss_score,
        severity,
        published_date: cve.published.clone(),
        cpe_matches: parse_cpe_matches(&cve.configurations),
    };

    if let Err(e) = record.validate() {
        tracing::warn!("{e}");
    }
    for m in &record.cpe_matches {
        if let Err(e) = m.validate() {
            tracing::warn!("{e}");
        }
    }

    record
}

pub fn parse_response(body: &str) -> serde_json::Result<Vec<CveRecord>> {
    let response: NvdResponse = serde_json::from_str(body)?;
    Ok(response.vulnerabilities.iter().map(parse_nvd_entry).collect())
}
