//! Run results and report emission (JSON + JUnit XML).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::E2eResult;

/// Result of one scenario, including retries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub group: String,
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    /// Attempts beyond the first that were consumed before passing/failing.
    pub retries_used: u32,
    pub error: Option<String>,
}

/// Aggregated result of a profile run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub profile: String,
    /// Suite version, for correlating archived reports with the code.
    pub version: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<ScenarioResult>,
}

impl SuiteResult {
    pub fn from_results(profile: &str, results: Vec<ScenarioResult>, duration_ms: u64) -> Self {
        let passed = results.iter().filter(|r| r.success).count();
        Self {
            profile: profile.to_string(),
            version: storefront_common::VERSION.to_string(),
            total: results.len(),
            passed,
            failed: results.len() - passed,
            duration_ms,
            results,
        }
    }

    /// Write `test-results.json` into `dir`.
    pub fn write_json(&self, dir: &Path) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join("test-results.json");
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        info!(path = %path.display(), "JSON results written");
        Ok(path)
    }

    /// Write `junit.xml` into `dir`.
    pub fn write_junit(&self, dir: &Path) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join("junit.xml");
        std::fs::write(&path, self.to_junit_xml())?;
        info!(path = %path.display(), "JUnit report written");
        Ok(path)
    }

    /// Render the run as a single JUnit `<testsuite>`; scenario groups map
    /// to test-case class names.
    pub fn to_junit_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!(
            "<testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" time=\"{:.3}\">\n",
            xml_escape(&self.profile),
            self.total,
            self.failed,
            self.duration_ms as f64 / 1000.0,
        ));
        for result in &self.results {
            xml.push_str(&format!(
                "  <testcase classname=\"{}\" name=\"{}\" time=\"{:.3}\"",
                xml_escape(&result.group),
                xml_escape(&result.name),
                result.duration_ms as f64 / 1000.0,
            ));
            if result.success {
                xml.push_str("/>\n");
            } else {
                let message = result.error.as_deref().unwrap_or("unknown error");
                xml.push_str(&format!(
                    ">\n    <failure message=\"{}\"/>\n  </testcase>\n",
                    xml_escape(message)
                ));
            }
        }
        xml.push_str("</testsuite>\n");
        xml
    }
}

fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SuiteResult {
        SuiteResult::from_results(
            "smoke",
            vec![
                ScenarioResult {
                    group: "smoke/login".to_string(),
                    name: "valid credentials reach homepage".to_string(),
                    success: true,
                    duration_ms: 1500,
                    retries_used: 0,
                    error: None,
                },
                ScenarioResult {
                    group: "smoke/login".to_string(),
                    name: "invalid credentials stay on /login".to_string(),
                    success: false,
                    duration_ms: 900,
                    retries_used: 1,
                    error: Some("expected <title> & got \"Login\"".to_string()),
                },
            ],
            2400,
        )
    }

    #[test]
    fn totals_are_derived() {
        let suite = sample();
        assert_eq!(suite.total, 2);
        assert_eq!(suite.passed, 1);
        assert_eq!(suite.failed, 1);
    }

    #[test]
    fn junit_contains_failure_and_escapes() {
        let xml = sample().to_junit_xml();
        assert!(xml.contains("tests=\"2\" failures=\"1\""));
        assert!(xml.contains("classname=\"smoke/login\""));
        assert!(xml.contains("&amp; got &quot;Login&quot;"));
        assert!(!xml.contains("& got \"Login\""));
    }

    #[test]
    fn reports_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let suite = sample();
        let json_path = suite.write_json(dir.path()).unwrap();
        let junit_path = suite.write_junit(dir.path()).unwrap();
        let parsed: SuiteResult =
            serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
        assert_eq!(parsed.total, 2);
        assert!(std::fs::read_to_string(junit_path)
            .unwrap()
            .starts_with("<?xml"));
    }
}
