//! Site registry: classifies URLs into document families and extracts
//! record identifiers.
//!
//! The registry is an immutable value constructed at startup and passed by
//! reference to every consumer. Profiles are evaluated in registration
//! order and are assumed mutually exclusive; the first match wins.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A registered document family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteId {
    LinkedIn,
    Indeed,
    Glassdoor,
}

impl SiteId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteId::LinkedIn => "linkedin",
            SiteId::Indeed => "indeed",
            SiteId::Glassdoor => "glassdoor",
        }
    }
}

impl std::fmt::Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SiteId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linkedin" => Ok(SiteId::LinkedIn),
            "indeed" => Ok(SiteId::Indeed),
            "glassdoor" => Ok(SiteId::Glassdoor),
            other => Err(format!("unknown site: {other}")),
        }
    }
}

/// Classification and identifier rules for one document family.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub id: SiteId,
    pub display_name: &'static str,
    /// Matches URLs belonging to this family.
    url_pattern: Regex,
    /// Captures the record identifier from a URL.
    record_id_pattern: Regex,
    /// Template for a clean URL without tracking parameters.
    canonical_template: &'static str,
    /// Human-readable identifier scheme, surfaced in logs and prompts.
    pub description: &'static str,
}

impl SiteProfile {
    fn new(
        id: SiteId,
        display_name: &'static str,
        url_pattern: &str,
        record_id_pattern: &str,
        canonical_template: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            id,
            display_name,
            url_pattern: Regex::new(&format!("(?i){url_pattern}")).expect("static site pattern"),
            record_id_pattern: Regex::new(record_id_pattern).expect("static record id pattern"),
            canonical_template,
            description,
        }
    }

    /// True when the URL belongs to this family.
    pub fn matches(&self, url: &str) -> bool {
        self.url_pattern.is_match(url)
    }

    /// Extract the record identifier from a URL of this family.
    ///
    /// Absence is a recoverable condition, not an error.
    pub fn extract_record_id(&self, url: &str) -> Option<String> {
        self.record_id_pattern
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Reconstruct a clean URL for a record of this family.
    pub fn canonical_url(&self, record_id: &str) -> String {
        self.canonical_template.replace("{record_id}", record_id)
    }
}

/// Immutable set of site profiles, evaluated in registration order.
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    profiles: Vec<SiteProfile>,
}

impl SiteRegistry {
    /// Build the registry with the built-in profiles.
    pub fn with_defaults() -> Self {
        Self {
            profiles: vec![
                SiteProfile::new(
                    SiteId::LinkedIn,
                    "LinkedIn",
                    r"linkedin\.com/jobs",
                    r"/jobs/view/(\d+)",
                    "https://www.linkedin.com/jobs/view/{record_id}",
                    "Path-based record id: /jobs/view/{id}",
                ),
                SiteProfile::new(
                    SiteId::Indeed,
                    "Indeed",
                    r"indeed\.com/viewjob",
                    r"[?&]jk=([a-f0-9]+)",
                    "https://www.indeed.com/viewjob?jk={record_id}",
                    "Query param record id: ?jk={id}",
                ),
                SiteProfile::new(
                    SiteId::Glassdoor,
                    "Glassdoor",
                    r"glassdoor\.com/job-listing",
                    r"-JV_IC(\d+)",
                    "https://www.glassdoor.com/job-listing/-JV_IC{record_id}",
                    "Mixed pattern record id: -JV_IC{id}",
                ),
            ],
        }
    }

    /// Classify a URL into a family. First matching profile wins.
    pub fn classify(&self, url: &str) -> Option<&SiteProfile> {
        self.profiles.iter().find(|p| p.matches(url))
    }

    /// Look up a profile by id.
    pub fn get(&self, id: SiteId) -> &SiteProfile {
        self.profiles
            .iter()
            .find(|p| p.id == id)
            .expect("all site ids are registered")
    }

    /// Registered profiles in evaluation order.
    pub fn profiles(&self) -> &[SiteProfile] {
        &self.profiles
    }
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_linkedin_and_extracts_id() {
        let registry = SiteRegistry::with_defaults();
        let url = "https://www.linkedin.com/jobs/view/4300362234";

        let profile = registry.classify(url).expect("linkedin url classifies");
        assert_eq!(profile.id, SiteId::LinkedIn);
        assert_eq!(profile.extract_record_id(url).as_deref(), Some("4300362234"));
    }

    #[test]
    fn classifies_indeed_and_extracts_id() {
        let registry = SiteRegistry::with_defaults();
        let url = "https://www.indeed.com/viewjob?jk=d7a8476f98b7ec44";

        let profile = registry.classify(url).expect("indeed url classifies");
        assert_eq!(profile.id, SiteId::Indeed);
        assert_eq!(
            profile.extract_record_id(url).as_deref(),
            Some("d7a8476f98b7ec44")
        );
    }

    #[test]
    fn classifies_glassdoor() {
        let registry = SiteRegistry::with_defaults();
        let url = "https://www.glassdoor.com/job-listing/engineer-somecorp-JV_IC1234";

        let profile = registry.classify(url).expect("glassdoor url classifies");
        assert_eq!(profile.id, SiteId::Glassdoor);
        assert_eq!(profile.extract_record_id(url).as_deref(), Some("1234"));
    }

    #[test]
    fn classification_is_deterministic() {
        let registry = SiteRegistry::with_defaults();
        let url = "https://www.linkedin.com/jobs/view/123";

        for _ in 0..5 {
            assert_eq!(registry.classify(url).map(|p| p.id), Some(SiteId::LinkedIn));
        }
    }

    #[test]
    fn unknown_url_is_not_classified() {
        let registry = SiteRegistry::with_defaults();
        assert!(registry.classify("https://example.com/careers/123").is_none());
    }

    #[test]
    fn classification_is_case_insensitive() {
        let registry = SiteRegistry::with_defaults();
        let url = "https://WWW.LINKEDIN.COM/jobs/view/99";
        assert_eq!(registry.classify(url).map(|p| p.id), Some(SiteId::LinkedIn));
    }

    #[test]
    fn missing_record_id_is_recoverable() {
        let registry = SiteRegistry::with_defaults();
        let profile = registry.get(SiteId::LinkedIn);
        assert_eq!(profile.extract_record_id("https://www.linkedin.com/jobs/search"), None);
    }

    #[test]
    fn canonical_url_strips_tracking_params() {
        let registry = SiteRegistry::with_defaults();
        let url = "https://www.linkedin.com/jobs/view/4300371471/?alternateChannel=search&trk=d_flagship3";

        let profile = registry.classify(url).unwrap();
        let id = profile.extract_record_id(url).unwrap();
        assert_eq!(
            profile.canonical_url(&id),
            "https://www.linkedin.com/jobs/view/4300371471"
        );
    }

    #[test]
    fn canonical_url_for_indeed() {
        let registry = SiteRegistry::with_defaults();
        let profile = registry.get(SiteId::Indeed);
        assert_eq!(
            profile.canonical_url("d7a8476f98b7ec44"),
            "https://www.indeed.com/viewjob?jk=d7a8476f98b7ec44"
        );
    }
}
