//! The generated, reusable extraction program for one family.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::sites::SiteId;

/// A generated extraction program.
///
/// One per site family; regeneration overwrites. The source must be
/// self-contained: it references neither the oracle nor this tooling, and
/// carries no record-specific identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Family this artifact extracts.
    pub site: SiteId,

    /// The program source text.
    pub source: String,

    /// Where the artifact is persisted.
    pub path: PathBuf,

    /// Whether the executable bit was set.
    pub executable: bool,
}

impl Artifact {
    /// Fixed on-disk file name for a family's artifact.
    pub fn file_name(site: SiteId) -> String {
        format!("{site}_scraper.py")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_site_scoped() {
        assert_eq!(Artifact::file_name(SiteId::LinkedIn), "linkedin_scraper.py");
        assert_eq!(Artifact::file_name(SiteId::Indeed), "indeed_scraper.py");
    }
}
