// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Static Kubernetes → OpenShift version table
//!
//! Keys are the literal strings the API server reports for `major.minor`.
//! OpenShift reports the minor with a trailing `+`, so both spellings are
//! listed. Lookups are exact; there is no range interpolation.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::platform::{OpenShiftVersion, PlatformInfo};

/// Kubernetes minor → OpenShift minor pairs that have been verified
const KNOWN_PAIRS: &[(&str, &str)] = &[
    ("1.10", "3.10"),
    ("1.11", "3.11"),
    // Kubernetes 1.12 shipped only in the never-released OpenShift 4.0
    ("1.13", "4.1"),
    ("1.14", "4.2"),
    // 1.15 was skipped by OpenShift
    ("1.16", "4.3"),
    ("1.17", "4.4"),
    ("1.18", "4.5"),
    ("1.19", "4.6"),
    ("1.20", "4.7"),
    ("1.21", "4.8"),
    ("1.22", "4.9"),
    ("1.23", "4.10"),
    ("1.24", "4.11"),
    ("1.25", "4.12"),
    ("1.26", "4.13"),
    ("1.27", "4.14"),
    ("1.28", "4.15"),
    ("1.29", "4.16"),
    ("1.30", "4.17"),
    ("1.31", "4.18"),
    ("1.32", "4.19"),
];

static KNOWN_VERSIONS: LazyLock<BTreeMap<String, &'static str>> = LazyLock::new(|| {
    KNOWN_PAIRS
        .iter()
        .flat_map(|&(k8s, ocp)| [(k8s.to_string(), ocp), (format!("{k8s}+"), ocp)])
        .collect()
});

/// Map a reported Kubernetes version to the OpenShift release that ships it
///
/// Unknown versions map to an empty [`OpenShiftVersion`].
///
/// # Examples
/// ```
/// use ocpver::known_versions::lookup_known_version;
/// assert_eq!(lookup_known_version("1.13+").version, "4.1");
/// assert!(lookup_known_version("9.99").is_empty());
/// ```
#[must_use]
pub fn lookup_known_version(k8s_version: &str) -> OpenShiftVersion {
    KNOWN_VERSIONS
        .get(k8s_version)
        .map(|ocp| OpenShiftVersion::new(*ocp))
        .unwrap_or_default()
}

/// Map the Kubernetes version of a [`PlatformInfo`] to an OpenShift version
#[must_use]
pub fn map_known_version(info: &PlatformInfo) -> OpenShiftVersion {
    lookup_known_version(&info.k8s_version)
}

/// Iterate over every known `(kubernetes, openshift)` pair in key order
pub fn known_versions() -> impl Iterator<Item = (&'static str, &'static str)> {
    let table: &'static BTreeMap<String, &'static str> = &KNOWN_VERSIONS;
    table.iter().map(|(k8s, ocp)| (k8s.as_str(), *ocp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlatformType;

    fn info(k8s_version: &str) -> PlatformInfo {
        PlatformInfo {
            name: PlatformType::OpenShift,
            k8s_version: k8s_version.to_string(),
            os: "linux/amd64".to_string(),
        }
    }

    #[test]
    fn maps_known_versions() {
        let cases = [
            ("", ""),
            ("1.10+", "3.10"),
            ("1.11+", "3.11"),
            ("1.13+", "4.1"),
            ("1.13", "4.1"),
            ("1.16+", "4.3"),
            ("1.29", "4.16"),
        ];
        for (k8s, expected) in cases {
            assert_eq!(map_known_version(&info(k8s)).version, expected, "k8s {k8s}");
        }
    }

    #[test]
    fn unknown_versions_map_to_empty() {
        assert!(lookup_known_version("9.99").is_empty());
        assert!(lookup_known_version("1.12+").is_empty());
        assert!(lookup_known_version("1.13.4").is_empty());
        assert!(lookup_known_version(" 1.13+").is_empty());
    }

    #[test]
    fn table_lists_both_spellings() {
        assert_eq!(known_versions().count(), KNOWN_PAIRS.len() * 2);
    }
}
