// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Platform identity and version records
//!
//! These are plain values built fresh by every resolution call. Nothing in
//! here talks to a cluster.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::version::{compare_versions, normalize_version, split_version};

/// API group that only OpenShift registers
pub const OPENSHIFT_MARKER_GROUP: &str = "route.openshift.io";

/// Kubernetes distribution running the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformType {
    OpenShift,
    Kubernetes,
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenShift => f.write_str("OpenShift"),
            Self::Kubernetes => f.write_str("Kubernetes"),
        }
    }
}

/// Platform, Kubernetes version and OS reported by a cluster
///
/// `k8s_version` is `"<major>.<minor>"` exactly as the server reported it,
/// e.g. `"1.13+"` on OpenShift 4.1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub name: PlatformType,
    #[serde(rename = "k8sVersion")]
    pub k8s_version: String,
    pub os: String,
}

impl PlatformInfo {
    #[must_use]
    pub fn is_openshift(&self) -> bool {
        self.name == PlatformType::OpenShift
    }

    #[must_use]
    pub fn is_kubernetes(&self) -> bool {
        self.name == PlatformType::Kubernetes
    }

    /// Major component of the Kubernetes version, e.g. "1"
    #[must_use]
    pub fn k8s_major_version(&self) -> &str {
        self.k8s_version.split('.').next().unwrap_or_default()
    }

    /// Minor component of the Kubernetes version, e.g. "13+"
    #[must_use]
    pub fn k8s_minor_version(&self) -> &str {
        self.k8s_version.split('.').nth(1).unwrap_or_default()
    }
}

impl fmt::Display for PlatformInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PlatformInfo [Name: {}, K8SVersion: {}, OS: {}]",
            self.name, self.k8s_version, self.os
        )
    }
}

/// OpenShift version as reported by the cluster or mapped from Kubernetes
///
/// An empty version means it could not be determined. It is never equal to
/// or ordered against another version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenShiftVersion {
    #[serde(rename = "ocpVersion")]
    pub version: String,
}

impl OpenShiftVersion {
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.version.trim().is_empty()
    }

    /// Version with any leading `v` and `+build` metadata removed
    #[must_use]
    pub fn normalized(&self) -> &str {
        normalize_version(&self.version)
    }

    /// Major component, e.g. "4" for "v4.1.2"
    #[must_use]
    pub fn major_version(&self) -> &str {
        self.normalized().split('.').next().unwrap_or_default()
    }

    /// Minor component, e.g. "1" for "v4.1.2"; empty if absent
    #[must_use]
    pub fn minor_version(&self) -> &str {
        let (core, _, _) = split_version(self.normalized());
        core.split('.').nth(1).unwrap_or_default()
    }

    /// Pre-release part without the leading `-`, e.g. "rc.1"
    #[must_use]
    pub fn prerelease_version(&self) -> &str {
        split_version(self.version.trim()).1
    }

    /// Build metadata without the leading `+`, e.g. "d4cacc0"
    #[must_use]
    pub fn build_version(&self) -> &str {
        split_version(self.version.trim()).2
    }

    /// Compare against another version after normalizing both sides
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidVersionFormat`] if either side is not
    /// dotted numeric once normalized, which includes an empty version.
    pub fn compare(&self, other: &OpenShiftVersion) -> Result<Ordering> {
        compare_versions(self.normalized(), other.normalized())
    }
}

impl fmt::Display for OpenShiftVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpenShiftVersion [Version: {}]", self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn k8s_version_components() {
        let info = PlatformInfo {
            name: PlatformType::OpenShift,
            k8s_version: "1.13+".to_string(),
            os: "linux/amd64".to_string(),
        };
        assert_eq!(info.k8s_major_version(), "1");
        assert_eq!(info.k8s_minor_version(), "13+");
        assert!(info.is_openshift());
        assert!(!info.is_kubernetes());
    }

    #[test]
    fn k8s_version_components_when_empty() {
        let info = PlatformInfo {
            name: PlatformType::Kubernetes,
            k8s_version: String::new(),
            os: String::new(),
        };
        assert_eq!(info.k8s_major_version(), "");
        assert_eq!(info.k8s_minor_version(), "");
    }

    #[test]
    fn platform_info_display() {
        let info = PlatformInfo {
            name: PlatformType::OpenShift,
            k8s_version: "1.13+".to_string(),
            os: "linux/amd64".to_string(),
        };
        assert_eq!(
            info.to_string(),
            "PlatformInfo [Name: OpenShift, K8SVersion: 1.13+, OS: linux/amd64]"
        );
    }

    #[test]
    fn platform_info_json_field_names() {
        let info = PlatformInfo {
            name: PlatformType::Kubernetes,
            k8s_version: "1.29".to_string(),
            os: "linux/arm64".to_string(),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["name"], "Kubernetes");
        assert_eq!(json["k8sVersion"], "1.29");
        assert_eq!(json["os"], "linux/arm64");
    }

    #[test]
    fn openshift_version_parts() {
        let v = OpenShiftVersion::new("v3.11.0-rc.1+d4cacc0");
        assert_eq!(v.major_version(), "3");
        assert_eq!(v.minor_version(), "11");
        assert_eq!(v.prerelease_version(), "rc.1");
        assert_eq!(v.build_version(), "d4cacc0");
    }

    #[test]
    fn accessors_strip_a_single_prefix() {
        let v = OpenShiftVersion::new("vv4.2.0-rc.1");
        assert_eq!(v.normalized(), "v4.2.0-rc.1");
        assert_eq!(v.major_version(), "v4");
        assert_eq!(v.minor_version(), "2");
        assert_eq!(v.prerelease_version(), "rc.1");
        assert!(v.compare(&OpenShiftVersion::new("4.2")).is_err());
    }

    #[test]
    fn openshift_version_parts_without_prefix() {
        let v = OpenShiftVersion::new("4.2.1");
        assert_eq!(v.major_version(), "4");
        assert_eq!(v.minor_version(), "2");
        assert_eq!(v.prerelease_version(), "");
        assert_eq!(v.build_version(), "");
    }

    #[test]
    fn empty_version_never_compares() {
        let empty = OpenShiftVersion::default();
        assert!(empty.is_empty());
        assert!(empty.compare(&OpenShiftVersion::new("4.1")).is_err());
        assert!(empty.compare(&empty).is_err());
    }

    #[test]
    fn compare_normalizes_both_sides() {
        let a = OpenShiftVersion::new("v4.1");
        let b = OpenShiftVersion::new("v4.4");
        assert_eq!(a.compare(&b).unwrap(), Ordering::Less);
        let c = OpenShiftVersion::new("v3.11.0+d4cacc0");
        assert_eq!(c.compare(&OpenShiftVersion::new("3.11")).unwrap(), Ordering::Equal);
    }
}
