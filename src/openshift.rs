// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! One-call helpers for OpenShift checks
//!
//! Each helper takes an optional [`Discoverer`]. With `None` a discoverer is
//! built once from the ambient cluster configuration and shared by every
//! step of that call. The first failure is returned unchanged.

use std::cmp::Ordering;

use tracing::debug;

use crate::discovery::Discoverer;
use crate::error::{Error, Result};
use crate::known_versions;
use crate::platform::{OpenShiftVersion, PlatformInfo};
use crate::resolver::{self, resolve_discoverer};
use crate::version::{compare_versions, normalize_version};

/// Examine the cluster and report its platform, Kubernetes version and OS
///
/// Result: `PlatformInfo { name: OpenShift, k8s_version: "1.13+", os: "linux/amd64" }`
///
/// # Errors
/// See [`resolver::get_platform_info`]; additionally
/// [`Error::ConfigUnavailable`] when defaulting the discoverer fails.
pub fn get_platform_info(discoverer: Option<&dyn Discoverer>) -> Result<PlatformInfo> {
    let discoverer = resolve_discoverer(discoverer)?;
    resolver::get_platform_info(&*discoverer)
}

/// Whether the cluster runs OpenShift
///
/// # Errors
/// See [`get_platform_info`]
pub fn is_openshift(discoverer: Option<&dyn Discoverer>) -> Result<bool> {
    Ok(get_platform_info(discoverer)?.is_openshift())
}

/// Fetch the OpenShift version from the cluster APIs
///
/// OpenShift 4 requires read access on `clusterversions.config.openshift.io`.
/// An empty result means the version could not be determined.
///
/// Result: `OpenShiftVersion { version: "4.1.2" }`
///
/// # Errors
/// See [`resolver::lookup_openshift_version`]
pub fn lookup_openshift_version(discoverer: Option<&dyn Discoverer>) -> Result<OpenShiftVersion> {
    let discoverer = resolve_discoverer(discoverer)?;
    resolver::lookup_openshift_version(&*discoverer)
}

/// Compare the cluster's OpenShift version with `version`
///
/// `version` is `major.minor` or longer, with or without a leading `v`
/// (e.g. "4.3"). Both sides are normalized before the numeric comparison.
/// When the cluster APIs yield no version the comparison fails rather than
/// guessing from the known version table.
///
/// # Errors
/// - [`Error::NotOpenShift`] if the cluster is plain Kubernetes
/// - [`Error::VersionUndetermined`] if no OpenShift version can be found
/// - [`Error::InvalidVersionFormat`] if either version is not numeric
/// - any discovery error from the resolvers
pub fn compare_openshift_version(
    discoverer: Option<&dyn Discoverer>,
    version: &str,
) -> Result<Ordering> {
    let discoverer = resolve_discoverer(discoverer)?;
    let info = resolver::get_platform_info(&*discoverer)?;
    if !info.is_openshift() {
        return Err(Error::NotOpenShift {
            platform: info.name,
        });
    }

    let cluster_version = resolver::lookup_openshift_version(&*discoverer)?;
    if cluster_version.is_empty() {
        return Err(Error::VersionUndetermined);
    }

    debug!(cluster = %cluster_version.version, target = %version, "comparing OpenShift versions");
    compare_versions(cluster_version.normalized(), normalize_version(version))
}

/// Map the Kubernetes version of `info` to the OpenShift release that ships it
///
/// Result: `OpenShiftVersion { version: "4.1" }` for Kubernetes "1.13+";
/// empty for versions not in the table.
#[must_use]
pub fn map_known_version(info: &PlatformInfo) -> OpenShiftVersion {
    known_versions::map_known_version(info)
}

/// Whether `group_version` serves a resource named `resource`
///
/// # Errors
/// [`Error::ResourceNotFound`] if the resource is not served, or a
/// discovery error if the group/version cannot be listed.
pub fn custom_resource_exists(
    discoverer: Option<&dyn Discoverer>,
    group_version: &str,
    resource: &str,
) -> Result<bool> {
    let discoverer = resolve_discoverer(discoverer)?;
    resolver::custom_resource_exists(&*discoverer, group_version, resource)
}
