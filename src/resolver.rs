// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Platform and OpenShift version resolution
//!
//! Both resolvers are stateless: every call re-queries the cluster through
//! the supplied [`Discoverer`] and builds its result from scratch.

use std::ops::Deref;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::client::KubeDiscoverer;
use crate::config::ClusterConfig;
use crate::discovery::{ClientError, Discoverer, serves_group};
use crate::error::{Error, Result};
use crate::platform::{OPENSHIFT_MARKER_GROUP, OpenShiftVersion, PlatformInfo, PlatformType};

/// Cluster-scoped resource holding the OpenShift 4 version
///
/// Reading it requires cluster-level read access on
/// `clusterversions.config.openshift.io`.
pub const CLUSTER_VERSION_API_PATH: &str = "/apis/config.openshift.io/v1/clusterversions/version";

/// A caller-supplied discoverer or one built from ambient configuration
pub enum DiscovererRef<'a> {
    Borrowed(&'a dyn Discoverer),
    Owned(Box<dyn Discoverer>),
}

impl<'a> Deref for DiscovererRef<'a> {
    type Target = dyn Discoverer + 'a;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Borrowed(discoverer) => *discoverer,
            Self::Owned(discoverer) => discoverer.as_ref(),
        }
    }
}

/// Use the given discoverer, or build one from the ambient cluster config
///
/// # Errors
/// Returns [`Error::ConfigUnavailable`] if no discoverer was supplied and no
/// usable cluster configuration can be found.
pub fn resolve_discoverer(discoverer: Option<&dyn Discoverer>) -> Result<DiscovererRef<'_>> {
    resolve_discoverer_with(discoverer, &ClusterConfig::default())
}

/// Use the given discoverer, or build one from `config`
///
/// # Errors
/// Returns [`Error::ConfigUnavailable`] if no discoverer was supplied and
/// `config` does not lead to a usable client.
pub fn resolve_discoverer_with<'a>(
    discoverer: Option<&'a dyn Discoverer>,
    config: &ClusterConfig,
) -> Result<DiscovererRef<'a>> {
    match discoverer {
        Some(discoverer) => Ok(DiscovererRef::Borrowed(discoverer)),
        None => {
            debug!(source = ?config.source, "no discoverer supplied, loading cluster configuration");
            let discoverer = KubeDiscoverer::new(config).map_err(|e| {
                warn!(error = %e, "unable to default cluster configuration");
                Error::ConfigUnavailable(e)
            })?;
            Ok(DiscovererRef::Owned(Box::new(discoverer)))
        }
    }
}

/// Detect whether the cluster runs OpenShift or plain Kubernetes
///
/// Performs one server version query and one API group listing. The cluster
/// is OpenShift iff it serves the `route.openshift.io` group.
///
/// # Errors
/// Returns [`Error::DiscoveryUnavailable`] if the server version cannot be
/// fetched, or [`Error::DiscoveryPartial`] if the group listing fails.
pub fn get_platform_info(discoverer: &dyn Discoverer) -> Result<PlatformInfo> {
    info!("detecting platform version");

    let server_version = discoverer.server_version().map_err(|e| {
        warn!(error = %e, "unable to fetch server version");
        Error::DiscoveryUnavailable(e)
    })?;
    debug!(?server_version, "server version");

    let groups = discoverer.server_groups().map_err(|e| {
        warn!(error = %e, "unable to fetch server groups");
        Error::DiscoveryPartial(e)
    })?;

    let name = if serves_group(&groups, OPENSHIFT_MARKER_GROUP) {
        info!("{OPENSHIFT_MARKER_GROUP} found in apis, platform is OpenShift");
        PlatformType::OpenShift
    } else {
        PlatformType::Kubernetes
    };

    let platform_info = PlatformInfo {
        name,
        k8s_version: format!("{}.{}", server_version.major, server_version.minor),
        os: server_version.platform,
    };
    info!("{platform_info}");
    Ok(platform_info)
}

/// OpenShift API generation, told apart by the OpenAPI schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaGeneration {
    /// OpenShift 3.x reports its own version in the schema (`v3.11.0+...`)
    OpenShift3,
    /// OpenShift 4.x reports the Kubernetes version (`v1.13.4+...`), so the
    /// real version must be read from the ClusterVersion resource
    OpenShift4,
    Unrecognized,
}

impl SchemaGeneration {
    /// Classify by the first four characters of the schema version
    #[must_use]
    pub fn from_schema_version(version: &str) -> Self {
        match version.get(..4) {
            Some("v3.1") => Self::OpenShift3,
            Some("v1.1") => Self::OpenShift4,
            _ => Self::Unrecognized,
        }
    }
}

/// The slice of the ClusterVersion resource that carries the version
#[derive(Debug, Default, Deserialize)]
pub struct ClusterVersionInfo {
    #[serde(default)]
    pub status: ClusterVersionStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClusterVersionStatus {
    #[serde(default)]
    pub desired: Release,
}

#[derive(Debug, Default, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub version: String,
}

/// Look up the precise OpenShift version from the cluster APIs
///
/// Fetches the OpenAPI schema once. On OpenShift 3 the schema version is the
/// answer. On OpenShift 4 exactly one GET of [`CLUSTER_VERSION_API_PATH`]
/// follows and `status.desired.version` is the answer. Any other schema
/// generation yields an empty version, which means "undetermined".
///
/// # Errors
/// - [`Error::SchemaUnavailable`] if the schema cannot be fetched
/// - [`Error::PermissionDenied`] if the ClusterVersion read is unauthorized
/// - [`Error::RestCallFailed`] for any other ClusterVersion read failure
/// - [`Error::DecodeFailed`] if the ClusterVersion body is not as expected
pub fn lookup_openshift_version(discoverer: &dyn Discoverer) -> Result<OpenShiftVersion> {
    let doc = discoverer.openapi_schema().map_err(|e| {
        warn!(error = %e, "unable to fetch OpenAPI schema");
        Error::SchemaUnavailable(e)
    })?;
    let schema_version = doc.info.version;
    debug!(%schema_version, "OpenAPI schema info");

    match SchemaGeneration::from_schema_version(&schema_version) {
        SchemaGeneration::OpenShift3 => Ok(OpenShiftVersion::new(schema_version)),
        SchemaGeneration::OpenShift4 => fetch_cluster_version(discoverer),
        SchemaGeneration::Unrecognized => {
            info!(%schema_version, "unrecognized schema generation, OpenShift version undetermined");
            Ok(OpenShiftVersion::default())
        }
    }
}

fn fetch_cluster_version(discoverer: &dyn Discoverer) -> Result<OpenShiftVersion> {
    let path = CLUSTER_VERSION_API_PATH;
    let body = discoverer
        .rest_get(path)
        .map_err(|e| rest_call_error(path, e))?;

    let cluster_version: ClusterVersionInfo =
        serde_json::from_slice(&body).map_err(|source| {
            warn!(error = %source, "unable to decode ClusterVersion");
            Error::DecodeFailed {
                path: path.to_string(),
                source,
            }
        })?;

    let version = OpenShiftVersion::new(cluster_version.status.desired.version);
    info!("{version}");
    Ok(version)
}

fn rest_call_error(path: &str, source: ClientError) -> Error {
    warn!(error = %source, "issue making API version rest call");
    if source.is_forbidden() {
        Error::PermissionDenied {
            path: path.to_string(),
            source,
        }
    } else {
        Error::RestCallFailed {
            path: path.to_string(),
            source,
        }
    }
}

/// Check that a group/version serves a resource with exactly this name
///
/// # Errors
/// Returns [`Error::DiscoveryUnavailable`] if the group/version cannot be
/// listed, or [`Error::ResourceNotFound`] if it does not serve `resource`.
pub fn custom_resource_exists(
    discoverer: &dyn Discoverer,
    group_version: &str,
    resource: &str,
) -> Result<bool> {
    let resources = discoverer
        .server_resources_for_group_version(group_version)
        .map_err(|e| {
            warn!(error = %e, %group_version, "unable to list group version resources");
            Error::DiscoveryUnavailable(e)
        })?;

    if resources.resources.iter().any(|r| r.name == resource) {
        Ok(true)
    } else {
        Err(Error::ResourceNotFound {
            group_version: group_version.to_string(),
            resource: resource.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, ConfigSource};

    #[test]
    fn schema_generations() {
        assert_eq!(
            SchemaGeneration::from_schema_version("v3.11.0+d4cacc0"),
            SchemaGeneration::OpenShift3
        );
        assert_eq!(
            SchemaGeneration::from_schema_version("v1.13.4+c2a5caf"),
            SchemaGeneration::OpenShift4
        );
        assert_eq!(
            SchemaGeneration::from_schema_version("v2.0.0"),
            SchemaGeneration::Unrecognized
        );
        assert_eq!(
            SchemaGeneration::from_schema_version("v1.9.1"),
            SchemaGeneration::Unrecognized
        );
    }

    #[test]
    fn short_schema_versions_are_unrecognized() {
        assert_eq!(SchemaGeneration::from_schema_version(""), SchemaGeneration::Unrecognized);
        assert_eq!(SchemaGeneration::from_schema_version("v3."), SchemaGeneration::Unrecognized);
        assert_eq!(SchemaGeneration::from_schema_version("v3.1"), SchemaGeneration::OpenShift3);
        // Multi-byte characters must not split a char boundary
        assert_eq!(SchemaGeneration::from_schema_version("véé1"), SchemaGeneration::Unrecognized);
    }

    #[test]
    fn cluster_version_shape_ignores_other_fields() {
        let body = r#"{"apiVersion":"config.openshift.io/v1","kind":"ClusterVersion","spec":{"channel":"stable-4.2"},"status":{"desired":{"image":"quay.io/x","version":"4.2.1"},"history":[{"version":"4.2.1"}]}}"#;
        let info: ClusterVersionInfo = serde_json::from_str(body).unwrap();
        assert_eq!(info.status.desired.version, "4.2.1");
    }

    #[test]
    fn cluster_version_without_status_is_empty() {
        let info: ClusterVersionInfo = serde_json::from_str(r#"{"kind":"ClusterVersion"}"#).unwrap();
        assert!(info.status.desired.version.is_empty());
    }

    #[test]
    fn missing_configuration_is_config_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClusterConfig::new(ConfigSource::Kubeconfig(dir.path().join("missing")));
        let err = resolve_discoverer_with(None, &config).err().unwrap();
        assert!(matches!(err, Error::ConfigUnavailable(ConfigError::Kubeconfig(_))));
    }
}
