// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Error taxonomy for platform and version resolution
//!
//! Every resolver step maps the failure of its collaborator onto exactly one
//! variant and hands it back unchanged. Nothing here is retried.

use std::num::ParseIntError;

use crate::config::ConfigError;
use crate::discovery::ClientError;
use crate::platform::PlatformType;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving the platform or comparing versions
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No ambient cluster configuration could be located or used
    #[error("no usable cluster configuration: {0}")]
    ConfigUnavailable(#[source] ConfigError),

    /// The server version endpoint could not be queried
    #[error("unable to fetch server version: {0}")]
    DiscoveryUnavailable(#[source] ClientError),

    /// The server version was reported but the API group listing failed
    #[error("server version available but API groups could not be listed: {0}")]
    DiscoveryPartial(#[source] ClientError),

    /// The OpenAPI schema document could not be fetched
    #[error("unable to fetch OpenAPI schema document: {0}")]
    SchemaUnavailable(#[source] ClientError),

    /// The cluster version REST call failed at the transport level
    #[error("REST call to {path} failed: {source}")]
    RestCallFailed {
        path: String,
        #[source]
        source: ClientError,
    },

    /// The cluster version REST call was rejected for lack of privileges
    #[error(
        "access to {path} was denied ({source}); grant the caller read access on \
         clusterversions.config.openshift.io to look up the OpenShift version"
    )]
    PermissionDenied {
        path: String,
        #[source]
        source: ClientError,
    },

    /// A response body did not have the expected shape
    #[error("unable to decode response from {path}: {source}")]
    DecodeFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A version segment was not an unsigned integer
    #[error("invalid version format '{version}': segment '{segment}' is not numeric")]
    InvalidVersionFormat {
        version: String,
        segment: String,
        #[source]
        source: ParseIntError,
    },

    /// Distribution version comparison was requested on a non-OpenShift cluster
    #[error("platform is {platform}, not OpenShift")]
    NotOpenShift { platform: PlatformType },

    /// The cluster APIs did not yield an OpenShift version
    #[error("the OpenShift version could not be determined")]
    VersionUndetermined,

    /// The group/version is served but does not contain the resource
    #[error("{resource} is not defined in group {group_version}")]
    ResourceNotFound {
        group_version: String,
        resource: String,
    },
}

impl Error {
    /// Whether the caller should ask for elevated permissions rather than retry
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}
