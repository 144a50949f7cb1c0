// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Read-only cluster discovery capability
//!
//! The resolvers only ever talk to a cluster through [`Discoverer`]. The
//! kube-backed implementation lives in [`crate::client`]; tests plug in stubs.

use serde::{Deserialize, Serialize};

pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::{
    APIGroup, APIGroupList, APIResource, APIResourceList,
};
pub use k8s_openapi::apimachinery::pkg::version::Info;

/// The part of the OpenAPI v2 document this crate cares about
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub info: SchemaInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub version: String,
}

/// Failure reported by a [`Discoverer`]
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced an API answer (connect, TLS, auth plugin, timeout, ...)
    #[error("request failed: {0}")]
    Kube(#[source] kube::Error),

    /// The server answered with a non-success status
    #[error("GET {path} returned HTTP {status}: {message}")]
    Status {
        status: u16,
        path: String,
        message: String,
    },

    /// The request path could not be turned into an HTTP request
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] http::Error),

    /// The response body was not the expected JSON
    #[error("unable to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Map a kube error for `path`, keeping API status answers distinguishable
    #[must_use]
    pub fn from_kube(path: &str, error: kube::Error) -> Self {
        match error {
            kube::Error::Api(response) => Self::Status {
                status: response.code,
                path: path.to_string(),
                message: response.message,
            },
            other => Self::Kube(other),
        }
    }

    /// Whether the server refused the request for lack of privileges
    ///
    /// A 401 is an authentication failure and does not count.
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Status { status: 403, .. })
    }
}

/// Read-only queries against cluster API metadata
///
/// Every call blocks until the cluster answers or the implementation gives
/// up. Timeouts and cancellation are the implementation's business.
pub trait Discoverer: Send + Sync {
    /// `/version`
    fn server_version(&self) -> Result<Info, ClientError>;

    /// `/apis` group listing
    fn server_groups(&self) -> Result<APIGroupList, ClientError>;

    /// The OpenAPI v2 schema document
    fn openapi_schema(&self) -> Result<SchemaDocument, ClientError>;

    /// Raw body of a GET against an absolute API path
    fn rest_get(&self, path: &str) -> Result<Vec<u8>, ClientError>;

    /// Resources served by one group/version, e.g. `console.openshift.io/v1`
    fn server_resources_for_group_version(
        &self,
        group_version: &str,
    ) -> Result<APIResourceList, ClientError>;
}

/// Whether the group listing contains a group with exactly this name
#[must_use]
pub fn serves_group(groups: &APIGroupList, name: &str) -> bool {
    groups.groups.iter().any(|group| group.name == name)
}
