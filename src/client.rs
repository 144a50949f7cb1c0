// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Blocking [`Discoverer`] backed by a `kube` client
//!
//! Each discoverer owns a current-thread tokio runtime and drives one request
//! per call to completion on it. It must not be used from inside another
//! tokio runtime. No retries, no caching.

use http::header::ACCEPT;
use kube::Client;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::config::{ClusterConfig, ConfigError};
use crate::discovery::{
    APIGroupList, APIResourceList, ClientError, Discoverer, Info, SchemaDocument,
};

/// [`Discoverer`] talking to a cluster's API server
pub struct KubeDiscoverer {
    client: Client,
    runtime: Runtime,
}

impl KubeDiscoverer {
    /// Load `config` and build a discoverer for the cluster it describes
    ///
    /// # Errors
    /// Returns the loader error of the configured source, or
    /// [`ConfigError::Client`] if the client cannot be built from it
    pub fn new(config: &ClusterConfig) -> Result<Self, ConfigError> {
        let runtime = runtime()?;
        let kube_config = runtime.block_on(config.load())?;
        Self::with_runtime(kube_config, runtime)
    }

    /// Build a discoverer from the ambient cluster configuration
    ///
    /// # Errors
    /// See [`KubeDiscoverer::new`]
    pub fn try_default() -> Result<Self, ConfigError> {
        Self::new(&ClusterConfig::default())
    }

    /// Build a discoverer from an already resolved `kube` configuration
    ///
    /// # Errors
    /// Returns [`ConfigError::Client`] if the client cannot be built
    pub fn from_kube_config(config: kube::Config) -> Result<Self, ConfigError> {
        Self::with_runtime(config, runtime()?)
    }

    fn with_runtime(config: kube::Config, runtime: Runtime) -> Result<Self, ConfigError> {
        debug!(server = %config.cluster_url, "building cluster client");
        let client = {
            // the client spawns its request buffer onto the current runtime
            let _guard = runtime.enter();
            Client::try_from(config).map_err(ConfigError::Client)?
        };
        Ok(Self { client, runtime })
    }

    fn get_text(&self, path: &str) -> Result<String, ClientError> {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        debug!(%path, "GET");

        let request = http::Request::get(path.as_str())
            .header(ACCEPT, "application/json")
            .body(Vec::new())?;
        self.runtime
            .block_on(self.client.request_text(request))
            .map_err(|e| ClientError::from_kube(&path, e))
    }
}

fn runtime() -> Result<Runtime, ConfigError> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(ConfigError::Runtime)
}

impl Discoverer for KubeDiscoverer {
    fn server_version(&self) -> Result<Info, ClientError> {
        self.runtime
            .block_on(self.client.apiserver_version())
            .map_err(|e| ClientError::from_kube("/version", e))
    }

    fn server_groups(&self) -> Result<APIGroupList, ClientError> {
        self.runtime
            .block_on(self.client.list_api_groups())
            .map_err(|e| ClientError::from_kube("/apis", e))
    }

    fn openapi_schema(&self) -> Result<SchemaDocument, ClientError> {
        let body = self.get_text("/openapi/v2")?;
        Ok(serde_json::from_str(&body)?)
    }

    fn rest_get(&self, path: &str) -> Result<Vec<u8>, ClientError> {
        self.get_text(path).map(String::into_bytes)
    }

    fn server_resources_for_group_version(
        &self,
        group_version: &str,
    ) -> Result<APIResourceList, ClientError> {
        let group_version = group_version.trim_matches('/');
        let path = group_version_path(group_version);
        let request = async {
            if group_version.contains('/') {
                self.client.list_api_group_resources(group_version).await
            } else {
                self.client.list_core_api_resources(group_version).await
            }
        };
        self.runtime
            .block_on(request)
            .map_err(|e| ClientError::from_kube(&path, e))
    }
}

/// Discovery path of a group/version; the core group lives under `/api`
fn group_version_path(group_version: &str) -> String {
    if group_version.contains('/') {
        format!("/apis/{group_version}")
    } else {
        format!("/api/{group_version}")
    }
}
