// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Cluster connection settings
//!
//! Loading is delegated to `kube`, so every credential kind a kubeconfig can
//! carry (bearer tokens, client certificates, exec plugins) reaches the
//! client. With [`ConfigSource::Infer`] the lookup order is `$KUBECONFIG`
//! or `~/.kube/config`, then the in-cluster service account.

use std::path::PathBuf;
use std::time::Duration;

use kube::config::{
    InClusterError, InferConfigError, KubeConfigOptions, Kubeconfig, KubeconfigError,
};
use tracing::debug;

/// Default per-request read timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while locating cluster configuration or building a client
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no kubeconfig or in-cluster configuration found: {0}")]
    Infer(#[from] InferConfigError),

    #[error("unable to load kubeconfig: {0}")]
    Kubeconfig(#[from] KubeconfigError),

    #[error("unable to load in-cluster configuration: {0}")]
    InCluster(#[from] InClusterError),

    #[error("unable to build cluster client: {0}")]
    Client(#[source] kube::Error),

    #[error("unable to start I/O runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Where connection settings are read from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Kubeconfig from the environment, falling back to in-cluster
    #[default]
    Infer,
    /// One kubeconfig file
    Kubeconfig(PathBuf),
    /// The pod's service account only
    InCluster,
}

/// How to reach a cluster's API server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConfig {
    pub source: ConfigSource,
    /// Kubeconfig context to use instead of `current-context`
    pub context: Option<String>,
    pub insecure_skip_tls_verify: bool,
    pub timeout: Duration,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self::new(ConfigSource::Infer)
    }
}

impl ClusterConfig {
    #[must_use]
    pub fn new(source: ConfigSource) -> Self {
        Self {
            source,
            context: None,
            insecure_skip_tls_verify: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure_skip_tls_verify = insecure;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve the settings into a `kube` client configuration
    ///
    /// A context override skips the in-cluster fallback of
    /// [`ConfigSource::Infer`], since a service account has no contexts.
    ///
    /// # Errors
    /// Returns the loader error of the selected source
    pub async fn load(&self) -> Result<kube::Config, ConfigError> {
        let options = KubeConfigOptions {
            context: self.context.clone(),
            ..KubeConfigOptions::default()
        };

        let mut config = match &self.source {
            ConfigSource::Infer if self.context.is_none() => kube::Config::infer().await?,
            ConfigSource::Infer => kube::Config::from_kubeconfig(&options).await?,
            ConfigSource::Kubeconfig(path) => {
                debug!(path = %path.display(), "loading kubeconfig");
                let kubeconfig = Kubeconfig::read_from(path)?;
                kube::Config::from_custom_kubeconfig(kubeconfig, &options).await?
            }
            ConfigSource::InCluster => kube::Config::incluster()?,
        };

        if self.insecure_skip_tls_verify {
            config.accept_invalid_certs = true;
        }
        config.read_timeout = Some(self.timeout);
        debug!(server = %config.cluster_url, "cluster configuration loaded");
        Ok(config)
    }
}
