// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! OpenShift/Kubernetes Platform Version Library
//!
//! This library detects whether a running cluster is plain Kubernetes or
//! OpenShift, looks up the OpenShift version through whichever API the
//! cluster generation offers, and compares it against a requested version.

pub mod client;
pub mod config;
pub mod discovery;
pub mod error;
pub mod known_versions;
pub mod openshift;
pub mod platform;
pub mod resolver;
pub mod version;

// Re-export commonly used items at the crate root for convenience
pub use client::KubeDiscoverer;
pub use config::{ClusterConfig, ConfigError, ConfigSource};
pub use discovery::{ClientError, Discoverer};
pub use error::{Error, Result};
pub use known_versions::{lookup_known_version, map_known_version};
pub use platform::{OPENSHIFT_MARKER_GROUP, OpenShiftVersion, PlatformInfo, PlatformType};
pub use resolver::CLUSTER_VERSION_API_PATH;
pub use version::{compare_versions, extract_major_minor, normalize_version};
