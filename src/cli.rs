// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
// CLI argument definitions for ocpver
//
// Separated from main.rs so that build.rs can include this file
// to generate the man page via clap_mangen.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CLI argument parser
#[derive(Parser)]
#[command(
    name = "ocpver",
    version,
    about = "Detect the Kubernetes/OpenShift platform and version of a cluster"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Kubeconfig file to use instead of the ambient configuration
    #[arg(long = "kubeconfig", value_name = "FILE", global = true)]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use instead of the current one
    #[arg(long = "context", value_name = "NAME", global = true)]
    pub context: Option<String>,

    /// Allow insecure TLS connections (skip certificate verification)
    #[arg(short = 'k', long = "insecure", global = true)]
    pub insecure: bool,

    /// Print results as JSON
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Make the operation more talkative
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the platform, Kubernetes version and OS of the cluster
    Info,

    /// Look up the OpenShift version of the cluster
    Version,

    /// Compare the cluster's OpenShift version with VERSION (prints -1, 0 or 1)
    Compare {
        /// Version to compare against, e.g. 4.3
        #[arg(value_name = "VERSION")]
        version: String,
    },

    /// Map a Kubernetes version to its OpenShift release (lists the table without an argument)
    Map {
        /// Kubernetes version as reported by the server, e.g. 1.13+
        #[arg(value_name = "K8S_VERSION")]
        k8s_version: Option<String>,
    },

    /// Check whether a group/version serves a resource
    CrdExists {
        /// Group/version, e.g. console.openshift.io/v1
        #[arg(value_name = "GROUP_VERSION")]
        group_version: String,

        /// Plural resource name, e.g. consoleyamlsamples
        #[arg(value_name = "RESOURCE")]
        resource: String,
    },
}
