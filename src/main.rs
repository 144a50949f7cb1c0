// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! ocpver - Main Application
//!
//! Command line front end for the platform detection library:
//! - Show whether the connected cluster is OpenShift or plain Kubernetes
//! - Look up the OpenShift version through the cluster APIs
//! - Compare the cluster's OpenShift version with a requested one
//! - Map Kubernetes versions to OpenShift releases offline

mod cli;

use std::error::Error;
use std::process::exit;

use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use ocpver::known_versions::known_versions;
use ocpver::resolver::{DiscovererRef, resolve_discoverer_with};
use ocpver::{ClusterConfig, ConfigSource, Discoverer, lookup_known_version, openshift};

/// Environment variable holding the tracing filter directives
const LOG_ENV: &str = "OCPVER_LOG";

/// Main application entry point
///
/// Parses command line arguments, sets up logging and dispatches to the
/// command handler. Errors go to stderr with a non-zero exit status.
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("ocpver: {e}");
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        exit(1);
    }
}

/// Log to stderr, filtered by `OCPVER_LOG` or the verbosity flag
fn init_tracing(verbose: bool) {
    let default = if verbose { "ocpver=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    match &cli.command {
        Command::Map { k8s_version } => cmd_map(k8s_version.as_deref(), cli.json),
        Command::Info => cmd_info(&*build_discoverer(cli)?, cli.json),
        Command::Version => cmd_version(&*build_discoverer(cli)?, cli.json),
        Command::Compare { version } => cmd_compare(&*build_discoverer(cli)?, version, cli.json),
        Command::CrdExists {
            group_version,
            resource,
        } => cmd_crd_exists(&*build_discoverer(cli)?, group_version, resource, cli.json),
    }
}

// =============================================================================
// Command Implementation Functions
// =============================================================================

/// Print the platform, Kubernetes version and OS of the cluster
fn cmd_info(discoverer: &dyn Discoverer, as_json: bool) -> Result<(), Box<dyn Error>> {
    let info = openshift::get_platform_info(Some(discoverer))?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Platform: {}", info.name);
        println!("Kubernetes: {}", info.k8s_version);
        println!("OS: {}", info.os);
    }
    Ok(())
}

/// Print the OpenShift version reported by the cluster APIs
///
/// An undetermined version is an error here so scripts never see an empty line.
fn cmd_version(discoverer: &dyn Discoverer, as_json: bool) -> Result<(), Box<dyn Error>> {
    let version = openshift::lookup_openshift_version(Some(discoverer))?;
    if version.is_empty() {
        return Err("OpenShift version could not be determined from the cluster APIs".into());
    }
    if as_json {
        println!("{}", serde_json::to_string_pretty(&version)?);
    } else {
        println!("{}", version.version);
    }
    Ok(())
}

/// Print -1, 0 or 1 as the cluster's OpenShift version is below, equal to or above `version`
fn cmd_compare(
    discoverer: &dyn Discoverer,
    version: &str,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let result = openshift::compare_openshift_version(Some(discoverer), version)? as i8;
    if as_json {
        println!("{}", json!({ "target": version, "result": result }));
    } else {
        println!("{result}");
    }
    Ok(())
}

/// Report whether `group_version` serves `resource`
fn cmd_crd_exists(
    discoverer: &dyn Discoverer,
    group_version: &str,
    resource: &str,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let exists = openshift::custom_resource_exists(Some(discoverer), group_version, resource)?;
    if as_json {
        println!(
            "{}",
            json!({ "groupVersion": group_version, "resource": resource, "exists": exists })
        );
    } else {
        println!("{resource} is served by {group_version}");
    }
    Ok(())
}

/// Build the cluster discoverer from `--kubeconfig`/`--context` or the ambient configuration
fn build_discoverer(cli: &Cli) -> Result<DiscovererRef<'static>, Box<dyn Error>> {
    let source = match &cli.kubeconfig {
        Some(path) => ConfigSource::Kubeconfig(path.clone()),
        None => ConfigSource::Infer,
    };
    let mut config = ClusterConfig::new(source).with_insecure(cli.insecure);
    if let Some(context) = &cli.context {
        config = config.with_context(context);
    }
    Ok(resolve_discoverer_with(None, &config)?)
}

/// Print the OpenShift release for one Kubernetes version, or the whole table
fn cmd_map(k8s_version: Option<&str>, as_json: bool) -> Result<(), Box<dyn Error>> {
    let Some(k8s_version) = k8s_version else {
        for (k8s, ocp) in known_versions() {
            if as_json {
                println!("{}", json!({ "k8sVersion": k8s, "ocpVersion": ocp }));
            } else {
                println!("{k8s}\t{ocp}");
            }
        }
        return Ok(());
    };

    let version = lookup_known_version(k8s_version);
    if version.is_empty() {
        return Err(format!("No known OpenShift release for Kubernetes {k8s_version}").into());
    }
    if as_json {
        println!("{}", serde_json::to_string_pretty(&version)?);
    } else {
        println!("{}", version.version);
    }
    Ok(())
}
