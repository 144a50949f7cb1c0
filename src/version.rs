// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Version comparison and normalization helpers
//!
//! The comparator only understands dotted unsigned integers. Prefixes such as
//! a leading `v` or `+build` metadata must be removed with
//! [`normalize_version`] before comparing.

use std::cmp::Ordering;

use crate::error::{Error, Result};

/// Compare two dotted numeric version strings
///
/// Missing trailing segments count as `0`, so "4.2" and "4.2.0" are equal.
/// Every present segment must be an unsigned integer; the first one that is
/// not aborts the comparison with [`Error::InvalidVersionFormat`]. No prefix
/// is stripped here.
///
/// `Ordering::Less`, `Equal` and `Greater` correspond to -1, 0 and 1.
///
/// # Examples
/// ```
/// use std::cmp::Ordering;
/// use ocpver::version::compare_versions;
///
/// assert_eq!(compare_versions("4.3", "4.1").unwrap(), Ordering::Greater);
/// assert_eq!(compare_versions("4.2", "4.2.0").unwrap(), Ordering::Equal);
/// assert!(compare_versions("v4.1", "v4.4").is_err());
/// ```
///
/// # Errors
/// Returns [`Error::InvalidVersionFormat`] if a segment of either input is
/// not numeric, including the empty string.
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering> {
    let a_parts: Vec<&str> = a.split('.').collect();
    let b_parts: Vec<&str> = b.split('.').collect();

    let max_len = a_parts.len().max(b_parts.len());
    for i in 0..max_len {
        let a_part = parse_segment(a, a_parts.get(i).copied())?;
        let b_part = parse_segment(b, b_parts.get(i).copied())?;
        match a_part.cmp(&b_part) {
            Ordering::Equal => {}
            other => return Ok(other),
        }
    }

    Ok(Ordering::Equal)
}

fn parse_segment(version: &str, segment: Option<&str>) -> Result<u64> {
    let Some(segment) = segment else {
        return Ok(0);
    };
    segment
        .parse::<u64>()
        .map_err(|source| Error::InvalidVersionFormat {
            version: version.to_string(),
            segment: segment.to_string(),
            source,
        })
}

/// Strip the decorations OpenShift puts around a version number
///
/// Removes a single leading `v`/`V` and any `+build` metadata. Pre-release
/// suffixes are left in place and will be rejected by [`compare_versions`].
///
/// # Examples
/// ```
/// use ocpver::version::normalize_version;
/// assert_eq!(normalize_version("v3.11.0+d4cacc0"), "3.11.0");
/// assert_eq!(normalize_version("4.2.1"), "4.2.1");
/// assert_eq!(normalize_version("v4.5.0-rc.1"), "4.5.0-rc.1");
/// ```
#[must_use]
pub fn normalize_version(version: &str) -> &str {
    let trimmed = version.trim();
    let unprefixed = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
    unprefixed
        .split_once('+')
        .map_or(unprefixed, |(version, _)| version)
}

/// Split a version into its core, pre-release and build parts
///
/// # Examples
/// ```
/// use ocpver::version::split_version;
/// assert_eq!(split_version("4.2.1-rc.0+abc"), ("4.2.1", "rc.0", "abc"));
/// assert_eq!(split_version("4.2.1"), ("4.2.1", "", ""));
/// ```
#[must_use]
pub fn split_version(version: &str) -> (&str, &str, &str) {
    let (rest, build) = version.split_once('+').unwrap_or((version, ""));
    let (core, prerelease) = rest.split_once('-').unwrap_or((rest, ""));
    (core, prerelease, build)
}

/// Extract major.minor version from a full version string
///
/// Tolerates a leading `v` and any pre-release or build suffix.
///
/// # Examples
/// ```
/// use ocpver::version::extract_major_minor;
/// assert_eq!(extract_major_minor("4.19.0"), Some("4.19".to_string()));
/// assert_eq!(extract_major_minor("v3.11.0+d4cacc0"), Some("3.11".to_string()));
/// assert_eq!(extract_major_minor("4"), None);
/// ```
#[must_use]
pub fn extract_major_minor(version: &str) -> Option<String> {
    let mut parts = normalize_version(version).split('.');
    let major = parts.next()?;
    let minor = parts.next()?;
    let minor = minor.split('-').next().unwrap_or(minor);
    if !major.is_empty() && !minor.is_empty() {
        Some(format!("{major}.{minor}"))
    } else {
        None
    }
}
