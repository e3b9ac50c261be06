//! Prerequisite discovery on disk.
//!
//! Prerequisites live as one subdirectory each under a platform-specific
//! root (e.g. `.prereqs/Darwin-x86_64`). All paths are explicit
//! parameters; nothing here depends on the process working directory.

use crate::error::{AuditError, Result};
use crate::manifest::MANIFEST_RELATIVE_PATH;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Enumerate the names of all prerequisite directories under `root`.
///
/// A missing root is recoverable (prerequisites may not have been built
/// yet): it logs a warning and yields an empty set. The returned names are
/// sorted, but merge logic downstream must not rely on any particular
/// enumeration order.
pub fn discover(root: &Path) -> Result<Vec<String>> {
    if !root.is_dir() {
        warn!(
            root = %root.display(),
            "no prerequisites directory found, ensure they have been built"
        );
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(root).map_err(|e| AuditError::ReadError {
        path: root.display().to_string(),
        source: e,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AuditError::ReadError {
            path: root.display().to_string(),
            source: e,
        })?;
        if entry.path().is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }

    names.sort();
    Ok(names)
}

/// Locate a license file in a prerequisite directory: the first entry
/// whose name starts with `LICENSE`, compared case-insensitively.
pub fn find_license_file(dir: &Path) -> Result<Option<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| AuditError::ReadError {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AuditError::ReadError {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        let is_license = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.to_uppercase().starts_with("LICENSE"));
        if is_license && path.is_file() {
            candidates.push(path);
        }
    }

    // Stable pick when a module ships LICENSE and LICENSE.md, say.
    candidates.sort();
    Ok(candidates.into_iter().next())
}

/// Where a prerequisite's own aggregated manifest would live, if it is
/// itself a project with license data.
pub fn nested_manifest_path(root: &Path, prereq: &str) -> PathBuf {
    root.join(prereq).join(MANIFEST_RELATIVE_PATH)
}

/// Default prerequisites root for the build platform, named the way the
/// build system names it (`uname -s`-`uname -m`).
pub fn default_root(project_root: &Path) -> PathBuf {
    project_root.join(".prereqs").join(platform_label())
}

fn platform_label() -> String {
    let os = match std::env::consts::OS {
        "macos" => "Darwin",
        "linux" => "Linux",
        "windows" => "Windows",
        other => other,
    };
    let arch = match std::env::consts::ARCH {
        "aarch64" => "arm64",
        other => other,
    };
    format!("{}-{}", os, arch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_missing_root_is_empty() {
        let prereqs = discover(Path::new("/nonexistent/prereqs")).unwrap();
        assert!(prereqs.is_empty());
    }

    #[test]
    fn test_discover_lists_directories_only() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("zlib")).unwrap();
        fs::create_dir(dir.path().join("curl")).unwrap();
        fs::write(dir.path().join("stray-file.txt"), "not a prereq").unwrap();

        let prereqs = discover(dir.path()).unwrap();
        assert_eq!(prereqs, vec!["curl", "zlib"]);
    }

    #[test]
    fn test_find_license_file_case_insensitive() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("readme.md"), "docs").unwrap();
        fs::write(dir.path().join("license.txt"), "MIT").unwrap();

        let found = find_license_file(dir.path()).unwrap().unwrap();
        assert_eq!(found.file_name().unwrap(), "license.txt");
    }

    #[test]
    fn test_find_license_file_absent() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("readme.md"), "docs").unwrap();
        assert!(find_license_file(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_find_license_file_stable_pick() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("LICENSE.md"), "a").unwrap();
        fs::write(dir.path().join("LICENSE"), "b").unwrap();

        let found = find_license_file(dir.path()).unwrap().unwrap();
        assert_eq!(found.file_name().unwrap(), "LICENSE");
    }

    #[test]
    fn test_find_license_file_skips_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("LICENSES")).unwrap();
        assert!(find_license_file(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_nested_manifest_path() {
        let path = nested_manifest_path(Path::new("/prereqs"), "zlib");
        assert_eq!(
            path,
            Path::new("/prereqs/zlib/Dependencies/prereqs-licenses.json")
        );
    }
}
