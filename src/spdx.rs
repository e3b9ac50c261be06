//! SPDX license registry: a static table mapping license identifiers to
//! their canonical name, OSI-approval flag, and reference URLs.

use crate::error::{AuditError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxLicense {
    pub license_id: String,
    pub name: String,
    pub is_osi_approved: bool,
    #[serde(default)]
    pub see_also: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SpdxDocument {
    licenses: Vec<SpdxLicense>,
}

/// Lookup table keyed by `licenseId`.
#[derive(Debug)]
pub struct SpdxRegistry {
    by_id: HashMap<String, SpdxLicense>,
}

impl SpdxRegistry {
    /// Load the reference table. The table is required for any SPDX
    /// resolution, so a missing or malformed file is fatal.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| AuditError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        let document: SpdxDocument =
            serde_json::from_str(&content).map_err(|e| AuditError::SpdxTableError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let by_id = document
            .licenses
            .into_iter()
            .map(|lic| (lic.license_id.clone(), lic))
            .collect();

        Ok(Self { by_id })
    }

    pub fn get(&self, license_id: &str) -> Option<&SpdxLicense> {
        self.by_id.get(license_id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TABLE: &str = r#"{
        "licenses": [
            {
                "licenseId": "MIT",
                "name": "MIT License",
                "isOsiApproved": true,
                "seeAlso": ["https://opensource.org/licenses/MIT"]
            },
            {
                "licenseId": "Zlib",
                "name": "zlib License",
                "isOsiApproved": true,
                "seeAlso": []
            }
        ]
    }"#;

    fn write_table(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("spdx-licenses.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_and_lookup() {
        let dir = TempDir::new().unwrap();
        let registry = SpdxRegistry::load(&write_table(&dir, TABLE)).unwrap();

        assert_eq!(registry.len(), 2);
        let mit = registry.get("MIT").unwrap();
        assert_eq!(mit.name, "MIT License");
        assert!(mit.is_osi_approved);
        assert_eq!(mit.see_also, vec!["https://opensource.org/licenses/MIT"]);
    }

    #[test]
    fn test_lookup_miss() {
        let dir = TempDir::new().unwrap();
        let registry = SpdxRegistry::load(&write_table(&dir, TABLE)).unwrap();
        assert!(registry.get("NoSuchLicense").is_none());
    }

    #[test]
    fn test_missing_table_is_fatal() {
        let err = SpdxRegistry::load(Path::new("/nonexistent/spdx.json")).unwrap_err();
        assert!(matches!(err, AuditError::ReadError { .. }));
    }

    #[test]
    fn test_malformed_table_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = SpdxRegistry::load(&write_table(&dir, r#"{"wrong": []}"#)).unwrap_err();
        assert!(matches!(err, AuditError::SpdxTableError { .. }));
    }
}
