//! License manifest data model and persistence.
//!
//! The on-disk document is a single JSON object with one key,
//! `dependencies`, holding license records sorted ascending by
//! `moduleName`. The whole document is rewritten on every run; it is never
//! patched in place.

use crate::error::{AuditError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Location of a project's aggregated license manifest, relative to the
/// project root. Nested manifests are looked up at the same relative path
/// inside each prerequisite.
pub const MANIFEST_RELATIVE_PATH: &str = "Dependencies/prereqs-licenses.json";

fn is_false(flag: &bool) -> bool {
    !flag
}

/// One dependency's license facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Unique key within a manifest.
    #[serde(rename = "moduleName")]
    pub module_name: String,

    /// Display name of the license, or `UNKNOWN`.
    #[serde(rename = "moduleLicense")]
    pub module_license: String,

    /// Source-control remote of the module, when it has one.
    #[serde(rename = "moduleUrl", skip_serializing_if = "Option::is_none")]
    pub module_url: Option<String>,

    /// Reference link for the license text.
    #[serde(rename = "moduleLicenseUrl", skip_serializing_if = "Option::is_none")]
    pub module_license_url: Option<String>,

    /// Canonical SPDX identifier, when the classifier token resolved.
    #[serde(rename = "x-spdxId", skip_serializing_if = "Option::is_none")]
    pub spdx_id: Option<String>,

    #[serde(rename = "x-isOsiApproved", skip_serializing_if = "Option::is_none")]
    pub is_osi_approved: Option<bool>,

    /// Reverse-dependency index: which consumers rely on this module.
    /// Always sorted ascending, no duplicates.
    #[serde(rename = "x-usedBy", default)]
    pub used_by: Vec<String>,

    /// Hand-corrected records survive re-scans unchanged (except for
    /// `x-usedBy` updates). Absent on disk means false.
    #[serde(rename = "x-manuallyEdited", default, skip_serializing_if = "is_false")]
    pub manually_edited: bool,
}

impl LicenseRecord {
    /// Create a record with the given license token and nothing else known.
    pub fn new(module_name: impl Into<String>, module_license: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            module_license: module_license.into(),
            module_url: None,
            module_license_url: None,
            spdx_id: None,
            is_osi_approved: None,
            used_by: Vec::new(),
            manually_edited: false,
        }
    }

    /// Record for a prerequisite whose license could not be located.
    pub fn unknown(module_name: impl Into<String>) -> Self {
        Self::new(module_name, "UNKNOWN")
    }

    /// Insert a consumer name into `x-usedBy` at its sorted position.
    /// Adding the same name again is a no-op.
    pub fn add_consumer(&mut self, name: &str) {
        if let Err(pos) = self.used_by.binary_search_by(|u| u.as_str().cmp(name)) {
            self.used_by.insert(pos, name.to_string());
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ManifestDocument {
    dependencies: Vec<LicenseRecord>,
}

/// Mapping from module name to license record, covering the direct and
/// transitive dependency closure of a project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    records: BTreeMap<String, LicenseRecord>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a persisted manifest document. I/O failures map to
    /// [`AuditError::ReadError`], structural failures to
    /// [`AuditError::ManifestError`]; the caller decides whether either is
    /// recoverable.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| AuditError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        let document: ManifestDocument =
            serde_json::from_str(&content).map_err(|e| AuditError::ManifestError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let mut manifest = Self::new();
        for record in document.dependencies {
            manifest.insert(record);
        }
        Ok(manifest)
    }

    /// Rewrite the whole document at `path`, records sorted ascending by
    /// module name. Parent directories are created as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let document = ManifestDocument {
            dependencies: self.records.values().cloned().collect(),
        };
        let mut json = serde_json::to_string_pretty(&document)?;
        json.push('\n');

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| AuditError::WriteError {
                    path: parent.display().to_string(),
                    source: e,
                })?;
            }
        }

        fs::write(path, json).map_err(|e| AuditError::WriteError {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Insert a record keyed by its module name, replacing any existing
    /// record under that key.
    pub fn insert(&mut self, record: LicenseRecord) {
        self.records.insert(record.module_name.clone(), record);
    }

    pub fn get(&self, module_name: &str) -> Option<&LicenseRecord> {
        self.records.get(module_name)
    }

    pub fn get_mut(&mut self, module_name: &str) -> Option<&mut LicenseRecord> {
        self.records.get_mut(module_name)
    }

    pub fn contains(&self, module_name: &str) -> bool {
        self.records.contains_key(module_name)
    }

    /// Records in ascending module-name order.
    pub fn records(&self) -> impl Iterator<Item = &LicenseRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_add_consumer_sorted() {
        let mut record = LicenseRecord::new("zlib", "Zlib");
        record.add_consumer("projb");
        record.add_consumer("proja");
        record.add_consumer("projc");
        assert_eq!(record.used_by, vec!["proja", "projb", "projc"]);
    }

    #[test]
    fn test_add_consumer_deduplicates() {
        let mut record = LicenseRecord::new("zlib", "Zlib");
        record.add_consumer("proja");
        record.add_consumer("proja");
        record.add_consumer("proja");
        assert_eq!(record.used_by, vec!["proja"]);
    }

    #[test]
    fn test_record_serializes_wire_keys() {
        let mut record = LicenseRecord::new("zlib", "zlib License");
        record.spdx_id = Some("Zlib".to_string());
        record.is_osi_approved = Some(true);
        record.used_by = vec!["myproject".to_string()];

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["moduleName"], "zlib");
        assert_eq!(json["moduleLicense"], "zlib License");
        assert_eq!(json["x-spdxId"], "Zlib");
        assert_eq!(json["x-isOsiApproved"], true);
        assert_eq!(json["x-usedBy"][0], "myproject");
    }

    #[test]
    fn test_record_omits_absent_optionals() {
        let record = LicenseRecord::unknown("mystery");
        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("moduleUrl"));
        assert!(!obj.contains_key("moduleLicenseUrl"));
        assert!(!obj.contains_key("x-spdxId"));
        assert!(!obj.contains_key("x-isOsiApproved"));
        assert!(!obj.contains_key("x-manuallyEdited"));
    }

    #[test]
    fn test_record_absent_manually_edited_is_false() {
        let json = r#"{"moduleName": "zlib", "moduleLicense": "Zlib", "x-usedBy": []}"#;
        let record: LicenseRecord = serde_json::from_str(json).unwrap();
        assert!(!record.manually_edited);
    }

    #[test]
    fn test_manifest_roundtrip_sorted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prereqs-licenses.json");

        let mut manifest = Manifest::new();
        manifest.insert(LicenseRecord::new("zlib", "Zlib"));
        manifest.insert(LicenseRecord::new("curl", "curl License"));
        manifest.insert(LicenseRecord::new("openssl", "Apache-2.0"));
        manifest.save(&path).unwrap();

        let loaded = Manifest::load(&path).unwrap();
        let names: Vec<&str> = loaded.records().map(|r| r.module_name.as_str()).collect();
        assert_eq!(names, vec!["curl", "openssl", "zlib"]);
        assert_eq!(loaded, manifest);
    }

    #[test]
    fn test_manifest_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Dependencies").join("prereqs-licenses.json");

        Manifest::new().save(&path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_manifest_load_malformed_is_manifest_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = Manifest::load(&path).unwrap_err();
        assert!(matches!(err, AuditError::ManifestError { .. }));
    }

    #[test]
    fn test_manifest_load_missing_is_read_error() {
        let err = Manifest::load(Path::new("/nonexistent/manifest.json")).unwrap_err();
        assert!(matches!(err, AuditError::ReadError { .. }));
    }

    #[test]
    fn test_insert_replaces_existing_key() {
        let mut manifest = Manifest::new();
        manifest.insert(LicenseRecord::new("zlib", "UNKNOWN"));
        manifest.insert(LicenseRecord::new("zlib", "Zlib"));
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.get("zlib").unwrap().module_license, "Zlib");
    }
}
