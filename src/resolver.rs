//! Builds a fresh license record for a single prerequisite.

use crate::classifier::LicenseClassifier;
use crate::error::{AuditError, Result};
use crate::manifest::LicenseRecord;
use crate::prereqs;
use crate::spdx::SpdxRegistry;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

pub struct EntryResolver<'a> {
    prereqs_dir: &'a Path,
    registry: &'a SpdxRegistry,
    classifier: &'a dyn LicenseClassifier,
}

impl<'a> EntryResolver<'a> {
    pub fn new(
        prereqs_dir: &'a Path,
        registry: &'a SpdxRegistry,
        classifier: &'a dyn LicenseClassifier,
    ) -> Self {
        Self {
            prereqs_dir,
            registry,
            classifier,
        }
    }

    /// Produce a license record for one prerequisite. A missing license
    /// file degrades to `UNKNOWN`; a classifier or source-control failure
    /// aborts the run.
    pub fn resolve(&self, prereq: &str) -> Result<LicenseRecord> {
        let dir = self.prereqs_dir.join(prereq);
        debug!(prereq, dir = %dir.display(), "resolving license");

        let mut record = match prereqs::find_license_file(&dir)? {
            Some(license_file) => self.examine(prereq, &license_file)?,
            None => {
                warn!(
                    dir = %dir.display(),
                    "could not find a license file, assuming 'UNKNOWN'"
                );
                LicenseRecord::unknown(prereq)
            }
        };

        record.module_url = remote_url(&dir)?;
        Ok(record)
    }

    fn examine(&self, prereq: &str, license_file: &Path) -> Result<LicenseRecord> {
        debug!(file = %license_file.display(), "examining license file");
        let token = self.classifier.classify(license_file)?;
        let mut record = LicenseRecord::new(prereq, token.clone());

        if let Some(id) = spdx_identifier(&token) {
            match self.registry.get(id) {
                Some(entry) => {
                    record.module_license = entry.name.clone();
                    record.spdx_id = Some(id.to_string());
                    record.is_osi_approved = Some(entry.is_osi_approved);
                    record.module_license_url = entry.see_also.first().cloned();
                }
                None => {
                    warn!(%token, "classifier token not in the SPDX table");
                }
            }
        }

        debug!(license = %record.module_license, "identified license");
        Ok(record)
    }
}

/// Extract the SPDX identifier from a classifier token: the `spdx` prefix
/// plus an optional separator, followed by the identifier.
fn spdx_identifier(token: &str) -> Option<&str> {
    let rest = token.strip_prefix("spdx")?;
    let id = rest.strip_prefix(['-', '_']).unwrap_or(rest);
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// The module's source-control remote, when it has an associated
/// repository. No repository metadata is recoverable; a failing git query
/// is not.
fn remote_url(dir: &Path) -> Result<Option<String>> {
    if !dir.join(".git").join("config").is_file() {
        return Ok(None);
    }

    let output = Command::new("git")
        .args(["config", "--get", "remote.origin.url"])
        .current_dir(dir)
        .output()
        .map_err(|e| AuditError::GitError {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AuditError::GitError {
            path: dir.display().to_string(),
            message: format!("{}: {}", output.status, stderr.trim()),
        });
    }

    Ok(Some(
        String::from_utf8_lossy(&output.stdout).trim().to_string(),
    ))
}
