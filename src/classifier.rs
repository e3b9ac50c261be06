//! External license classifier invocation.
//!
//! The classifier is a black box: given a license file it returns a raw
//! type token, possibly `spdx`-prefixed. If it cannot run at all, no
//! license data can be trusted and the run aborts.

use crate::error::{AuditError, Result};
use std::path::Path;
use std::process::Command;

/// Identifies the license type of a single license file.
pub trait LicenseClassifier {
    /// Return the raw license token for the file.
    fn classify(&self, license_file: &Path) -> Result<String>;
}

/// Classifier backed by the ninka command-line tool.
///
/// ninka prints `<file>;<license>;...` on its first output line; the token
/// is the second `;`-separated field.
pub struct NinkaClassifier {
    command: String,
}

impl NinkaClassifier {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for NinkaClassifier {
    fn default() -> Self {
        Self::new("ninka")
    }
}

impl LicenseClassifier for NinkaClassifier {
    fn classify(&self, license_file: &Path) -> Result<String> {
        let output = Command::new(&self.command)
            .arg(license_file)
            .output()
            .map_err(|e| AuditError::ClassifierError {
                path: license_file.display().to_string(),
                message: format!("failed to run '{}': {}", self.command, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AuditError::ClassifierError {
                path: license_file.display().to_string(),
                message: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let token = stdout
            .lines()
            .next()
            .unwrap_or("")
            .split(';')
            .nth(1)
            .unwrap_or("")
            .trim()
            .to_string();

        if token.is_empty() {
            return Err(AuditError::ClassifierError {
                path: license_file.display().to_string(),
                message: "no license token in classifier output".to_string(),
            });
        }

        Ok(token)
    }
}
