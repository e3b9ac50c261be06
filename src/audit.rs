//! End-to-end aggregation run.

use crate::classifier::LicenseClassifier;
use crate::cli::Cli;
use crate::error::{AuditError, Result};
use crate::manifest::{Manifest, MANIFEST_RELATIVE_PATH};
use crate::merge;
use crate::prereqs;
use crate::resolver::EntryResolver;
use crate::spdx::SpdxRegistry;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What to do when a previously persisted manifest (the project's own or a
/// prerequisite's nested one) turns out to be malformed.
///
/// The lenient default skips it as if absent. Strict mode aborts instead,
/// for callers who would rather fail than ship a compliance report missing
/// transitive license data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NestedManifestPolicy {
    #[default]
    Lenient,
    Strict,
}

#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Root directory holding one subdirectory per prerequisite.
    pub prereqs_dir: PathBuf,
    /// The persisted manifest: read for manually edited records, rewritten
    /// on success.
    pub output: PathBuf,
    /// SPDX license reference table.
    pub spdx_table: PathBuf,
    /// Name recorded as the consumer of every direct prerequisite.
    pub project_name: String,
    pub nested_policy: NestedManifestPolicy,
}

/// Build the run configuration from CLI arguments, deriving defaults from
/// the project root.
pub fn config_from_cli(cli: &Cli) -> Result<AuditConfig> {
    let project_name = match &cli.project_name {
        Some(name) => name.clone(),
        None => derive_project_name(&cli.project_root)?,
    };

    let prereqs_dir = cli
        .prereqs_dir
        .clone()
        .unwrap_or_else(|| prereqs::default_root(&cli.project_root));

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.project_root.join(MANIFEST_RELATIVE_PATH));

    let nested_policy = if cli.strict_nested {
        NestedManifestPolicy::Strict
    } else {
        NestedManifestPolicy::Lenient
    };

    Ok(AuditConfig {
        prereqs_dir,
        output,
        spdx_table: cli.spdx.clone(),
        project_name,
        nested_policy,
    })
}

fn derive_project_name(project_root: &Path) -> Result<String> {
    let canonical = fs::canonicalize(project_root).map_err(|e| AuditError::ReadError {
        path: project_root.display().to_string(),
        source: e,
    })?;
    canonical
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_string())
        .ok_or_else(|| AuditError::ReadError {
            path: project_root.display().to_string(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "project root has no usable directory name",
            ),
        })
}

/// Run the full aggregation pipeline and persist the result.
///
/// The manifest is rebuilt from scratch: manually edited records from the
/// previous document, then every prerequisite's own manifest folded in
/// transitively, then fresh resolution of whatever direct prerequisite is
/// still missing. Nothing is written until every step has succeeded, so a
/// fatal error leaves the previous document untouched.
///
/// Returns the number of records written.
pub fn run(config: &AuditConfig, classifier: &dyn LicenseClassifier) -> Result<usize> {
    let registry = SpdxRegistry::load(&config.spdx_table)?;
    info!(
        project = %config.project_name,
        prereqs_dir = %config.prereqs_dir.display(),
        "starting license audit"
    );

    let mut manifest = Manifest::new();

    if config.output.is_file() {
        match Manifest::load(&config.output) {
            Ok(previous) => merge::seed_manually_edited(&mut manifest, &previous),
            Err(err) => skip_or_fail(config.nested_policy, &config.output, err)?,
        }
    }

    let prereq_names = prereqs::discover(&config.prereqs_dir)?;

    for prereq in &prereq_names {
        let nested_path = prereqs::nested_manifest_path(&config.prereqs_dir, prereq);
        if !nested_path.is_file() {
            continue;
        }
        debug!(%prereq, "merging nested manifest");
        match Manifest::load(&nested_path) {
            Ok(nested) => merge::merge_transitive(&mut manifest, &nested),
            Err(err) => skip_or_fail(config.nested_policy, &nested_path, err)?,
        }
    }

    let resolver = EntryResolver::new(&config.prereqs_dir, &registry, classifier);
    merge::resolve_direct(
        &mut manifest,
        &prereq_names,
        &config.project_name,
        &resolver,
    )?;

    manifest.save(&config.output)?;
    info!(records = manifest.len(), output = %config.output.display(), "manifest written");
    Ok(manifest.len())
}

fn skip_or_fail(policy: NestedManifestPolicy, path: &Path, err: AuditError) -> Result<()> {
    match policy {
        NestedManifestPolicy::Strict => Err(err),
        NestedManifestPolicy::Lenient => {
            warn!(path = %path.display(), error = %err, "skipping unreadable manifest");
            Ok(())
        }
    }
}
