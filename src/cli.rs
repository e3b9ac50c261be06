use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "prereq-audit",
    version,
    about = "License auditor for build-time prerequisites",
    long_about = "prereq-audit scans the prerequisites built for a project, identifies each \
                  one's license, merges already-aggregated manifests from the prerequisites \
                  themselves, and writes a single consolidated license manifest."
)]
pub struct Cli {
    /// Root of the project being audited
    #[arg(long, default_value = ".")]
    pub project_root: PathBuf,

    /// Consumer name recorded for direct prerequisites (defaults to the
    /// basename of the project root)
    #[arg(long)]
    pub project_name: Option<String>,

    /// Prerequisites root (defaults to .prereqs/<OS>-<ARCH> under the
    /// project root)
    #[arg(long)]
    pub prereqs_dir: Option<PathBuf>,

    /// SPDX license reference table
    #[arg(long, default_value = "spdx-licenses.json")]
    pub spdx: PathBuf,

    /// Manifest location (defaults to Dependencies/prereqs-licenses.json
    /// under the project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// License classifier command
    #[arg(long, default_value = "ninka")]
    pub classifier: String,

    /// Fail on malformed nested manifests instead of skipping them
    #[arg(long)]
    pub strict_nested: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
