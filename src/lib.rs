pub mod audit;
pub mod classifier;
pub mod cli;
pub mod error;
pub mod manifest;
pub mod merge;
pub mod prereqs;
pub mod resolver;
pub mod spdx;

pub use audit::{run, AuditConfig, NestedManifestPolicy};
pub use classifier::{LicenseClassifier, NinkaClassifier};
pub use cli::Cli;
pub use error::{AuditError, Result};
pub use manifest::{LicenseRecord, Manifest, MANIFEST_RELATIVE_PATH};
pub use spdx::SpdxRegistry;
