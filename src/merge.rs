//! Three-phase manifest merge engine.
//!
//! Phase order is load-bearing: manually edited records are seeded first,
//! then each direct prerequisite's own manifest is folded in, then
//! whatever is still missing is freshly resolved. Reordering the phases
//! changes which data wins and breaks the manual-override guarantee.

use crate::error::Result;
use crate::manifest::Manifest;
use crate::resolver::EntryResolver;
use tracing::debug;

/// Phase 1: copy forward every record flagged `x-manuallyEdited` from the
/// previously persisted manifest, verbatim. Unflagged records are dropped
/// here; they are re-derived transitively or freshly resolved below, so
/// stale data cannot persist silently.
pub fn seed_manually_edited(manifest: &mut Manifest, previous: &Manifest) {
    for record in previous.records() {
        if record.manually_edited {
            debug!(module = %record.module_name, "keeping manually edited record");
            manifest.insert(record.clone());
        }
    }
}

/// Phase 2: fold one prerequisite's own aggregated manifest into the
/// running manifest.
///
/// A record already present (from the manual seed or an earlier transitive
/// merge) is never overwritten; the nested record's `x-usedBy` names are
/// folded into the existing record's set instead. The merging prerequisite
/// seeded its own name into those sets when it aggregated, so this is how
/// it becomes recorded as a consumer.
pub fn merge_transitive(manifest: &mut Manifest, nested: &Manifest) {
    for record in nested.records() {
        match manifest.get_mut(&record.module_name) {
            Some(existing) => {
                for consumer in &record.used_by {
                    existing.add_consumer(consumer);
                }
            }
            None => manifest.insert(record.clone()),
        }
    }
}

/// Phase 3: account for every direct prerequisite of the current project.
///
/// A prerequisite already known (manual seed or transitive merge) just
/// gains the project as a consumer. Anything else is freshly resolved and
/// seeded with exactly the project's name. Either way each direct
/// prerequisite ends up in the manifest exactly once.
pub fn resolve_direct(
    manifest: &mut Manifest,
    prereqs: &[String],
    project: &str,
    resolver: &EntryResolver<'_>,
) -> Result<()> {
    for prereq in prereqs {
        if let Some(existing) = manifest.get_mut(prereq) {
            debug!(%prereq, project, "adding project to usedBy");
            existing.add_consumer(project);
        } else {
            let mut record = resolver.resolve(prereq)?;
            record.used_by = vec![project.to_string()];
            manifest.insert(record);
        }
    }
    Ok(())
}
