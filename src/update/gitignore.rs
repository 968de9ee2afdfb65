use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::info;

use crate::error::{OntokitError, Result};

/// Sentinel lines bracketing the generator-owned portion of the file.
pub const MANAGED_BEGIN: &str = "# ONTOKIT-MANAGED SECTION: BEGIN (everything up to END is regenerated)";
pub const MANAGED_END: &str = "# ONTOKIT-MANAGED SECTION: END";

/// Merge freshly rendered managed ignore lines with an existing file.
///
/// The old file's managed region (between the sentinels) is replaced
/// wholesale; lines outside it are user-owned and preserved after the new
/// managed block, eliding any line the managed output already carries.
/// Idempotent: re-running on its own output is a no-op.
pub fn merge_gitignore(rendered: &str, existing: Option<&str>) -> String {
    let managed: Vec<&str> = rendered.lines().collect();
    let managed_set: HashSet<&str> = managed.iter().copied().collect();

    let mut out = String::new();
    out.push_str(MANAGED_BEGIN);
    out.push('\n');
    for line in &managed {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(MANAGED_END);
    out.push('\n');

    if let Some(existing) = existing {
        let mut in_managed = false;
        for line in existing.lines() {
            if line == MANAGED_BEGIN {
                in_managed = true;
                continue;
            }
            if line == MANAGED_END {
                in_managed = false;
                continue;
            }
            if in_managed || managed_set.contains(line) {
                continue;
            }
            out.push_str(line);
            out.push('\n');
        }
    }

    out
}

/// Apply the merge to `target`, reading any existing content first.
pub fn update_gitignore(rendered: &str, target: &Path) -> Result<()> {
    let existing = match fs::read_to_string(target) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            return Err(OntokitError::io(format!("reading {}", target.display()), e));
        }
    };
    let merged = merge_gitignore(rendered, existing.as_deref());
    fs::write(target, merged)
        .map_err(|e| OntokitError::io(format!("writing {}", target.display()), e))?;
    info!("merged {}", target.display());
    Ok(())
}
