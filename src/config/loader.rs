use std::fs;
use std::path::Path;

use log::debug;
use sha2::{Digest, Sha256};

use crate::config::model::{ExecutionContext, ImportGroup, OntologyProject};
use crate::error::{OntokitError, Result};

/// Caller-supplied values that take precedence over the document.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub title: Option<String>,
    pub org: Option<String>,
    pub repo: Option<String>,
    /// Extra import ids, appended to the import group's shorthand list.
    pub imports: Vec<String>,
}

/// Load a project configuration document, apply overrides, and run the
/// defaulting/derivation pass exactly once.
///
/// With no source document every field starts from its default, so a
/// project can be seeded from overrides alone.
pub fn load_project(
    source: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ExecutionContext> {
    let (mut project, config_hash) = match source {
        None => (OntologyProject::default(), None),
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|e| OntokitError::io(format!("reading {}", path.display()), e))?;
            let project: OntologyProject =
                serde_yaml::from_str(&raw).map_err(|e| parse_error(path, &raw, e))?;
            (project, Some(content_hash(&raw)?))
        }
    };

    if let Some(title) = &overrides.title {
        project.title = title.clone();
    }
    if let Some(org) = &overrides.org {
        project.github_org = org.clone();
    }
    if let Some(repo) = &overrides.repo {
        project.repo = repo.clone();
    }
    if !overrides.imports.is_empty() {
        let group = project.import_group.get_or_insert_with(ImportGroup::default);
        let ids = group.group.ids.get_or_insert_with(Vec::new);
        for import in &overrides.imports {
            if !ids.contains(import) {
                ids.push(import.clone());
            }
        }
    }

    if project.id.is_empty() {
        project.id = project.repo.clone();
    }
    if project.title.is_empty() {
        project.title = project.id.clone();
    }

    project.fill_missing();
    project.validate()?;
    debug!(
        "loaded project {:?} from {}",
        project.id,
        source.map_or("defaults".to_string(), |p| p.display().to_string())
    );

    Ok(ExecutionContext {
        project,
        config_hash,
    })
}

/// Serialize the fully-resolved project back to the document format.
///
/// Re-loading the export yields a model equal in every field.
pub fn export_project(project: &OntologyProject) -> Result<String> {
    serde_yaml::to_string(project).map_err(|e| OntokitError::ConfigSerialize { source: e })
}

/// SHA-256 over a canonical re-serialization of the parsed document, so
/// the hash survives any surface reformatting of the source text.
fn content_hash(raw: &str) -> Result<String> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(raw).map_err(|e| OntokitError::ConfigSerialize { source: e })?;
    let canonical =
        serde_yaml::to_string(&value).map_err(|e| OntokitError::ConfigSerialize { source: e })?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Attach file, 1-based line/column, the offending line and a caret
/// marker to a YAML parse failure.
fn parse_error(path: &Path, raw: &str, source: serde_yaml::Error) -> OntokitError {
    let (line, column) = source
        .location()
        .map(|l| (l.line(), l.column()))
        .unwrap_or((1, 1));
    let text = raw.lines().nth(line.saturating_sub(1)).unwrap_or("");
    let snippet = format!("{}\n{}^", text, " ".repeat(column.saturating_sub(1)));
    OntokitError::ConfigParse {
        path: path.to_path_buf(),
        line,
        column,
        snippet,
        source,
    }
}
