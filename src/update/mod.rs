pub mod catalog;
pub mod gitignore;
pub mod imports;

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config::model::{ExecutionContext, OntologyProject};
use crate::config::{load_project, ConfigOverrides};
use crate::error::{OntokitError, Result};
use crate::install::{install_tree, InstallAction, PolicySet, TEMPLATE_SUFFIX};
use crate::render::render;

/// Options for re-applying templates onto an existing repository.
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    pub project_dir: PathBuf,
    pub template_dir: PathBuf,
    /// Environment-provided generator version tag, when available.
    pub version: Option<String>,
    /// Run the external import-declaration tool after installing files.
    pub declare_imports: bool,
    /// The external build tool used for import declarations.
    pub import_tool: String,
}

/// What an update run touched.
#[derive(Debug, Default)]
pub struct UpdateReport {
    pub installed: Vec<PathBuf>,
    pub merged: Vec<PathBuf>,
}

/// Locate the repository's own configuration copy, the durable record
/// written at seed time. Exactly one must exist.
pub fn find_project_config(project_dir: &Path) -> Result<PathBuf> {
    let ontology_dir = project_dir.join("src/ontology");
    let mut candidates: Vec<PathBuf> = Vec::new();

    let entries = fs::read_dir(&ontology_dir)
        .map_err(|e| OntokitError::io(format!("reading {}", ontology_dir.display()), e))?;
    for entry in entries {
        let entry =
            entry.map_err(|e| OntokitError::io(format!("reading {}", ontology_dir.display()), e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with("-ontokit.yaml") {
            candidates.push(entry.path());
        }
    }
    candidates.sort();

    match candidates.len() {
        0 => Err(OntokitError::MissingConfig {
            dir: ontology_dir,
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(OntokitError::AmbiguousTarget {
            candidates: candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        }),
    }
}

/// The fixed per-file update rules: generator-owned build files are
/// stamped unconditionally, user-owned files are never touched, and a
/// few entries are gated on project settings. The catalog and ignore
/// file are excluded here because their dedicated mergers handle them.
pub fn update_policies(project: &OntologyProject) -> Result<PolicySet> {
    let mut rules: Vec<(&str, InstallAction)> = vec![
        ("src/ontology/*-ontokit.yaml", InstallAction::Never),
        ("src/ontology/*-edit.*", InstallAction::Never),
        ("src/ontology/catalog-v001.xml", InstallAction::Never),
        (".gitignore", InstallAction::Never),
        ("src/ontology/Makefile", InstallAction::Always),
        ("src/ontology/run.sh", InstallAction::Always),
        ("src/sparql/*", InstallAction::Always),
    ];

    if project.ci.iter().any(|c| c == "github_actions") {
        rules.push((".github/workflows/*", InstallAction::Always));
    } else {
        rules.push((".github/**", InstallAction::Never));
    }

    let docs_enabled =
        project.documentation.is_some() || project.workflows.iter().any(|w| w == "docs");
    if docs_enabled {
        rules.push(("docs/**", InstallAction::IfMissing));
        rules.push(("mkdocs.yaml", InstallAction::IfMissing));
    } else {
        rules.push(("docs/**", InstallAction::Never));
        rules.push(("mkdocs.yaml", InstallAction::Never));
    }

    PolicySet::new(&rules)
}

/// Re-apply the template tree onto a previously seeded repository.
///
/// Consults the repository's persisted configuration, installs files
/// under the update policies, then runs the three incremental mergers.
/// Idempotent: a second run against unchanged inputs produces no diff.
pub fn update_repository(options: &UpdateOptions) -> Result<UpdateReport> {
    let config_path = find_project_config(&options.project_dir)?;
    let ctx = load_project(Some(&config_path), &ConfigOverrides::default())?;
    let policies = update_policies(&ctx.project)?;
    let version = options.version.as_deref();

    let mut report = UpdateReport {
        installed: install_tree(
            &options.template_dir,
            &options.project_dir,
            &ctx,
            version,
            &policies,
        )?,
        ..Default::default()
    };

    if let Some(rendered) = render_managed(&options.template_dir, ".gitignore", &ctx, version)? {
        let target = options.project_dir.join(".gitignore");
        gitignore::update_gitignore(&rendered, &target)?;
        report.merged.push(target);
    }

    if let Some(rendered) = render_managed(
        &options.template_dir,
        "src/ontology/catalog-v001.xml",
        &ctx,
        version,
    )? {
        let target = options.project_dir.join("src/ontology/catalog-v001.xml");
        catalog::update_catalog(&rendered, &target)?;
        report.merged.push(target);
    } else {
        warn!("template tree has no managed catalog, leaving the existing one as-is");
    }

    if options.declare_imports {
        let ontology_dir = options.project_dir.join("src/ontology");
        imports::declare_imports(&ctx.project, &ontology_dir, &options.import_tool)?;
    }

    Ok(report)
}

/// Render the template backing one merger-managed file, when the
/// template tree provides it.
fn render_managed(
    template_dir: &Path,
    rel: &str,
    ctx: &ExecutionContext,
    version: Option<&str>,
) -> Result<Option<String>> {
    let template_path = template_dir.join(format!("{rel}{TEMPLATE_SUFFIX}"));
    if !template_path.exists() {
        debug!("no template for {rel}, skipping merge");
        return Ok(None);
    }
    let raw = fs::read_to_string(&template_path)
        .map_err(|e| OntokitError::io(format!("reading {}", template_path.display()), e))?;
    render(rel, &raw, ctx, version).map(Some)
}
