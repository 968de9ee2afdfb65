pub mod config;
pub mod error;
pub mod git;
pub mod install;
pub mod render;
pub mod update;

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::config::{export_project, load_project, ConfigOverrides};
use crate::error::{OntokitError, Result};
use crate::install::{install_tree, PolicySet};

pub use crate::update::{update_repository, UpdateOptions, UpdateReport};

/// Options for seeding a brand-new project directory.
#[derive(Debug, Clone)]
pub struct SeedOptions {
    /// Project configuration document; defaults apply when absent.
    pub config: Option<PathBuf>,
    pub template_dir: PathBuf,
    pub target_dir: PathBuf,
    /// Caller-supplied values overriding the document.
    pub overrides: ConfigOverrides,
    /// Initialize a git repository and commit the generated tree.
    pub git: bool,
    /// Environment-provided generator version tag, when available.
    pub version: Option<String>,
}

/// What a seed run produced.
#[derive(Debug)]
pub struct SeedReport {
    pub target_dir: PathBuf,
    pub project_id: String,
    pub written: Vec<PathBuf>,
}

/// Seed a new ontology project repository from configuration + templates.
///
/// Loads and resolves the configuration, installs the whole template
/// tree into an (empty or new) target directory, persists the resolved
/// configuration as the durable record for later updates, and optionally
/// commits the result.
pub fn seed_project(options: &SeedOptions) -> Result<SeedReport> {
    let ctx = load_project(options.config.as_deref(), &options.overrides)?;

    fs::create_dir_all(&options.target_dir).map_err(|e| {
        OntokitError::io(format!("creating {}", options.target_dir.display()), e)
    })?;

    // A commit without an author identity would fail after the whole tree
    // is written; check before doing any work.
    if options.git {
        git::ensure_identity(&options.target_dir)?;
    }

    let mut written = install_tree(
        &options.template_dir,
        &options.target_dir,
        &ctx,
        options.version.as_deref(),
        &PolicySet::empty(),
    )?;

    let config_copy = persist_config(&options.target_dir, &ctx.project)?;
    written.push(config_copy);

    if options.git {
        git::init(&options.target_dir, &ctx.project.git_main_branch)?;
        git::add_all(&options.target_dir)?;
        git::commit(
            &options.target_dir,
            &format!("initial commit of {} sources", ctx.project.id),
        )?;
    }

    info!(
        "seeded {} into {}",
        ctx.project.id,
        options.target_dir.display()
    );
    Ok(SeedReport {
        target_dir: options.target_dir.clone(),
        project_id: ctx.project.id.clone(),
        written,
    })
}

/// Write the fully-resolved configuration into the generated tree; this
/// copy is what later `update` runs consult.
fn persist_config(
    target_dir: &Path,
    project: &crate::config::OntologyProject,
) -> Result<PathBuf> {
    let ontology_dir = target_dir.join("src/ontology");
    fs::create_dir_all(&ontology_dir)
        .map_err(|e| OntokitError::io(format!("creating {}", ontology_dir.display()), e))?;
    let path = ontology_dir.join(format!("{}-ontokit.yaml", project.id));
    fs::write(&path, export_project(project)?)
        .map_err(|e| OntokitError::io(format!("writing {}", path.display()), e))?;
    Ok(path)
}
