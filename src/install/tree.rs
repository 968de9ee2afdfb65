use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use crate::config::model::ExecutionContext;
use crate::error::{OntokitError, Result};
use crate::install::policy::{InstallDecision, PolicySet};
use crate::render::{render, unpack::unpack};

/// Suffix marking a file for rendering; stripped for the destination name.
pub const TEMPLATE_SUFFIX: &str = ".tera";

/// Filename prefix marking a dynamic template: its rendered output is a
/// multi-file bundle, not a literal file.
pub const DYNAMIC_PREFIX: &str = "_dynamic";

/// Walk a template tree and materialize it under `target_root`.
///
/// Plain files are copied byte-for-byte (mode preserved); `.tera` files
/// are rendered with the suffix stripped; `_dynamic*` templates are
/// rendered and handed to the unpacker, resolved against their mirrored
/// parent directory. Within any one directory plain files land before
/// templated ones. Every candidate write is checked against the install
/// policies with its repo-relative destination path. Returns the union
/// of all paths actually written.
pub fn install_tree(
    template_root: &Path,
    target_root: &Path,
    ctx: &ExecutionContext,
    version: Option<&str>,
    policies: &PolicySet,
) -> Result<Vec<PathBuf>> {
    if !template_root.is_dir() {
        return Err(OntokitError::io(
            format!("template directory {}", template_root.display()),
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
        ));
    }

    let files: Vec<PathBuf> = WalkDir::new(template_root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();

    let mut written = Vec::new();

    // Two passes: verbatim copies first, then templates, so a template can
    // assume its directory's static assets are already in place.
    for src in files.iter().filter(|p| !is_template(p)) {
        install_plain(src, template_root, target_root, policies, &mut written)?;
    }
    for src in files.iter().filter(|p| is_template(p)) {
        install_template(src, template_root, target_root, ctx, version, policies, &mut written)?;
    }

    Ok(written)
}

fn is_template(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().ends_with(TEMPLATE_SUFFIX))
        .unwrap_or(false)
}

fn relative<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).expect("entry must be under the template root")
}

fn install_plain(
    src: &Path,
    template_root: &Path,
    target_root: &Path,
    policies: &PolicySet,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let rel = relative(src, template_root);
    let dest = target_root.join(rel);
    match policies.decide(rel, dest.exists()) {
        InstallDecision::Skip => {
            debug!("skipping {} (install policy)", rel.display());
            return Ok(());
        }
        InstallDecision::Install | InstallDecision::Overwrite => {}
    }
    ensure_parent(&dest)?;
    // fs::copy carries the source file mode over to the destination.
    fs::copy(src, &dest).map_err(|e| {
        OntokitError::io(
            format!("copying {} -> {}", src.display(), dest.display()),
            e,
        )
    })?;
    info!("installed {}", dest.display());
    written.push(dest);
    Ok(())
}

fn install_template(
    src: &Path,
    template_root: &Path,
    target_root: &Path,
    ctx: &ExecutionContext,
    version: Option<&str>,
    policies: &PolicySet,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let rel = relative(src, template_root);
    let file_name = rel
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let raw = fs::read_to_string(src)
        .map_err(|e| OntokitError::io(format!("reading {}", src.display()), e))?;
    let rendered = render(&rel.to_string_lossy(), &raw, ctx, version)?;

    if file_name.starts_with(DYNAMIC_PREFIX) {
        // The placeholder itself is never persisted; its output expands
        // into zero or more real files next to it.
        let base = match rel.parent() {
            Some(parent) if parent != Path::new("") => target_root.join(parent),
            _ => target_root.to_path_buf(),
        };
        info!("unpacking {}", rel.display());
        let mut unpacked = unpack(&base, &rendered, policies)?;
        written.append(&mut unpacked);
        return Ok(());
    }

    let stem = &file_name[..file_name.len() - TEMPLATE_SUFFIX.len()];
    let dest_rel = rel.with_file_name(stem);
    let dest = target_root.join(&dest_rel);
    match policies.decide(&dest_rel, dest.exists()) {
        InstallDecision::Skip => {
            debug!("skipping {} (install policy)", dest_rel.display());
            return Ok(());
        }
        InstallDecision::Install | InstallDecision::Overwrite => {}
    }
    ensure_parent(&dest)?;
    fs::write(&dest, rendered)
        .map_err(|e| OntokitError::io(format!("writing {}", dest.display()), e))?;
    info!("compiled {} -> {}", rel.display(), dest.display());
    written.push(dest);
    Ok(())
}

fn ensure_parent(dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| OntokitError::io(format!("creating {}", parent.display()), e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_project, ConfigOverrides};
    use crate::install::policy::InstallAction;

    fn test_context() -> ExecutionContext {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.yaml");
        fs::write(&path, "id: foo\nimport_group:\n  ids: [ro]\n").unwrap();
        load_project(Some(&path), &ConfigOverrides::default()).unwrap()
    }

    fn write_file(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn renders_templates_and_copies_plain_files() {
        let template = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        write_file(template.path(), "README.md", "static\n");
        write_file(
            template.path(),
            "src/ontology/Makefile.tera",
            "ONT={{ project.id }}\n",
        );

        let ctx = test_context();
        let written =
            install_tree(template.path(), target.path(), &ctx, None, &PolicySet::empty())
                .unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(
            fs::read_to_string(target.path().join("README.md")).unwrap(),
            "static\n"
        );
        assert_eq!(
            fs::read_to_string(target.path().join("src/ontology/Makefile")).unwrap(),
            "ONT=foo\n"
        );
        assert!(!target.path().join("src/ontology/Makefile.tera").exists());
    }

    #[test]
    fn dynamic_templates_expand_without_leaving_a_placeholder() {
        let template = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        write_file(
            template.path(),
            "_dynamic_files.tera",
            "^^^ src/ontology/{{ project.id }}-edit.owl\nOntology(<{{ project.uribase }}/{{ project.id }}.owl>)\n^^^ docs/index.md\n# {{ project.id }}\n",
        );

        let ctx = test_context();
        let written =
            install_tree(template.path(), target.path(), &ctx, None, &PolicySet::empty())
                .unwrap();

        assert_eq!(written.len(), 2);
        assert!(target.path().join("src/ontology/foo-edit.owl").exists());
        assert!(target.path().join("docs/index.md").exists());
        assert!(!target.path().join("_dynamic_files").exists());
        let edit = fs::read_to_string(target.path().join("src/ontology/foo-edit.owl")).unwrap();
        assert_eq!(
            edit,
            "Ontology(<http://purl.obolibrary.org/obo/foo.owl>)\n"
        );
    }

    #[test]
    fn nested_dynamic_templates_unpack_relative_to_their_directory() {
        let template = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        write_file(
            template.path(),
            "src/sparql/_dynamic_queries.tera",
            "^^^ labels.sparql\nSELECT ?x\n",
        );

        let ctx = test_context();
        let written =
            install_tree(template.path(), target.path(), &ctx, None, &PolicySet::empty())
                .unwrap();

        assert_eq!(written, vec![target.path().join("src/sparql/labels.sparql")]);
    }

    #[test]
    fn if_missing_leaves_existing_files_untouched() {
        let template = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        write_file(template.path(), "README.md", "from template\n");
        write_file(target.path(), "README.md", "user edited\n");

        let ctx = test_context();
        let written =
            install_tree(template.path(), target.path(), &ctx, None, &PolicySet::empty())
                .unwrap();

        assert!(written.is_empty());
        assert_eq!(
            fs::read_to_string(target.path().join("README.md")).unwrap(),
            "user edited\n"
        );
    }

    #[test]
    fn always_policy_overwrites_rendered_targets() {
        let template = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        write_file(template.path(), "Makefile.tera", "ONT={{ project.id }}\n");
        write_file(target.path(), "Makefile", "stale\n");

        let ctx = test_context();
        let policies = PolicySet::new(&[("Makefile", InstallAction::Always)]).unwrap();
        let written =
            install_tree(template.path(), target.path(), &ctx, None, &policies).unwrap();

        assert_eq!(written, vec![target.path().join("Makefile")]);
        assert_eq!(
            fs::read_to_string(target.path().join("Makefile")).unwrap(),
            "ONT=foo\n"
        );
    }

    #[test]
    fn render_failure_aborts_but_keeps_earlier_writes() {
        let template = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        write_file(template.path(), "static.txt", "kept\n");
        write_file(template.path(), "broken.tera", "{{ not_a_variable }}\n");

        let ctx = test_context();
        let err = install_tree(template.path(), target.path(), &ctx, None, &PolicySet::empty())
            .unwrap_err();

        assert!(matches!(err, OntokitError::Render { .. }));
        assert!(target.path().join("static.txt").exists());
    }
}
