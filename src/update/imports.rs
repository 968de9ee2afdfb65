use std::path::Path;
use std::process::Command;

use log::{debug, info};

use crate::config::model::OntologyProject;
use crate::error::{OntokitError, Result};

/// The edit file's name relative to the ontology source directory.
pub fn edit_file_name(project: &OntologyProject) -> String {
    format!("{}-edit.{}", project.id, project.edit_format)
}

/// Build the external tool's argument list for declaring product
/// artifacts in the edit file: imports, then components, then pattern
/// files, each in product order. Deterministic for a given project.
pub fn declaration_args(project: &OntologyProject) -> Vec<String> {
    let edit = edit_file_name(project);
    let mut args = vec!["import".to_string(), "--input".to_string(), edit.clone()];

    if let Some(group) = &project.import_group {
        for product in group.products() {
            args.push("--declare".to_string());
            args.push(format!("{}/{}_import.owl", group.directory, product.common.id));
        }
    }
    if let Some(group) = &project.components {
        for product in group.products() {
            args.push("--declare".to_string());
            args.push(format!("{}/{}", group.directory, product.filename));
        }
    }
    if let Some(group) = &project.pattern_pipelines_group {
        for product in group.products() {
            args.push("--declare".to_string());
            args.push(format!("{}/{}.owl", group.directory, product.common.id));
        }
    }

    args.push("--output".to_string());
    args.push(edit);
    args
}

/// Run the external build tool to rewrite the edit file's import
/// declarations. Synchronous and blocking; a non-zero exit status is
/// propagated verbatim with the command line and captured stderr.
pub fn declare_imports(project: &OntologyProject, ontology_dir: &Path, tool: &str) -> Result<()> {
    let args = declaration_args(project);
    if !args.iter().any(|a| a == "--declare") {
        debug!("no product artifacts to declare, skipping {tool}");
        return Ok(());
    }

    let command_line = format!("{} {}", tool, args.join(" "));
    info!("running {command_line}");
    let output = Command::new(tool)
        .args(&args)
        .current_dir(ontology_dir)
        .output()
        .map_err(|e| OntokitError::io(format!("spawning {tool}"), e))?;

    if !output.status.success() {
        return Err(OntokitError::ExternalTool {
            command: command_line,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_project, ConfigOverrides};

    fn project(yaml: &str) -> OntologyProject {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.yaml");
        std::fs::write(&path, yaml).unwrap();
        load_project(Some(&path), &ConfigOverrides::default())
            .unwrap()
            .project
    }

    #[test]
    fn args_follow_group_then_product_order() {
        let project = project(
            "id: foo\n\
             import_group:\n  ids: [ro, pato]\n\
             components:\n  filenames: [extra.owl]\n\
             pattern_pipelines_group:\n  ids: [definitions]\n",
        );

        let args = declaration_args(&project);
        assert_eq!(
            args,
            vec![
                "import",
                "--input",
                "foo-edit.owl",
                "--declare",
                "imports/ro_import.owl",
                "--declare",
                "imports/pato_import.owl",
                "--declare",
                "components/extra.owl",
                "--declare",
                "patterns/definitions.owl",
                "--output",
                "foo-edit.owl",
            ]
        );
    }

    #[test]
    fn args_are_deterministic() {
        let yaml = "id: foo\nimport_group:\n  ids: [ro, bfo, pato]\n";
        assert_eq!(
            declaration_args(&project(yaml)),
            declaration_args(&project(yaml))
        );
    }

    #[test]
    fn disabled_groups_contribute_nothing() {
        let project = project("id: foo\nimport_group:\n  disabled: true\n  ids: [ro]\n");
        let args = declaration_args(&project);
        assert!(!args.iter().any(|a| a == "--declare"));
    }

    #[test]
    fn nothing_to_declare_is_a_no_op() {
        let project = project("id: foo\n");
        let dir = tempfile::tempdir().unwrap();
        // Tool is never spawned, so a bogus name cannot fail.
        declare_imports(&project, dir.path(), "definitely-not-a-real-tool").unwrap();
    }

    #[test]
    fn failing_tool_surfaces_command_and_stderr() {
        let project = project("id: foo\nimport_group:\n  ids: [ro]\n");
        let dir = tempfile::tempdir().unwrap();
        let err = declare_imports(&project, dir.path(), "false").unwrap_err();
        match err {
            OntokitError::ExternalTool { command, .. } => {
                assert!(command.starts_with("false import"));
            }
            other => panic!("expected ExternalTool, got {other:?}"),
        }
    }
}
