pub mod unpack;

use tera::{Context, Tera};

use crate::config::model::ExecutionContext;
use crate::error::{OntokitError, Result};

/// Render one template against the resolved project configuration.
///
/// Pure with respect to the context: templates get read-only access to
/// `project`, plus `config_hash` and `generator_version` when available.
/// Undefined variable access fails the render instead of producing empty
/// output, so configuration/template drift surfaces immediately.
pub fn render(
    name: &str,
    template_text: &str,
    ctx: &ExecutionContext,
    version: Option<&str>,
) -> Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template(name, template_text)
        .map_err(|e| OntokitError::Render {
            file: name.to_string(),
            source: e,
        })?;

    let mut context = Context::new();
    context.insert("project", &ctx.project);
    if let Some(hash) = &ctx.config_hash {
        context.insert("config_hash", hash);
    }
    if let Some(version) = version {
        context.insert("generator_version", version);
    }

    tera.render(name, &context).map_err(|e| OntokitError::Render {
        file: name.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::OntologyProject;
    use crate::config::{load_project, ConfigOverrides};

    fn context_for(yaml: &str) -> ExecutionContext {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.yaml");
        std::fs::write(&path, yaml).unwrap();
        load_project(Some(&path), &ConfigOverrides::default()).unwrap()
    }

    #[test]
    fn interpolates_project_fields_and_products() {
        let ctx = context_for("id: foo\nimport_group:\n  ids: [ro, pato]\n");
        let template = "ONT={{ project.id }}\n\
                        {% for p in project.import_group.products %}IMP={{ p.id }}\n{% endfor %}";
        let out = render("Makefile.tera", template, &ctx, None).unwrap();
        assert_eq!(out, "ONT=foo\nIMP=ro\nIMP=pato\n");
    }

    #[test]
    fn undefined_variable_fails_the_render() {
        let ctx = ExecutionContext {
            project: OntologyProject::default(),
            config_hash: None,
        };
        let err = render("t", "{{ no_such_variable }}", &ctx, None).unwrap_err();
        assert!(matches!(err, OntokitError::Render { .. }));
    }

    #[test]
    fn version_tag_is_optional() {
        let ctx = ExecutionContext {
            project: OntologyProject::default(),
            config_hash: None,
        };
        let template =
            "{% if generator_version %}v={{ generator_version }}{% else %}unversioned{% endif %}";
        assert_eq!(
            render("t", template, &ctx, Some("v1.5")).unwrap(),
            "v=v1.5"
        );
        assert_eq!(render("t", template, &ctx, None).unwrap(), "unversioned");
    }

    #[test]
    fn config_hash_is_exposed_when_present() {
        let ctx = context_for("id: foo\n");
        let out = render("t", "{{ config_hash }}", &ctx, None).unwrap();
        assert_eq!(out.len(), 64);
    }
}
