use std::fs;
use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result};

use ontokit::config::{load_project, ConfigOverrides};
use ontokit::error::OntokitError;
use ontokit::render::render;

pub fn run(
    config: Option<PathBuf>,
    input: PathBuf,
    output: Option<PathBuf>,
    version: Option<String>,
) -> Result<()> {
    let ctx = load_project(config.as_deref(), &ConfigOverrides::default())?;

    let raw = fs::read_to_string(&input)
        .map_err(|e| OntokitError::io(format!("reading {}", input.display()), e))?;
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    let rendered = render(&name, &raw, &ctx, version.as_deref())?;

    write_or_print(&rendered, output.as_deref())
}

pub fn write_or_print(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, text).into_diagnostic()?,
        None => print!("{text}"),
    }
    Ok(())
}
