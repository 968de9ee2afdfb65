use std::path::PathBuf;

use miette::Result;

use ontokit::config::{export_project, load_project, ConfigOverrides};

use super::template::write_or_print;

pub fn run(config: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let ctx = load_project(config.as_deref(), &ConfigOverrides::default())?;
    let exported = export_project(&ctx.project)?;
    write_or_print(&exported, output.as_deref())
}
