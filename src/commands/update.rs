use std::path::PathBuf;

use console::style;
use miette::Result;

use ontokit::{update_repository, UpdateOptions};

pub fn run(
    templatedir: PathBuf,
    declare_imports: bool,
    import_tool: String,
    path: PathBuf,
    version: Option<String>,
) -> Result<()> {
    let options = UpdateOptions {
        project_dir: path,
        template_dir: templatedir,
        version,
        declare_imports,
        import_tool,
    };

    let report = update_repository(&options)?;

    println!(
        "\n{} Update complete: {} installed, {} merged",
        style("✓").green().bold(),
        report.installed.len(),
        report.merged.len()
    );
    for path in &report.merged {
        println!("  {} {}", style("⇄").cyan(), path.display());
    }
    Ok(())
}
