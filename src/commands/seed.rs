use std::path::PathBuf;

use console::style;
use miette::Result;

use ontokit::config::ConfigOverrides;
use ontokit::error::OntokitError;
use ontokit::{seed_project, SeedOptions};

#[allow(clippy::too_many_arguments)]
pub fn run(
    config: Option<PathBuf>,
    templatedir: PathBuf,
    outdir: PathBuf,
    title: Option<String>,
    user: Option<String>,
    dependencies: Vec<String>,
    git: bool,
    repo: Vec<String>,
    version: Option<String>,
) -> Result<()> {
    if repo.len() > 1 {
        return Err(OntokitError::AmbiguousTarget { candidates: repo }.into());
    }
    let repo = repo.into_iter().next();

    let target_dir = match &repo {
        Some(name) => outdir.join(name),
        None => outdir,
    };

    let options = SeedOptions {
        config,
        template_dir: templatedir,
        target_dir,
        overrides: ConfigOverrides {
            title,
            org: user,
            repo,
            imports: dependencies,
        },
        git,
        version,
    };

    let report = seed_project(&options)?;

    println!(
        "\n{} Seeded {} at {}",
        style("✓").green().bold(),
        style(&report.project_id).cyan(),
        style(report.target_dir.display()).cyan()
    );
    println!("  {} files written", report.written.len());
    Ok(())
}
