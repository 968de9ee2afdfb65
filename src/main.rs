mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> miette::Result<()> {
    env_logger::init();
    let version = std::env::var("ONTOKIT_VERSION").ok();

    match Cli::parse().command {
        Commands::Template {
            config,
            input,
            output,
        } => commands::template::run(config, input, output, version),
        Commands::ExportConfig { config, output } => commands::export_config::run(config, output),
        Commands::Seed {
            config,
            templatedir,
            outdir,
            title,
            user,
            dependencies,
            git,
            repo,
        } => commands::seed::run(
            config,
            templatedir,
            outdir,
            title,
            user,
            dependencies,
            git,
            repo,
            version,
        ),
        Commands::Update {
            templatedir,
            declare_imports,
            import_tool,
            path,
        } => commands::update::run(templatedir, declare_imports, import_tool, path, version),
    }
}
