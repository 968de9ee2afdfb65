use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ontokit",
    about = "Scaffold and maintain ontology project repositories",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a single template against a project configuration
    Template {
        /// Project configuration document (defaults apply when omitted)
        #[arg(short = 'C', long)]
        config: Option<PathBuf>,

        /// Template file to render
        #[arg(short, long)]
        input: PathBuf,

        /// Write the rendered text here instead of standard output
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the fully-resolved project configuration
    ExportConfig {
        /// Project configuration document (defaults apply when omitted)
        #[arg(short = 'C', long)]
        config: Option<PathBuf>,

        /// Write the resolved document here instead of standard output
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Seed a brand-new ontology project directory
    Seed {
        /// Project configuration document (defaults apply when omitted)
        #[arg(short = 'C', long)]
        config: Option<PathBuf>,

        /// Template tree to instantiate
        #[arg(short = 'T', long, default_value = "./template")]
        templatedir: PathBuf,

        /// Directory the new repository is created in
        #[arg(short = 'D', long, default_value = "target")]
        outdir: PathBuf,

        /// Project title, overriding the document
        #[arg(short, long)]
        title: Option<String>,

        /// Organization / user owning the repository
        #[arg(short = 'u', long)]
        user: Option<String>,

        /// Extra import ids (can be repeated: -d ro -d pato)
        #[arg(short = 'd', long = "dependencies")]
        dependencies: Vec<String>,

        /// Initialize a git repository and commit the generated tree
        #[arg(long)]
        git: bool,

        /// Repository name; also the project id fallback (max one)
        repo: Vec<String>,
    },

    /// Re-apply newer templates onto an existing project directory
    Update {
        /// Template tree to re-apply
        #[arg(short = 'T', long, default_value = "./template")]
        templatedir: PathBuf,

        /// Run the external tool to redeclare imports in the edit file
        #[arg(long)]
        declare_imports: bool,

        /// External build tool used for import declarations
        #[arg(long, default_value = "robot")]
        import_tool: String,

        /// Project directory to update
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}
