use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(
    name = "ghpublish",
    version,
    about = "Publish CI build artifacts as a tagged GitHub release",
    long_about = None
)]
pub struct Args {
    /// GitHub token used for every API call
    #[clap(long, env = "GITHUB_RELEASE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub repository (owner/repo or a remote URL)
    /// If not specified, uses the pipeline material URL or the `origin` remote
    #[clap(long)]
    pub repository: Option<String>,

    /// Commit to tag
    /// If not specified, uses the pipeline revision or HEAD
    #[clap(long)]
    pub revision: Option<String>,

    /// Release notes, also used as the tag message
    #[clap(long, env = "RELEASE_NOTES", default_value = "")]
    pub notes: String,

    /// Directory holding one subdirectory per build target
    #[clap(long, default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// Pipeline stage whose directory holds the files in each target
    #[clap(long, env = "PPL_Name")]
    pub stage: Option<String>,

    /// Create as draft release
    #[clap(long)]
    pub draft: bool,

    /// Configuration file path
    #[clap(long, default_value = crate::config::PROJECT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Enable verbose output
    #[clap(long)]
    pub verbose: bool,
}
