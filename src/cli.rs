use clap::Parser;

/// regprune — GitLab Container Registry Tag Pruner
#[derive(Parser, Debug)]
#[command(name = "regprune", version, about)]
pub struct Cli {
    /// GitLab private token
    #[arg(short = 'T', long, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitLab base URL
    #[arg(long, env = "GITLAB_BASE_URL", default_value = "https://gitlab.com/")]
    pub base_url: String,

    /// The ID or path of the project (required)
    #[arg(short, long, env = "GITLAB_PROJECT_ID")]
    pub project: Option<String>,

    /// Registry repository path regex; repeat for several. Clean all repositories if not set
    #[arg(short = 'r', long = "registry")]
    pub registries: Vec<String>,

    /// Image tag regex; repeat for several
    #[arg(short = 't', long = "tag")]
    pub tags: Vec<String>,

    /// Exclude image tag regex; repeat for several
    #[arg(short = 'e', long = "exclude")]
    pub excludes: Vec<String>,

    /// Keep the N latest matching tags in each repository (0 disables)
    #[arg(short = 'k', long, default_value_t = 10)]
    pub keep_n: usize,

    /// Only delete tags older than this, e.g. 12h, 7d, 1m
    #[arg(short = 'o', long, alias = "older-then", default_value = "")]
    pub older_than: String,

    /// Only print which tags would be deleted
    #[arg(short = 'n', long, default_value_t = false)]
    pub dry_run: bool,

    /// Allow connections to TLS sites without valid certificates
    #[arg(short = 'K', long, default_value_t = false)]
    pub insecure: bool,

    /// Maximum number of concurrent tag detail requests
    #[arg(short = 'j', long, default_value_t = 10)]
    pub jobs: usize,

    /// Verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
