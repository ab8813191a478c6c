use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Crawl the portfolio site and, if its content changed, publish a
    /// freshly rendered system prompt.
    Sync(SyncArgs),
    /// Crawl only: print the combined portfolio text to stdout.
    Crawl(CrawlArgs),
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Seed URL (must be http/https); also defines the crawl's domain boundary.
    #[arg(long, env = "PORTFOLIO_URL")]
    pub url: String,

    /// Prompt-update endpoint, e.g. `http://localhost:8000/api/prompt/update`.
    #[arg(long, env = "PROMPT_UPDATE_URL")]
    pub endpoint: String,

    /// Prompt template file; must contain `{portfolio_content}` exactly once.
    #[arg(long)]
    pub template: String,

    /// File holding the digest of the last published content.
    #[arg(long, default_value = "last_digest.txt")]
    pub digest_file: String,

    /// Maximum pages to visit per run.
    #[arg(long, default_value_t = crate::crawl::MAX_CRAWL_PAGES)]
    pub max_pages: usize,
}

#[derive(Debug, Args)]
pub struct CrawlArgs {
    /// Seed URL (must be http/https).
    #[arg(long, env = "PORTFOLIO_URL")]
    pub url: String,

    /// Maximum pages to visit per run.
    #[arg(long, default_value_t = crate::crawl::MAX_CRAWL_PAGES)]
    pub max_pages: usize,
}
