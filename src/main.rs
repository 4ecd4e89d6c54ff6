mod fetch;
mod github;
mod model;
mod page;
mod report;
mod utils;

use crate::fetch::{FetchSettings, Fetcher, DEFAULT_DATA_DIR, DEFAULT_DELAY_MS};
use crate::github::{GithubClient, DEFAULT_API_URL};
use crate::page::{DataSource, Page, StaticDir, StaticHttp};
use crate::report::MarkdownReport;
use crate::utils::ProgressLogWriter;
use clap::{Args as ClapArgs, Parser, Subcommand};
use indicatif::MultiProgress;
use model::{Milestone, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "content.json";
const TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "VITE_GITHUB_TOKEN"];

/// Without a subcommand, runs `fetch` with the flags given at top level.
#[derive(Parser, Debug)]
#[command(version, about, args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
    #[command(flatten)]
    fetch: FetchArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download commits and contributor stats into the public data directory.
    Fetch(FetchArgs),
    /// Load every card from the static data and write the page as Markdown.
    Render(RenderArgs),
}

#[derive(ClapArgs, Debug, Clone)]
struct FetchArgs {
    #[arg(long = "config", default_value = DEFAULT_CONFIG)]
    config_path: String,
    #[arg(long = "data-dir", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
    #[arg(long = "api-url", default_value = DEFAULT_API_URL)]
    api_url: String,
    #[arg(long = "author-email", env = "PORTFOLIO_AUTHOR_EMAIL")]
    author_email: Option<String>,
    #[arg(long = "author-login", env = "PORTFOLIO_AUTHOR_LOGIN")]
    author_login: Option<String>,
    #[arg(long = "delay-ms", default_value_t = DEFAULT_DELAY_MS)]
    delay_ms: u64,
}

#[derive(ClapArgs, Debug, Clone)]
struct RenderArgs {
    #[arg(long = "config", default_value = DEFAULT_CONFIG)]
    config_path: String,
    /// Directory holding `data/`.
    #[arg(long = "public-dir", default_value = "public")]
    public_dir: PathBuf,
    /// Load the data files from the deployed site instead of `--public-dir`.
    #[arg(long = "base-url")]
    base_url: Option<String>,
    #[arg(long = "title", default_value = "Milestones")]
    title: String,
    #[arg(long = "out", default_value = "portfolio.md")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let env_files = load_env_files();
    let progress = MultiProgress::new();
    init_tracing(&progress);
    for path in env_files {
        info!(path = %path.display(), "Loaded environment file");
    }

    let args = Args::parse();
    let command = args.command.unwrap_or(Command::Fetch(args.fetch));
    let result = match command {
        Command::Fetch(args) => run_fetch(&args, progress).await,
        Command::Render(args) => run_render(&args).await,
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Aborted");
            ExitCode::FAILURE
        }
    }
}

/// `.env.local` wins over `.env`; neither overrides the real environment.
fn load_env_files() -> Vec<PathBuf> {
    [".env.local", ".env"]
        .into_iter()
        .filter_map(|file| dotenvy::from_filename(file).ok())
        .collect()
}

/// Logs go to stderr, where the fetch spinners are drawn too.
fn init_tracing(progress: &MultiProgress) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(ProgressLogWriter::new(progress.clone(), std::io::stderr))
        .init();
}

fn github_token() -> Option<String> {
    TOKEN_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|token| !token.is_empty()))
}

async fn run_fetch(args: &FetchArgs, progress: MultiProgress) -> Result<()> {
    let milestones = Milestone::from_config(&args.config_path)?;
    info!(config = %args.config_path, "Found {} milestones", milestones.len());

    let client = GithubClient::new(&args.api_url, github_token())?;
    if !client.is_authenticated() {
        warn!("No GitHub token in {}, requests are unauthenticated", TOKEN_VARS.join(" or "));
    }

    let settings = FetchSettings {
        data_dir: args.data_dir.clone(),
        author_email: args.author_email.clone(),
        author_login: args.author_login.clone(),
        delay: Duration::from_millis(args.delay_ms),
    };
    Fetcher::new(&client, &settings)
        .with_progress(progress)
        .fetch_all(&milestones)
        .await;
    Ok(())
}

async fn run_render(args: &RenderArgs) -> Result<()> {
    let milestones = Milestone::from_config(&args.config_path)?;
    let source: Arc<dyn DataSource> = match &args.base_url {
        Some(base_url) => Arc::new(StaticHttp::new(base_url)?),
        None => Arc::new(StaticDir::new(args.public_dir.clone())),
    };

    let mut page = Page::mount(&milestones, source);
    if page.is_empty() {
        warn!(config = %args.config_path, "No milestones to render");
    }
    page.settled().await;
    let views = page.snapshot().await;
    page.unmount().await;

    for view in &views {
        if view.feed.is_empty() || (view.carousel.is_none() && view.chart.is_empty()) {
            warn!(milestone = %view.milestone.slug(), "Card has no data for some of its panels");
        }
    }
    views.report_create(&args.title, &args.out)?;
    info!(out = %args.out.display(), "Rendered {} cards", views.len());
    Ok(())
}
