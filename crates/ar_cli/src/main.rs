mod browse;
mod logging;
mod render;

use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use ar_client::{ClientConfig, HttpArticleApi};
use ar_core::{ArticleApi, ArticleStatus, FilterCriteria};
use ar_views::{HistoryNavigator, ResponseOrdering, Route, ViewOptions, ViewShell};
use clap::{ArgAction, Parser, Subcommand};
use tracing::info;

use crate::logging::init_logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse articles served by the articles backend", long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides ARTICLES_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Articles per page (overrides ARTICLES_PAGE_SIZE)
    #[arg(long, global = true)]
    page_size: Option<u32>,
    #[arg(long, global = true, default_value_t = 10)]
    timeout_secs: u64,
    /// Only apply the response to the most recent page request
    #[arg(long, global = true)]
    latest_only: bool,
    #[arg(long, global = true)]
    no_color: bool,
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print one page of articles
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Case-insensitive title filter, applied to the fetched page
        #[arg(long, default_value = "")]
        search: String,
        /// original or ai_updated
        #[arg(long)]
        status: Option<ArticleStatus>,
    },
    /// Print a single article
    Show { id: String },
    /// Interactive list and detail views
    Browse,
}

fn client_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_url(url)?;
    }
    if let Some(size) = cli.page_size {
        config = config.with_page_size(size)?;
    }
    Ok(config.with_timeout(Duration::from_secs(cli.timeout_secs)))
}

fn view_options(cli: &Cli, config: &ClientConfig) -> ViewOptions {
    ViewOptions {
        page_size: config.page_size,
        ordering: if cli.latest_only {
            ResponseOrdering::LatestIssued
        } else {
            ResponseOrdering::LastResolved
        },
    }
}

fn failed(shell: &ViewShell<HistoryNavigator>) -> bool {
    let list_failed = shell.list().map_or(false, |list| list.state().error().is_some());
    let detail_failed = shell.detail().map_or(false, |detail| detail.state().error().is_some());
    list_failed || detail_failed
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = client_config(&cli)?;
    let options = view_options(&cli, &config);
    let http = HttpArticleApi::new(config)?;
    info!("🚀 Using articles backend at {}", http.config().base_url);
    let api: Arc<dyn ArticleApi> = Arc::new(http);
    let color = !cli.no_color && std::io::stdout().is_terminal();

    let route = match &cli.command {
        Commands::List { page, .. } => Route::List { page: *page },
        Commands::Show { id } => Route::Detail { id: id.clone() },
        Commands::Browse => Route::List { page: 1 },
    };
    let navigator = HistoryNavigator::new(&route.path())
        .with_context(|| format!("invalid start route {}", route.path()))?;
    let mut shell = ViewShell::new(api, options, navigator);
    shell.sync()?;

    match cli.command {
        Commands::List { search, status, .. } => {
            shell.set_filter(FilterCriteria::new(search, status));
            shell.settle_all().await?;
        }
        Commands::Show { .. } => shell.settle_all().await?,
        Commands::Browse => {
            browse::run(&mut shell, color).await?;
            info!("👋 Bye");
            return Ok(ExitCode::SUCCESS);
        }
    }

    print!("{}", browse::render(&shell, color));
    if failed(&shell) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
