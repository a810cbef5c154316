//! GCADR CMS - content backend and static export pipeline

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gcadr_cms::{
    api::{self, AppState},
    config::Config,
    db::{self, DynDatabasePool},
    pipeline::{ImportReport, Pipeline},
};

#[derive(Parser)]
#[command(name = "gcadr-cms")]
#[command(about = "Content backend and static export pipeline for the GCADR website")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "config.yml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve,
    /// Apply pending database migrations
    Migrate,
    /// Import Markdown blog posts
    ImportBlogs,
    /// Import the team roster and leadership
    ImportTeam,
    /// Import carousel images and announcements
    ImportConfig,
    /// Export published content as static JSON and copy media
    Export,
    /// Import everything, then export
    Build,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gcadr_cms=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::load_with_env(&cli.config)?;
    tracing::info!("Configuration loaded from {}", cli.config.display());

    let pool = db::create_pool(&config.database).await?;
    db::migrations::run_migrations(&pool).await?;

    match cli.command {
        Command::Serve => serve(pool, config).await?,
        Command::Migrate => tracing::info!("Database is up to date"),
        Command::ImportBlogs => {
            let report = Pipeline::new(pool, config).import_blogs().await?;
            log_import("Blog", &report);
        }
        Command::ImportTeam => {
            let report = Pipeline::new(pool, config).import_team().await?;
            log_import("Team", &report);
        }
        Command::ImportConfig => {
            let report = Pipeline::new(pool, config).import_config().await?;
            log_import("Config", &report);
        }
        Command::Export => {
            let report = Pipeline::new(pool, config).export().await?;
            tracing::info!(
                "Export complete: {} file(s), media copied: {}",
                report.files_written,
                report.media_copied
            );
        }
        Command::Build => {
            let report = Pipeline::new(pool, config).build().await?;
            log_import("Blog", &report.blogs);
            log_import("Team", &report.team);
            log_import("Config", &report.config);
            if report.failure_count() > 0 {
                anyhow::bail!("Build finished with {} failed item(s)", report.failure_count());
            }
        }
    }

    Ok(())
}

async fn serve(pool: DynDatabasePool, config: Config) -> Result<()> {
    if config.admin.token.is_none() {
        tracing::warn!("No admin token configured; the build endpoint is disabled");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let cors_origin = config.server.cors_origin.clone();
    let app = api::build_router(AppState::new(pool, config), &cors_origin);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

fn log_import(stage: &str, report: &ImportReport) {
    if report.skipped {
        tracing::info!("{} import skipped: source not found", stage);
        return;
    }
    tracing::info!(
        "{} import: {} imported ({} created, {} updated), {} failed",
        stage,
        report.imported,
        report.created,
        report.updated,
        report.failures.len()
    );
    for failure in &report.failures {
        tracing::warn!("  {}: {}", failure.item, failure.error);
    }
}
