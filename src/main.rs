use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    promptsync::logging::init().context("init logging")?;

    let cli = promptsync::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        promptsync::cli::Command::Sync(args) => {
            let outcome = promptsync::sync::run(args).await.context("sync")?;
            match outcome {
                promptsync::sync::SyncOutcome::Published => {
                    tracing::info!("run outcome: published");
                }
                promptsync::sync::SyncOutcome::Unchanged => {
                    tracing::info!("run outcome: unchanged");
                }
            }
        }
        promptsync::cli::Command::Crawl(args) => {
            promptsync::crawl::run(args).await.context("crawl")?;
        }
    }

    Ok(())
}
