use std::path::PathBuf;

use anyhow::Context as _;

use crate::cli::SyncArgs;
use crate::crawl::{CrawlTarget, Crawler};
use crate::digest::{DigestStore, combine_pages, content_digest};
use crate::publish::PromptClient;
use crate::renderer::{ChromeRenderer, PageRenderer};
use crate::template::PromptTemplate;

/// How a completed run ended. A failed run is the `Err` branch of
/// [`run_with_renderer`], carrying the human-readable reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Content changed; the new prompt was published and the digest persisted.
    Published,
    /// Content digest matches the last published one; nothing was submitted.
    Unchanged,
}

/// Everything one run needs, validated before any network activity.
pub struct SyncConfig {
    pub target: CrawlTarget,
    pub max_pages: usize,
    pub template: PromptTemplate,
    pub endpoint: String,
    pub digest_file: PathBuf,
}

impl SyncConfig {
    pub fn from_args(args: &SyncArgs) -> anyhow::Result<Self> {
        let target = CrawlTarget::new(&args.url)?;
        let template = PromptTemplate::load(args.template.as_ref())?;

        Ok(Self {
            target,
            max_pages: args.max_pages,
            template,
            endpoint: args.endpoint.clone(),
            digest_file: PathBuf::from(&args.digest_file),
        })
    }
}

/// `sync` subcommand: one end-to-end run against a real browser.
pub async fn run(args: SyncArgs) -> anyhow::Result<SyncOutcome> {
    let config = SyncConfig::from_args(&args)?;

    let mut renderer = ChromeRenderer::launch()
        .await
        .context("start page renderer")?;
    let outcome = run_with_renderer(&config, &mut renderer).await;
    renderer.close().await;

    outcome
}

/// One crawl-digest-publish run over an already-acquired renderer.
///
/// The digest file is written only after the prompt-update call is
/// acknowledged, so a failed publish leaves the previous digest
/// authoritative and the next scheduled run retries the whole pipeline.
/// The flip side is a crash window between publish and persist: content
/// already published once would then be skipped as "unchanged" by the next
/// run. We keep publish-before-persist because the digest must never claim
/// a prompt that was not confirmed on the other side.
pub async fn run_with_renderer(
    config: &SyncConfig,
    renderer: &mut dyn PageRenderer,
) -> anyhow::Result<SyncOutcome> {
    let crawler = Crawler::new(config.target.clone(), config.max_pages);
    let result = crawler.run(renderer).await.context("crawl")?;

    let combined = combine_pages(&result.pages);
    let current = content_digest(&combined);

    let store = DigestStore::new(&config.digest_file);
    let last = store.load().context("read last digest")?;
    tracing::debug!(current = %current, last = %last, "compare digests");

    if current == last {
        tracing::info!(pages = result.pages.len(), "content unchanged; skipping prompt update");
        return Ok(SyncOutcome::Unchanged);
    }

    tracing::info!(
        pages = result.pages.len(),
        chars = combined.chars().count(),
        digest = %current,
        "content changed; publishing new prompt"
    );

    let prompt = config.template.render(&combined);
    let client = PromptClient::new(&config.endpoint)?;
    client.update(&prompt).await.context("publish prompt")?;

    store.save(&current).context("persist digest")?;
    tracing::info!(
        completed_at = %chrono::Utc::now().to_rfc3339(),
        "prompt update published"
    );

    Ok(SyncOutcome::Published)
}
