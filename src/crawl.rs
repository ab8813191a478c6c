use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use anyhow::Context as _;
use url::Url;

use crate::cli::CrawlArgs;
use crate::links::{extract_links, netloc, normalize_url};
use crate::renderer::{ChromeRenderer, PageRenderer};
use crate::text::extract_text;

/// Default ceiling on successfully visited pages per run.
pub const MAX_CRAWL_PAGES: usize = 20;

pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(60);
pub const QUIESCENCE_TIMEOUT: Duration = Duration::from_secs(60);

/// A validated seed: absolute http(s) URL with a host. The host (plus any
/// explicit port) doubles as the domain boundary for the whole crawl.
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    url: Url,
    netloc: String,
}

impl CrawlTarget {
    pub fn new(raw: &str) -> anyhow::Result<Self> {
        let url = Url::parse(raw).with_context(|| format!("parse seed url: {raw}"))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("seed url must be http/https: {url}");
        }
        let netloc =
            netloc(&url).ok_or_else(|| anyhow::anyhow!("seed url must have host: {url}"))?;

        Ok(Self { url, netloc })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn netloc(&self) -> &str {
        &self.netloc
    }
}

/// Extracted text of one successfully visited page.
#[derive(Debug, Clone)]
pub struct PageText {
    pub url: Url,
    pub text: String,
}

/// Page texts of one run, in visit order. Never mutated after the run.
#[derive(Debug)]
pub struct CrawlResult {
    pub pages: Vec<PageText>,
}

/// Bounded breadth-first crawl of a single domain.
///
/// The frontier is an explicit FIFO queue so that "the first `max_pages`
/// pages" is deterministic for a given link graph; a URL enters the queue at
/// most once per run, and a URL that failed is never retried.
pub struct Crawler {
    target: CrawlTarget,
    max_pages: usize,
    navigation_timeout: Duration,
    quiescence_timeout: Duration,
}

impl Crawler {
    pub fn new(target: CrawlTarget, max_pages: usize) -> Self {
        Self {
            target,
            max_pages,
            navigation_timeout: NAVIGATION_TIMEOUT,
            quiescence_timeout: QUIESCENCE_TIMEOUT,
        }
    }

    pub async fn run(&self, renderer: &mut dyn PageRenderer) -> anyhow::Result<CrawlResult> {
        let seed = normalize_url(self.target.url());

        let mut frontier: VecDeque<Url> = VecDeque::new();
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(seed.to_string());
        frontier.push_back(seed);

        let mut pages: Vec<PageText> = Vec::new();

        while let Some(url) = frontier.pop_front() {
            if pages.len() >= self.max_pages {
                break;
            }

            tracing::info!(
                visit = pages.len() + 1,
                cap = self.max_pages,
                url = %url,
                "visit page"
            );

            let html = match self.visit(renderer, &url).await {
                Ok(html) => html,
                Err(err) => {
                    tracing::warn!(url = %url, error = format!("{err:#}"), "page dropped");
                    continue;
                }
            };

            pages.push(PageText {
                url: url.clone(),
                text: extract_text(&html),
            });

            if pages.len() < self.max_pages {
                match extract_links(&html, &url, self.target.netloc()) {
                    Ok(links) => {
                        for link in links {
                            if seen.insert(link.to_string()) {
                                frontier.push_back(link);
                            }
                        }
                    }
                    Err(err) => {
                        tracing::warn!(
                            url = %url,
                            error = format!("{err:#}"),
                            "link extraction failed"
                        );
                    }
                }
            }
        }

        if pages.is_empty() {
            anyhow::bail!("crawl visited no pages under {}", self.target.url());
        }

        tracing::info!(pages = pages.len(), "crawl finished");
        Ok(CrawlResult { pages })
    }

    async fn visit(&self, renderer: &mut dyn PageRenderer, url: &Url) -> anyhow::Result<String> {
        renderer
            .navigate(url, self.navigation_timeout)
            .await
            .with_context(|| format!("navigate to {url}"))?;
        renderer
            .wait_for_quiescence(self.quiescence_timeout)
            .await
            .with_context(|| format!("wait for {url} to settle"))?;
        renderer
            .content()
            .await
            .with_context(|| format!("read markup of {url}"))
    }
}

/// `crawl` subcommand: run the crawl and print the combined text, without
/// touching the digest or the prompt endpoint.
pub async fn run(args: CrawlArgs) -> anyhow::Result<()> {
    let target = CrawlTarget::new(&args.url)?;
    let crawler = Crawler::new(target, args.max_pages);

    let mut renderer = ChromeRenderer::launch()
        .await
        .context("start page renderer")?;
    let result = crawler.run(&mut renderer).await;
    renderer.close().await;

    let result = result?;
    println!("{}", crate::digest::combine_pages(&result.pages));
    Ok(())
}
