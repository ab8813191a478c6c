use std::collections::BTreeSet;

use scraper::{Html, Selector};
use url::Url;

/// Strips the fragment and query so that URLs differing only by either are
/// the same frontier entry.
pub fn normalize_url(url: &Url) -> Url {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    normalized.set_query(None);
    normalized
}

/// Network location of a URL as the renderer presents it: host plus explicit
/// port, matching on the exact string.
pub fn netloc(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    })
}

/// Collects the same-domain links of one rendered page.
///
/// Hrefs are resolved against `page_url`, normalized, and kept only when
/// they are http(s) and their network location equals `seed_netloc` — the
/// *seed's* domain, not the current page's, so a crawl that was redirected
/// onto another subdomain still stays anchored to the original target.
/// Malformed hrefs and non-http schemes (`mailto:`, `javascript:`) are
/// skipped silently.
pub fn extract_links(
    html: &str,
    page_url: &Url,
    seed_netloc: &str,
) -> anyhow::Result<BTreeSet<Url>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]")
        .map_err(|err| anyhow::anyhow!("parse anchor selector: {err:?}"))?;

    let mut links = BTreeSet::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Ok(absolute) = page_url.join(href) else {
            continue;
        };
        if absolute.scheme() != "http" && absolute.scheme() != "https" {
            continue;
        }

        let normalized = normalize_url(&absolute);
        if netloc(&normalized).as_deref() == Some(seed_netloc) {
            links.insert(normalized);
        }
    }

    Ok(links)
}
