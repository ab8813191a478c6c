use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use sha2::Digest as _;

use crate::crawl::PageText;

/// Marker joined between page texts; kept human-readable so the combined
/// blob stays inspectable in the rendered prompt.
pub const PAGE_SEPARATOR: &str = "\n\n--- (page break) ---\n\n";

/// Joins the page texts of one run with [`PAGE_SEPARATOR`] and trims the
/// whole blob. This exact string is what gets hashed and what gets inserted
/// into the prompt template.
pub fn combine_pages(pages: &[PageText]) -> String {
    let texts: Vec<&str> = pages.iter().map(|page| page.text.as_str()).collect();
    texts.join(PAGE_SEPARATOR).trim().to_owned()
}

/// SHA-256 of the combined text, lowercase hex.
pub fn content_digest(text: &str) -> String {
    let mut hasher = sha2::Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// The single scalar that survives across runs: the digest of the last
/// successfully published content, stored in one file.
#[derive(Debug, Clone)]
pub struct DigestStore {
    path: PathBuf,
}

impl DigestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file reads as the empty string, so a first run always
    /// counts as changed.
    pub fn load(&self) -> anyhow::Result<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents.trim().to_owned()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(err) => Err(err)
                .with_context(|| format!("read digest file: {}", self.path.display())),
        }
    }

    pub fn save(&self, digest: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create digest dir: {}", parent.display()))?;
        }
        std::fs::write(&self.path, digest)
            .with_context(|| format!("write digest file: {}", self.path.display()))
    }
}
