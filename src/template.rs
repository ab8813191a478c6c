use std::path::Path;

use anyhow::Context as _;

/// The single substitution point the template must carry.
pub const CONTENT_PLACEHOLDER: &str = "{portfolio_content}";

/// Static prompt pattern with exactly one `{portfolio_content}` slot.
/// Validated at construction; a template without the placeholder would
/// silently publish a prompt that ignores the crawl, so it is a fatal
/// configuration error instead.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> anyhow::Result<Self> {
        let template = template.into();
        match template.matches(CONTENT_PLACEHOLDER).count() {
            1 => Ok(Self { template }),
            0 => anyhow::bail!("prompt template is missing the {CONTENT_PLACEHOLDER} placeholder"),
            n => anyhow::bail!(
                "prompt template must contain {CONTENT_PLACEHOLDER} exactly once (found {n})"
            ),
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let template = std::fs::read_to_string(path)
            .with_context(|| format!("read prompt template: {}", path.display()))?;
        Self::new(template).with_context(|| format!("validate prompt template: {}", path.display()))
    }

    pub fn render(&self, content: &str) -> String {
        self.template.replace(CONTENT_PLACEHOLDER, content)
    }
}
